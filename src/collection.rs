//! Style scopes: storage, inheritance, and materialization onto the
//! document model.
//!
//! A [`StyleCollection`] holds every record of one parse scope in insertion
//! order. After parsing, [`StyleCollection::finish`] patches cross-references,
//! and [`StyleCollection::apply_family`] / [`StyleCollection::resolve_parents`]
//! push one family onto a [`StyleContainer`]. Per-style failures become
//! [`ImportWarning`]s; nothing in the apply phase aborts the pass.

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::context::DisplayNameRegistry;
use crate::error::{
    ImportPhase, ImportWarning, StyleError, CODE_DUPLICATE, CODE_TARGET_LOOKUP,
    CODE_UNRESOLVED_PARENT,
};
use crate::family::{Namespace, StyleFamily};
use crate::layout::LayoutKind;
use crate::property::{builtin_mapper, ContextId, PropertyMapper, PropertyState, PropertyValue};
use crate::record::{
    MasterPageRecord, NumberStyleRecord, PageLayoutRecord, PageMasterRecord, StyleRecord,
};
use crate::target::{
    PropertyApplier, PropertyStateKind, StyleContainer, StyleFamilies, StyledObject,
};

const AUTO_GROW_HEIGHT_KEY: &str = "TextAutoGrowHeight";

/// Which markup section a collection was parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleScope {
    /// `office:automatic-styles`.
    Automatic,
    /// `office:styles` and master-page styles.
    Named,
}

/// What to do when `(family, name)` is added twice to one scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Replace the earlier record, keeping its position.
    #[default]
    Overwrite,
    /// Fail with `STYLE_DUPLICATE`.
    Reject,
}

/// Counters and warnings from an apply pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Objects created in the document model.
    pub created: usize,
    /// Pre-existing objects reset and rewritten.
    pub updated: usize,
    /// Parent links set.
    pub parented: usize,
    /// Isolated per-style failures.
    pub warnings: Vec<ImportWarning>,
}

impl ApplyReport {
    /// Fold `other` into `self`.
    pub fn merge(&mut self, other: ApplyReport) {
        self.created += other.created;
        self.updated += other.updated;
        self.parented += other.parented;
        self.warnings.extend(other.warnings);
    }

    fn warn(&mut self, err: &StyleError, family: StyleFamily, name: &str) {
        log::warn!("Style {:?} ({}) skipped: {}", name, family, err);
        self.warnings
            .push(ImportWarning::from_error(err, family, name));
    }
}

/// Strip a master-page scope prefix from a style display name.
///
/// With an empty prefix every name matches unchanged. Otherwise the name
/// matches only when everything up to and including its last `-` is
/// exactly `prefix`.
pub fn strip_scope_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(name);
    }
    let name_prefix_len = name.rfind('-').map_or(0, |pos| pos + 1);
    if name_prefix_len != prefix.len() || !name.starts_with(prefix) {
        return None;
    }
    Some(&name[prefix.len()..])
}

/// All records of one parse scope.
pub struct StyleCollection {
    scope: StyleScope,
    duplicate_policy: DuplicatePolicy,
    records: Vec<StyleRecord>,
    index: BTreeMap<(StyleFamily, String), usize>,
    defaults: BTreeMap<StyleFamily, usize>,
    mappers: BTreeMap<StyleFamily, Arc<dyn PropertyMapper>>,
    number_styles: Vec<NumberStyleRecord>,
    page_layouts: Vec<PageLayoutRecord>,
    page_masters: Vec<PageMasterRecord>,
    // record slot -> document-model object name
    associations: BTreeMap<usize, String>,
}

impl fmt::Debug for StyleCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleCollection")
            .field("scope", &self.scope)
            .field("duplicate_policy", &self.duplicate_policy)
            .field("records", &self.records)
            .field("mappers", &self.mappers.keys().collect::<Vec<_>>())
            .field("number_styles", &self.number_styles)
            .field("page_layouts", &self.page_layouts)
            .field("page_masters", &self.page_masters)
            .field("associations", &self.associations)
            .finish()
    }
}

impl StyleCollection {
    /// Empty scope with the built-in mappers.
    pub fn new(scope: StyleScope) -> Self {
        let mut mappers = BTreeMap::new();
        for family in [
            StyleFamily::DrawingPage,
            StyleFamily::Graphics,
            StyleFamily::Presentation,
            StyleFamily::TableCell,
            StyleFamily::TableRow,
            StyleFamily::TableColumn,
            StyleFamily::Paragraph,
            StyleFamily::Text,
        ] {
            if let Some(mapper) = builtin_mapper(family) {
                mappers.insert(family, mapper);
            }
        }
        Self {
            scope,
            duplicate_policy: DuplicatePolicy::default(),
            records: Vec::with_capacity(0),
            index: BTreeMap::new(),
            defaults: BTreeMap::new(),
            mappers,
            number_styles: Vec::with_capacity(0),
            page_layouts: Vec::with_capacity(0),
            page_masters: Vec::with_capacity(0),
            associations: BTreeMap::new(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn scope(&self) -> StyleScope {
        self.scope
    }

    /// Replace the mapper used for `family`.
    pub fn set_mapper(&mut self, family: StyleFamily, mapper: Arc<dyn PropertyMapper>) {
        self.mappers.insert(family, mapper);
    }

    pub fn mapper(&self, family: StyleFamily) -> Option<&Arc<dyn PropertyMapper>> {
        self.mappers.get(&family)
    }

    /// Number of style records, defaults included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[StyleRecord] {
        &self.records
    }

    /// Insert a record and return its slot.
    pub fn add(&mut self, record: StyleRecord) -> Result<usize, StyleError> {
        let existing = if record.is_default {
            self.defaults.get(&record.family).copied()
        } else {
            self.index
                .get(&(record.family, record.name.clone()))
                .copied()
        };
        if let Some(slot) = existing {
            return match self.duplicate_policy {
                DuplicatePolicy::Overwrite => {
                    log::debug!(
                        "Style {:?} ({}) redefined; replacing earlier definition",
                        record.name,
                        record.family
                    );
                    self.associations.remove(&slot);
                    self.records[slot] = record;
                    Ok(slot)
                }
                DuplicatePolicy::Reject => Err(StyleError::new(
                    ImportPhase::Parse,
                    CODE_DUPLICATE,
                    "Style defined twice in one scope",
                )
                .with_family(record.family)
                .with_style(record.name)),
            };
        }
        let slot = self.records.len();
        if record.is_default {
            self.defaults.insert(record.family, slot);
        } else {
            self.index.insert((record.family, record.name.clone()), slot);
        }
        self.records.push(record);
        Ok(slot)
    }

    /// Look up a style of this scope by name.
    pub fn find(&self, family: StyleFamily, name: &str) -> Option<&StyleRecord> {
        self.index
            .get(&(family, String::from(name)))
            .map(|&slot| &self.records[slot])
    }

    /// Look up in this scope, then in `parent`.
    pub fn find_in_scopes<'a>(
        &'a self,
        family: StyleFamily,
        name: &str,
        parent: Option<&'a StyleCollection>,
    ) -> Option<&'a StyleRecord> {
        self.find(family, name)
            .or_else(|| parent.and_then(|p| p.find(family, name)))
    }

    /// Default-property seed of a family.
    pub fn default_style(&self, family: StyleFamily) -> Option<&StyleRecord> {
        self.defaults.get(&family).map(|&slot| &self.records[slot])
    }

    /// Properties of the family default, used as the seed for every other
    /// record of `family` when it is materialized. Empty when the family has
    /// no default. Records keep their own properties as parsed.
    pub fn resolve_defaults(&self, family: StyleFamily) -> &[PropertyState] {
        self.default_style(family)
            .map_or(&[][..], StyleRecord::properties)
    }

    /// Create or update one document-model object per record of `family`.
    ///
    /// `prefix` scopes the pass to master-page styles (`"<master>-"`); names
    /// that do not carry it are ignored. Pre-existing objects have every
    /// directly set mapped property reset before the record is written.
    pub fn apply_family<C: StyleContainer>(
        &mut self,
        family: StyleFamily,
        container: &mut C,
        prefix: &str,
        applier: &dyn PropertyApplier,
        display_names: &DisplayNameRegistry,
    ) -> ApplyReport {
        let seed = self.resolve_defaults(family);
        let mapper = self.mappers.get(&family).cloned();
        let mut report = ApplyReport::default();
        let mut materialized = Vec::new();

        for (slot, record) in self.records.iter().enumerate() {
            if record.family != family || record.is_default {
                continue;
            }
            let Some(name) = strip_scope_prefix(&record.display_name, prefix) else {
                continue;
            };
            match materialize(
                &record.seeded(seed),
                name,
                container,
                mapper.as_deref(),
                applier,
                display_names,
            ) {
                Ok(created) => {
                    if created {
                        report.created += 1;
                    } else {
                        report.updated += 1;
                    }
                    materialized.push((slot, String::from(name)));
                }
                Err(err) => report.warn(&err, family, &record.name),
            }
        }
        self.associations.extend(materialized);
        report
    }

    /// Link each materialized object of `family` to its parent style.
    ///
    /// Parent names are translated to display names and stripped of
    /// `prefix` like the styles themselves. A parent that fails the prefix
    /// match is skipped silently; one missing from `container` leaves the
    /// object parentless with an `STYLE_UNRESOLVED_PARENT` warning.
    pub fn resolve_parents<C: StyleContainer>(
        &self,
        family: StyleFamily,
        container: &mut C,
        prefix: &str,
        display_names: &DisplayNameRegistry,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        for (slot, record) in self.records.iter().enumerate() {
            if record.family != family || record.is_default || record.display_name.is_empty() {
                continue;
            }
            let Some(object_name) = self.associations.get(&slot) else {
                continue;
            };
            let Some(parent_name) = record.parent_name.as_deref() else {
                continue;
            };
            let parent_display = display_names.display_name_for(family, parent_name);
            let Some(parent) = strip_scope_prefix(parent_display, prefix) else {
                log::debug!(
                    "Parent {:?} of {:?} is outside scope {:?}",
                    parent_display,
                    record.name,
                    prefix
                );
                continue;
            };
            if !container.has(parent) {
                let err = StyleError::new(
                    ImportPhase::Apply,
                    CODE_UNRESOLVED_PARENT,
                    format!("Parent style {:?} not found", parent),
                )
                .with_family(family)
                .with_style(record.name.as_str());
                report.warn(&err, family, &record.name);
                continue;
            }
            let linked = match container.get_mut(object_name) {
                Some(object) => object
                    .set_parent_style(parent)
                    .map_err(|err| StyleError::from(err).with_family(family)),
                None => Err(lookup_error(family, object_name)),
            };
            match linked {
                Ok(()) => report.parented += 1,
                Err(err) => report.warn(&err, family, &record.name),
            }
        }
        report
    }

    /// Apply the `Presentation` styles scoped to `master` onto the document
    /// family named after the master page.
    ///
    /// Returns `None` when the document has no such family.
    pub fn set_master_page_styles<F: StyleFamilies>(
        &mut self,
        master: &MasterPageRecord,
        families: &mut F,
        applier: &dyn PropertyApplier,
        display_names: &DisplayNameRegistry,
    ) -> Option<ApplyReport> {
        let container = families.family_mut(&master.display_name)?;
        let prefix = format!("{}-", master.display_name);
        let mut report = self.apply_family(
            StyleFamily::Presentation,
            container,
            &prefix,
            applier,
            display_names,
        );
        report.merge(self.resolve_parents(
            StyleFamily::Presentation,
            container,
            &prefix,
            display_names,
        ));
        Some(report)
    }

    /// Deferred patch: rewrite date-time format references into keys.
    ///
    /// Data styles are looked up in this scope, then in `parent`. Missing
    /// references become 0. Returns the number of values rewritten.
    pub fn finish(&mut self, parent: Option<&StyleCollection>) -> usize {
        let mut patched = 0;
        for record in &mut self.records {
            let Some(mapper) = self.mappers.get(&record.family) else {
                continue;
            };
            let (record_name, properties) = record.name_and_properties_mut();
            for state in properties {
                if mapper.context_id_for(state.index) != ContextId::DateTimeFormat {
                    continue;
                }
                let PropertyValue::Str(style_name) = &state.value else {
                    continue;
                };
                let key = self
                    .number_styles
                    .iter()
                    .chain(parent.into_iter().flat_map(|p| p.number_styles.iter()))
                    .find(|n| n.name == *style_name)
                    .map_or(0, |n| n.key);
                if key == 0 {
                    log::debug!(
                        "Date-time format {:?} of {:?} not found; using 0",
                        style_name,
                        record_name
                    );
                }
                state.value = PropertyValue::Int(key.into());
                patched += 1;
            }
        }
        patched
    }

    /// Reuse named-scope objects for automatic styles derived from them.
    ///
    /// Returns the number of automatic styles associated.
    pub fn associate_with_parent_scope(&mut self, named: &StyleCollection) -> usize {
        let mut found = Vec::new();
        for (slot, record) in self.records.iter().enumerate() {
            let Some(parent_name) = record.parent_name.as_deref() else {
                continue;
            };
            if let Some(object) = named.object_name(record.family, parent_name) {
                found.push((slot, String::from(object)));
            }
        }
        let count = found.len();
        self.associations.extend(found);
        count
    }

    /// Document-model object a style was materialized as.
    pub fn object_name(&self, family: StyleFamily, name: &str) -> Option<&str> {
        let slot = self.index.get(&(family, String::from(name)))?;
        self.associations.get(slot).map(String::as_str)
    }

    /// Parent chain of a style, starting with the style itself.
    ///
    /// Stops at a missing parent or when a name repeats.
    pub fn ancestry(&self, family: StyleFamily, name: &str) -> Vec<&StyleRecord> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::new();
        let mut next = Some(name);
        while let Some(current) = next {
            if !seen.insert(current) {
                log::debug!("Style inheritance cycle at {:?} ({})", current, family);
                break;
            }
            let Some(record) = self.find(family, current) else {
                break;
            };
            chain.push(record);
            next = record.parent_name.as_deref();
        }
        chain
    }

    /// Properties of a style with inheritance applied.
    ///
    /// The family default goes first, then ancestors root-first, so nearer
    /// styles override further ones.
    pub fn effective_properties(&self, family: StyleFamily, name: &str) -> Vec<PropertyState> {
        let mut merged = StyleRecord::new(family, name);
        let chain = self.ancestry(family, name);
        let layers = self
            .default_style(family)
            .into_iter()
            .chain(chain.into_iter().rev());
        for layer in layers {
            for state in layer.properties() {
                merged.set_property(state.index, state.value.clone());
            }
        }
        merged.properties().to_vec()
    }

    pub fn add_number_style(&mut self, style: NumberStyleRecord) {
        self.number_styles.push(style);
    }

    pub fn number_style(&self, name: &str) -> Option<&NumberStyleRecord> {
        self.number_styles.iter().find(|n| n.name == name)
    }

    pub fn number_styles(&self) -> &[NumberStyleRecord] {
        &self.number_styles
    }

    pub fn add_page_layout(&mut self, layout: PageLayoutRecord) {
        self.page_layouts.push(layout);
    }

    /// Page layout names with their inferred kind, in document order.
    pub fn page_layouts(&self) -> Vec<(&str, LayoutKind)> {
        self.page_layouts
            .iter()
            .map(|layout| (layout.name.as_str(), layout.kind))
            .collect()
    }

    pub fn add_page_master(&mut self, master: PageMasterRecord) {
        self.page_masters.push(master);
    }

    pub fn page_masters(&self) -> &[PageMasterRecord] {
        &self.page_masters
    }

    pub fn page_master(&self, name: &str) -> Option<&PageMasterRecord> {
        self.page_masters.iter().find(|m| m.name == name)
    }
}

fn lookup_error(family: StyleFamily, name: &str) -> StyleError {
    StyleError::new(
        ImportPhase::Apply,
        CODE_TARGET_LOOKUP,
        format!("Style object {:?} not found after insert", name),
    )
    .with_family(family)
    .with_style(name)
}

/// Create or reset the object for one record and write its properties.
/// Returns whether the object was created.
fn materialize<C: StyleContainer>(
    record: &StyleRecord,
    name: &str,
    container: &mut C,
    mapper: Option<&dyn PropertyMapper>,
    applier: &dyn PropertyApplier,
    display_names: &DisplayNameRegistry,
) -> Result<bool, StyleError> {
    let created = !container.has(name);
    if created {
        let object = container.create().map_err(|err| {
            StyleError::from(err)
                .with_family(record.family)
                .with_style(name)
        })?;
        container
            .insert(name, object)
            .map_err(|err| StyleError::from(err).with_family(record.family))?;
    }
    let object = container
        .get_mut(name)
        .ok_or_else(|| lookup_error(record.family, name))?;
    let Some(mapper) = mapper else {
        return Ok(created);
    };
    if !created {
        reset_direct_properties(record, object, mapper)?;
    }
    applier
        .apply(record, mapper, display_names, object)
        .map_err(|err| StyleError::from(err).with_family(record.family))?;
    Ok(created)
}

fn reset_direct_properties<O: StyledObject>(
    record: &StyleRecord,
    object: &mut O,
    mapper: &dyn PropertyMapper,
) -> Result<(), StyleError> {
    for index in 0..mapper.entry_count() {
        let Some(key) = mapper.api_name_for(index) else {
            continue;
        };
        if !object.has_property(key) || object.property_state(key) != PropertyStateKind::Direct {
            continue;
        }
        if can_skip_reset(key, record, object, mapper) {
            continue;
        }
        object
            .reset_to_default(key)
            .map_err(|err| StyleError::from(err).with_family(record.family))?;
    }
    Ok(())
}

/// Keep `TextAutoGrowHeight` when the record sets the same value again, so
/// shapes sized by it do not grow for the moment between reset and rewrite.
fn can_skip_reset<O: StyledObject>(
    key: &str,
    record: &StyleRecord,
    object: &O,
    mapper: &dyn PropertyMapper,
) -> bool {
    if key != AUTO_GROW_HEIGHT_KEY {
        return false;
    }
    let current = object
        .get_property(key)
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let Some(index) = mapper.index_for(Namespace::Draw, "auto-grow-height") else {
        return false;
    };
    match record.property(index) {
        Some(value) => value.as_bool().unwrap_or(false) == current,
        None => false,
    }
}
