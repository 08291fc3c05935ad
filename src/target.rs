//! Document-model seam: styled objects, their containers, and the bridge
//! that writes parsed properties onto them.
//!
//! The importer never owns document objects. It reaches them through
//! [`StyleFamilies`] -> [`StyleContainer`] -> [`StyledObject`]. An in-memory
//! implementation ([`MemoryStyleFamilies`]) is provided for tools and tests.

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use crate::context::DisplayNameRegistry;
use crate::error::TargetError;
use crate::property::{PropertyMapper, PropertyValue};
use crate::record::StyleRecord;

/// Whether a property holds an explicit value or the container default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyStateKind {
    Direct,
    Default,
}

/// A style object living in the document model.
pub trait StyledObject {
    /// Whether the object knows `key` at all.
    fn has_property(&self, key: &str) -> bool;

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), TargetError>;

    /// Current value, explicit or default.
    fn get_property(&self, key: &str) -> Option<PropertyValue>;

    fn property_state(&self, key: &str) -> PropertyStateKind;

    /// Drop an explicit value so the container default shows through.
    fn reset_to_default(&mut self, key: &str) -> Result<(), TargetError>;

    fn set_parent_style(&mut self, name: &str) -> Result<(), TargetError>;

    fn parent_style(&self) -> Option<&str>;
}

/// A named collection of styled objects (one style family of a document).
pub trait StyleContainer {
    type Object: StyledObject;

    fn has(&self, name: &str) -> bool;

    fn get_mut(&mut self, name: &str) -> Option<&mut Self::Object>;

    /// Create a detached object suitable for [`StyleContainer::insert`].
    fn create(&self) -> Result<Self::Object, TargetError>;

    fn insert(&mut self, name: &str, object: Self::Object) -> Result<(), TargetError>;
}

/// All style families of a document, by family name.
pub trait StyleFamilies {
    type Container: StyleContainer;

    fn family_mut(&mut self, name: &str) -> Option<&mut Self::Container>;
}

/// Bridge that materializes a record's properties onto an object.
pub trait PropertyApplier {
    fn apply(
        &self,
        record: &StyleRecord,
        mapper: &dyn PropertyMapper,
        display_names: &DisplayNameRegistry,
        object: &mut dyn StyledObject,
    ) -> Result<(), TargetError>;
}

/// Default bridge: writes each property under its mapper API name.
///
/// Values of name-reference slots are translated to display names of the
/// referenced family first. Keys the object does not know are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapperApplier;

impl PropertyApplier for MapperApplier {
    fn apply(
        &self,
        record: &StyleRecord,
        mapper: &dyn PropertyMapper,
        display_names: &DisplayNameRegistry,
        object: &mut dyn StyledObject,
    ) -> Result<(), TargetError> {
        for state in record.properties() {
            let Some(key) = mapper.api_name_for(state.index) else {
                continue;
            };
            if !object.has_property(key) {
                log::debug!(
                    "Style {:?} ({}): target has no property {}",
                    record.name,
                    record.family,
                    key
                );
                continue;
            }
            let value = match (
                mapper.context_id_for(state.index).referenced_family(),
                &state.value,
            ) {
                (Some(family), PropertyValue::Str(name)) => PropertyValue::Str(String::from(
                    display_names.display_name_for(family, name),
                )),
                _ => state.value.clone(),
            };
            object.set_property(key, value)?;
        }
        Ok(())
    }
}

/// In-memory styled object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStyle {
    defaults: BTreeMap<String, PropertyValue>,
    direct: BTreeMap<String, PropertyValue>,
    parent: Option<String>,
    rejected: BTreeSet<String>,
    open: bool,
    resets: Vec<String>,
}

impl MemoryStyle {
    /// An object that only knows the keys given defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// An object that accepts any key.
    pub fn open() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    pub fn with_default(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// Make writes of `key` fail.
    pub fn rejecting(mut self, key: impl Into<String>) -> Self {
        self.rejected.insert(key.into());
        self
    }

    /// Explicitly set properties.
    pub fn direct_properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.direct
    }

    /// Keys reset to default, in call order.
    pub fn resets(&self) -> &[String] {
        &self.resets
    }
}

impl StyledObject for MemoryStyle {
    fn has_property(&self, key: &str) -> bool {
        self.open || self.defaults.contains_key(key) || self.direct.contains_key(key)
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), TargetError> {
        if self.rejected.contains(key) {
            return Err(TargetError::new(key, "property is read-only"));
        }
        if !self.has_property(key) {
            return Err(TargetError::new(key, "unknown property"));
        }
        self.direct.insert(String::from(key), value);
        Ok(())
    }

    fn get_property(&self, key: &str) -> Option<PropertyValue> {
        self.direct
            .get(key)
            .or_else(|| self.defaults.get(key))
            .cloned()
    }

    fn property_state(&self, key: &str) -> PropertyStateKind {
        if self.direct.contains_key(key) {
            PropertyStateKind::Direct
        } else {
            PropertyStateKind::Default
        }
    }

    fn reset_to_default(&mut self, key: &str) -> Result<(), TargetError> {
        self.direct.remove(key);
        self.resets.push(String::from(key));
        Ok(())
    }

    fn set_parent_style(&mut self, name: &str) -> Result<(), TargetError> {
        self.parent = Some(String::from(name));
        Ok(())
    }

    fn parent_style(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// In-memory style family.
#[derive(Clone, Debug, Default)]
pub struct MemoryStyleContainer {
    template: MemoryStyle,
    styles: BTreeMap<String, MemoryStyle>,
    insert_order: Vec<String>,
    read_only: bool,
}

impl MemoryStyleContainer {
    /// New objects are clones of `template`.
    pub fn new(template: MemoryStyle) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    /// A container whose `create` and `insert` always fail.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Insert a pre-existing style.
    pub fn with_style(mut self, name: impl Into<String>, style: MemoryStyle) -> Self {
        let name = name.into();
        self.insert_order.push(name.clone());
        self.styles.insert(name, style);
        self
    }

    pub fn get(&self, name: &str) -> Option<&MemoryStyle> {
        self.styles.get(name)
    }

    /// Style names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.insert_order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl StyleContainer for MemoryStyleContainer {
    type Object = MemoryStyle;

    fn has(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut MemoryStyle> {
        self.styles.get_mut(name)
    }

    fn create(&self) -> Result<MemoryStyle, TargetError> {
        if self.read_only {
            return Err(TargetError::new("", "container is read-only"));
        }
        Ok(self.template.clone())
    }

    fn insert(&mut self, name: &str, object: MemoryStyle) -> Result<(), TargetError> {
        if self.read_only {
            return Err(TargetError::new(name, "container is read-only"));
        }
        if self.styles.insert(String::from(name), object).is_none() {
            self.insert_order.push(String::from(name));
        }
        Ok(())
    }
}

/// In-memory document style families.
#[derive(Clone, Debug, Default)]
pub struct MemoryStyleFamilies {
    families: BTreeMap<String, MemoryStyleContainer>,
}

impl MemoryStyleFamilies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, name: impl Into<String>, container: MemoryStyleContainer) -> Self {
        self.families.insert(name.into(), container);
        self
    }

    pub fn add_family(&mut self, name: impl Into<String>, container: MemoryStyleContainer) {
        self.families.insert(name.into(), container);
    }

    pub fn family(&self, name: &str) -> Option<&MemoryStyleContainer> {
        self.families.get(name)
    }

    /// Family names in sorted order.
    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }
}

impl StyleFamilies for MemoryStyleFamilies {
    type Container = MemoryStyleContainer;

    fn family_mut(&mut self, name: &str) -> Option<&mut MemoryStyleContainer> {
        self.families.get_mut(name)
    }
}
