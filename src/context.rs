//! Import-wide state shared across style scopes.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::family::StyleFamily;

/// Family-scoped `name -> display name` mapping.
///
/// Only names whose display name differs are stored; lookups of anything
/// else return the name unchanged.
#[derive(Clone, Debug, Default)]
pub struct DisplayNameRegistry {
    names: BTreeMap<(StyleFamily, String), String>,
}

impl DisplayNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a display name. Identity mappings are not stored.
    pub fn register(
        &mut self,
        family: StyleFamily,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) {
        let name = name.into();
        let display_name = display_name.into();
        if name == display_name {
            return;
        }
        self.names.insert((family, name), display_name);
    }

    /// Display name for `name`, or `name` itself when unregistered.
    pub fn display_name_for<'a>(&'a self, family: StyleFamily, name: &'a str) -> &'a str {
        self.names
            .get(&(family, String::from(name)))
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A `presentation:date-time-decl`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateTimeDecl {
    /// Fixed text shown when `fixed` is set.
    pub text: String,
    /// Whether the declaration shows fixed text instead of the current date.
    pub fixed: bool,
    /// Name of the data style formatting the current date.
    pub format: Option<String>,
}

fn key_for_slot(slot: usize) -> u32 {
    u32::try_from(slot.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Interned format codes.
///
/// Equal codes share a key. Keys start at 1; 0 is reserved for
/// "unresolved".
#[derive(Clone, Debug, Default)]
pub struct FormatKeyTable {
    codes: Vec<String>,
}

impl FormatKeyTable {
    /// Key for `code`, interning it on first use.
    pub fn intern(&mut self, code: &str) -> u32 {
        if let Some(pos) = self.codes.iter().position(|c| c == code) {
            return key_for_slot(pos);
        }
        self.codes.push(String::from(code));
        key_for_slot(self.codes.len() - 1)
    }

    /// Format code for `key`.
    pub fn code(&self, key: u32) -> Option<&str> {
        let slot = (key as usize).checked_sub(1)?;
        self.codes.get(slot).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Explicit import context.
///
/// Holds the state the style scopes share: display names, header/footer
/// declarations, interned format keys and the master-page counter.
#[derive(Clone, Debug, Default)]
pub struct ImportContext {
    pub display_names: DisplayNameRegistry,
    pub format_keys: FormatKeyTable,
    header_decls: BTreeMap<String, String>,
    footer_decls: BTreeMap<String, String>,
    date_time_decls: BTreeMap<String, DateTimeDecl>,
    master_page_count: usize,
}

impl ImportContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_header_decl(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.header_decls.insert(name.into(), text.into());
    }

    pub fn add_footer_decl(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.footer_decls.insert(name.into(), text.into());
    }

    pub fn add_date_time_decl(&mut self, name: impl Into<String>, decl: DateTimeDecl) {
        self.date_time_decls.insert(name.into(), decl);
    }

    pub fn header_decl(&self, name: &str) -> Option<&str> {
        self.header_decls.get(name).map(String::as_str)
    }

    pub fn footer_decl(&self, name: &str) -> Option<&str> {
        self.footer_decls.get(name).map(String::as_str)
    }

    pub fn date_time_decl(&self, name: &str) -> Option<&DateTimeDecl> {
        self.date_time_decls.get(name)
    }

    /// Claim the next master-page ordinal.
    pub fn next_master_page(&mut self) -> usize {
        let ordinal = self.master_page_count;
        self.master_page_count += 1;
        ordinal
    }

    /// Number of non-handout master pages seen so far.
    pub fn master_page_count(&self) -> usize {
        self.master_page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_names_map_to_themselves() {
        let mut registry = DisplayNameRegistry::new();
        registry.register(StyleFamily::Graphics, "a_20_b", "a b");
        registry.register(StyleFamily::Graphics, "same", "same");
        assert_eq!(registry.display_name_for(StyleFamily::Graphics, "a_20_b"), "a b");
        assert_eq!(registry.display_name_for(StyleFamily::Presentation, "a_20_b"), "a_20_b");
        assert_eq!(registry.display_name_for(StyleFamily::Graphics, "other"), "other");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn format_keys_start_at_one_and_are_shared() {
        let mut keys = FormatKeyTable::default();
        assert_eq!(keys.intern("D.M.YY"), 1);
        assert_eq!(keys.intern("HH:MM"), 2);
        assert_eq!(keys.intern("D.M.YY"), 1);
        assert_eq!(keys.code(2), Some("HH:MM"));
        assert_eq!(keys.code(0), None);
        assert_eq!(key_for_slot(usize::MAX), u32::MAX);
    }

    #[test]
    fn master_page_counter_is_sequential() {
        let mut ctx = ImportContext::new();
        assert_eq!(ctx.next_master_page(), 0);
        assert_eq!(ctx.next_master_page(), 1);
        assert_eq!(ctx.master_page_count(), 2);
    }
}
