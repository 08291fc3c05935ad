//! Streaming import of OpenDocument style sections.
//!
//! `odf-styles` reads the style parts of an ODF document (`office:styles`,
//! `office:automatic-styles`, `office:master-styles`) into typed records,
//! then materializes them onto a document model behind the
//! [`StyleFamilies`] / [`StyleContainer`] / [`StyledObject`] traits.
//!
//! ```no_run
//! use odf_styles::{import_styles_xml, ImportOptions, MapperApplier, MemoryStyleFamilies};
//!
//! let xml = std::fs::read("styles.xml")?;
//! let mut styles = import_styles_xml(&xml, ImportOptions::default())?;
//! for (name, kind) in styles.page_layouts() {
//!     println!("{name}: {kind}");
//! }
//! let mut families = MemoryStyleFamilies::new();
//! let report = styles.apply(&mut families, &MapperApplier);
//! println!("{} styles created", report.created);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod collection;
pub mod context;
pub mod error;
pub mod family;
pub mod importer;
pub mod layout;
pub mod property;
pub mod record;
pub mod target;
pub mod units;

pub use collection::{strip_scope_prefix, ApplyReport, DuplicatePolicy, StyleCollection, StyleScope};
pub use context::{DateTimeDecl, DisplayNameRegistry, FormatKeyTable, ImportContext};
pub use error::{ImportPhase, ImportWarning, StyleError, TargetError};
pub use family::{Namespace, NamespaceMap, StyleFamily};
pub use importer::{
    import_styles_xml, DocumentKind, ImportLimits, ImportOptions, ImportedStyles, StylesImporter,
};
pub use layout::{infer_layout, LayoutKind};
pub use property::{
    builtin_mapper, ContextId, PropertyEntry, PropertyMapper, PropertyState, PropertyValue,
    TablePropertyMapper, ValueKind,
};
pub use record::{
    MasterPageRecord, NumberStyleKind, NumberStyleRecord, Orientation, PageLayoutRecord,
    PageMasterRecord, PlaceholderRecord, StyleRecord,
};
pub use target::{
    MapperApplier, MemoryStyle, MemoryStyleContainer, MemoryStyleFamilies, PropertyApplier,
    PropertyStateKind, StyleContainer, StyleFamilies, StyledObject,
};
