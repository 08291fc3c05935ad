//! In-memory records produced by the streaming parse.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::family::StyleFamily;
use crate::layout::LayoutKind;
use crate::property::{PropertyState, PropertyValue};

/// One parsed style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRecord {
    /// Family tag.
    pub family: StyleFamily,
    /// Key within `(family, scope)`.
    pub name: String,
    /// Human-facing name; equals `name` unless the markup says otherwise.
    pub display_name: String,
    /// Parent style name in the same family.
    pub parent_name: Option<String>,
    /// Whether this is the family's default-property seed.
    pub is_default: bool,
    properties: Vec<PropertyState>,
}

impl StyleRecord {
    /// Create a named style with no properties.
    pub fn new(family: StyleFamily, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            family,
            display_name: name.clone(),
            name,
            parent_name: None,
            is_default: false,
            properties: Vec::with_capacity(0),
        }
    }

    /// Create the default-property seed for a family.
    pub fn default_style(family: StyleFamily) -> Self {
        Self {
            is_default: true,
            ..Self::new(family, String::new())
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_parent(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    pub fn with_property(mut self, index: usize, value: PropertyValue) -> Self {
        self.set_property(index, value);
        self
    }

    /// Set a property, replacing any earlier value for the same slot.
    pub fn set_property(&mut self, index: usize, value: PropertyValue) {
        if let Some(existing) = self.properties.iter_mut().find(|p| p.index == index) {
            existing.value = value;
        } else {
            self.properties.push(PropertyState::new(index, value));
        }
    }

    /// Value stored for a slot.
    pub fn property(&self, index: usize) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.index == index)
            .map(|p| &p.value)
    }

    /// Properties in the order they were set.
    pub fn properties(&self) -> &[PropertyState] {
        &self.properties
    }

    /// Name alongside mutable properties, for patching values in place.
    pub(crate) fn name_and_properties_mut(&mut self) -> (&str, &mut [PropertyState]) {
        (&self.name, &mut self.properties)
    }

    /// This record with `seed` in front of its own properties.
    ///
    /// Seed slots that the record sets itself are dropped, so explicit values
    /// win. The record itself is left as parsed.
    pub fn seeded(&self, seed: &[PropertyState]) -> Cow<'_, StyleRecord> {
        let inherited: Vec<PropertyState> = seed
            .iter()
            .filter(|s| self.property(s.index).is_none())
            .cloned()
            .collect();
        if inherited.is_empty() {
            return Cow::Borrowed(self);
        }
        let mut merged = self.clone();
        merged.properties = inherited;
        merged.properties.extend(self.properties.iter().cloned());
        Cow::Owned(merged)
    }
}

/// One structural placeholder of a presentation page layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaceholderRecord {
    /// Role label (`title`, `outline`, `subtitle`, ...).
    pub name: String,
    /// Horizontal offset in 1/100 mm.
    pub x: i32,
}

impl PlaceholderRecord {
    pub fn new(name: impl Into<String>, x: i32) -> Self {
        Self {
            name: name.into(),
            x,
        }
    }
}

/// Inferred layout of a `style:presentation-page-layout`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLayoutRecord {
    pub name: String,
    pub kind: LayoutKind,
}

/// Paper orientation of a page master.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Physical page geometry from `style:page-layout`. Lengths are 1/100 mm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMasterRecord {
    pub name: String,
    pub margin_top: i32,
    pub margin_bottom: i32,
    pub margin_left: i32,
    pub margin_right: i32,
    pub width: i32,
    pub height: i32,
    pub orientation: Orientation,
}

impl PageMasterRecord {
    pub fn new(name: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            margin_top: 0,
            margin_bottom: 0,
            margin_left: 0,
            margin_right: 0,
            width: 0,
            height: 0,
            orientation,
        }
    }
}

/// Kind of a parsed data style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberStyleKind {
    Date,
    Time,
}

/// A `number:date-style` / `number:time-style` with its resolved key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberStyleRecord {
    pub name: String,
    pub kind: NumberStyleKind,
    /// Format code assembled from the style's child elements.
    pub format_code: String,
    /// Numeric key; never 0 for a parsed style.
    pub key: u32,
}

/// A `style:master-page` or `style:handout-master`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MasterPageRecord {
    pub name: String,
    pub display_name: String,
    pub page_layout_name: Option<String>,
    pub style_name: Option<String>,
    pub presentation_page_layout_name: Option<String>,
    pub use_header_name: Option<String>,
    pub use_footer_name: Option<String>,
    pub use_date_time_name: Option<String>,
    pub is_handout: bool,
    /// Position among non-handout master pages, counted from 0.
    pub ordinal: Option<usize>,
}
