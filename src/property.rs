//! Property values and per-family property-set mappers.
//!
//! A mapper translates markup attributes into stable slot indices and knows
//! the API key each slot is written under on a document-model object. The
//! built-in tables cover the attributes the importer itself needs; callers
//! may register their own [`PropertyMapper`] per family.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::family::{Namespace, StyleFamily};
use crate::units::{parse_color, parse_measure_mm100, parse_percent};

/// Typed property value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl PropertyValue {
    /// Boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{:?}", v),
        }
    }
}

/// One `(slot, value)` pair of a style record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyState {
    /// Stable slot id from the family mapper.
    pub index: usize,
    /// Parsed value.
    pub value: PropertyValue,
}

impl PropertyState {
    pub fn new(index: usize, value: PropertyValue) -> Self {
        Self { index, value }
    }
}

/// Semantic tag attached to a mapper slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextId {
    /// No special handling.
    None,
    /// Holds a data-style name until the finishing pass turns it into a key.
    DateTimeFormat,
    /// Taken from a `presentation:sound` child element.
    PageSoundUrl,
    DashName,
    LineStartName,
    LineEndName,
    FillGradientName,
    FillTransparenceName,
    FillHatchName,
    FillBitmapName,
}

impl ContextId {
    /// Family of the style a name-reference slot points at.
    pub fn referenced_family(self) -> Option<StyleFamily> {
        match self {
            Self::DashName => Some(StyleFamily::StrokeDash),
            Self::LineStartName | Self::LineEndName => Some(StyleFamily::Marker),
            Self::FillGradientName | Self::FillTransparenceName => Some(StyleFamily::Gradient),
            Self::FillHatchName => Some(StyleFamily::Hatch),
            Self::FillBitmapName => Some(StyleFamily::FillImage),
            Self::None | Self::DateTimeFormat | Self::PageSoundUrl => None,
        }
    }
}

/// How a raw attribute string becomes a [`PropertyValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// `true` / `false`.
    Bool,
    /// `true` when the attribute equals the given token.
    BoolToken(&'static str),
    Integer,
    /// Length converted to 1/100 mm.
    Measure,
    /// `#rrggbb` packed into an integer.
    Color,
    Percent,
    String,
    /// Token looked up in a fixed table.
    Enum(&'static [(&'static str, i64)]),
}

impl ValueKind {
    /// Parse `raw` according to this kind.
    pub fn parse(self, raw: &str) -> Option<PropertyValue> {
        let raw = raw.trim();
        match self {
            Self::Bool => match raw {
                "true" => Some(PropertyValue::Bool(true)),
                "false" => Some(PropertyValue::Bool(false)),
                _ => None,
            },
            Self::BoolToken(token) => Some(PropertyValue::Bool(raw == token)),
            Self::Integer => raw.parse().ok().map(PropertyValue::Int),
            Self::Measure => parse_measure_mm100(raw).map(|v| PropertyValue::Int(v.into())),
            Self::Color => parse_color(raw).map(|v| PropertyValue::Int(v.into())),
            Self::Percent => parse_percent(raw).map(|v| PropertyValue::Int(v.into())),
            Self::String => Some(PropertyValue::Str(raw.into())),
            Self::Enum(table) => table
                .iter()
                .find(|(token, _)| *token == raw)
                .map(|(_, v)| PropertyValue::Int(*v)),
        }
    }
}

/// Read-only view of a family's property-set mapping.
pub trait PropertyMapper {
    /// Number of slots; valid indices are `0..entry_count()`.
    fn entry_count(&self) -> usize;

    /// Slot for a markup attribute.
    fn index_for(&self, ns: Namespace, local_name: &str) -> Option<usize>;

    /// Semantic tag of a slot.
    fn context_id_for(&self, index: usize) -> ContextId;

    /// API key a slot is written under.
    fn api_name_for(&self, index: usize) -> Option<&str>;

    /// Parse a raw attribute value for a slot.
    fn parse_value(&self, index: usize, raw: &str) -> Option<PropertyValue>;

    /// Slot whose semantic tag is `context`.
    fn index_for_context(&self, context: ContextId) -> Option<usize> {
        (0..self.entry_count()).find(|&index| self.context_id_for(index) == context)
    }
}

/// One row of a [`TablePropertyMapper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    pub namespace: Namespace,
    pub local_name: &'static str,
    pub api_name: &'static str,
    pub kind: ValueKind,
    pub context: ContextId,
}

const fn entry(
    namespace: Namespace,
    local_name: &'static str,
    api_name: &'static str,
    kind: ValueKind,
) -> PropertyEntry {
    PropertyEntry {
        namespace,
        local_name,
        api_name,
        kind,
        context: ContextId::None,
    }
}

const fn tagged(
    namespace: Namespace,
    local_name: &'static str,
    api_name: &'static str,
    kind: ValueKind,
    context: ContextId,
) -> PropertyEntry {
    PropertyEntry {
        namespace,
        local_name,
        api_name,
        kind,
        context,
    }
}

/// Mapper backed by a static entry table; the slot index is the row index.
#[derive(Clone, Copy, Debug)]
pub struct TablePropertyMapper {
    entries: &'static [PropertyEntry],
}

impl TablePropertyMapper {
    pub const fn new(entries: &'static [PropertyEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [PropertyEntry] {
        self.entries
    }
}

impl PropertyMapper for TablePropertyMapper {
    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn index_for(&self, ns: Namespace, local_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.namespace == ns && e.local_name == local_name)
    }

    fn context_id_for(&self, index: usize) -> ContextId {
        self.entries
            .get(index)
            .map(|e| e.context)
            .unwrap_or(ContextId::None)
    }

    fn api_name_for(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.api_name)
    }

    fn parse_value(&self, index: usize, raw: &str) -> Option<PropertyValue> {
        self.entries.get(index).and_then(|e| e.kind.parse(raw))
    }
}

const FILL_STYLE: &[(&str, i64)] = &[
    ("none", 0),
    ("solid", 1),
    ("gradient", 2),
    ("hatch", 3),
    ("bitmap", 4),
];
const LINE_STYLE: &[(&str, i64)] = &[("none", 0), ("solid", 1), ("dash", 2)];
const TEXT_VERTICAL_ADJUST: &[(&str, i64)] = &[
    ("top", 0),
    ("middle", 1),
    ("center", 1),
    ("bottom", 2),
    ("justify", 3),
];
const TRANSITION_SPEED: &[(&str, i64)] = &[("slow", 0), ("medium", 1), ("fast", 2)];
const PARA_ADJUST: &[(&str, i64)] = &[
    ("start", 0),
    ("left", 0),
    ("end", 1),
    ("right", 1),
    ("justify", 2),
    ("center", 3),
];

/// Graphic and presentation object properties.
pub static GRAPHICS_PROPERTIES: &[PropertyEntry] = &[
    entry(Namespace::Draw, "auto-grow-height", "TextAutoGrowHeight", ValueKind::Bool),
    entry(Namespace::Draw, "auto-grow-width", "TextAutoGrowWidth", ValueKind::Bool),
    entry(Namespace::Draw, "fill", "FillStyle", ValueKind::Enum(FILL_STYLE)),
    entry(Namespace::Draw, "fill-color", "FillColor", ValueKind::Color),
    tagged(
        Namespace::Draw,
        "fill-gradient-name",
        "FillGradientName",
        ValueKind::String,
        ContextId::FillGradientName,
    ),
    tagged(
        Namespace::Draw,
        "fill-hatch-name",
        "FillHatchName",
        ValueKind::String,
        ContextId::FillHatchName,
    ),
    tagged(
        Namespace::Draw,
        "fill-image-name",
        "FillBitmapName",
        ValueKind::String,
        ContextId::FillBitmapName,
    ),
    tagged(
        Namespace::Draw,
        "opacity-name",
        "FillTransparenceGradientName",
        ValueKind::String,
        ContextId::FillTransparenceName,
    ),
    entry(Namespace::Draw, "stroke", "LineStyle", ValueKind::Enum(LINE_STYLE)),
    entry(Namespace::Svg, "stroke-color", "LineColor", ValueKind::Color),
    entry(Namespace::Svg, "stroke-width", "LineWidth", ValueKind::Measure),
    tagged(
        Namespace::Draw,
        "stroke-dash",
        "LineDashName",
        ValueKind::String,
        ContextId::DashName,
    ),
    tagged(
        Namespace::Draw,
        "marker-start",
        "LineStartName",
        ValueKind::String,
        ContextId::LineStartName,
    ),
    tagged(
        Namespace::Draw,
        "marker-end",
        "LineEndName",
        ValueKind::String,
        ContextId::LineEndName,
    ),
    entry(
        Namespace::Draw,
        "textarea-vertical-align",
        "TextVerticalAdjust",
        ValueKind::Enum(TEXT_VERTICAL_ADJUST),
    ),
    entry(Namespace::Fo, "padding-left", "TextLeftDistance", ValueKind::Measure),
    entry(Namespace::Fo, "padding-right", "TextRightDistance", ValueKind::Measure),
    entry(Namespace::Fo, "padding-top", "TextUpperDistance", ValueKind::Measure),
    entry(Namespace::Fo, "padding-bottom", "TextLowerDistance", ValueKind::Measure),
    entry(Namespace::Fo, "min-height", "TextMinFrameHeight", ValueKind::Measure),
    entry(Namespace::Draw, "shadow", "Shadow", ValueKind::BoolToken("visible")),
    entry(Namespace::Fo, "color", "CharColor", ValueKind::Color),
    entry(Namespace::Fo, "font-weight", "CharWeight", ValueKind::String),
    entry(Namespace::Fo, "text-align", "ParaAdjust", ValueKind::Enum(PARA_ADJUST)),
];

/// Drawing-page properties.
pub static DRAWING_PAGE_PROPERTIES: &[PropertyEntry] = &[
    entry(Namespace::Presentation, "display-header", "IsHeaderVisible", ValueKind::Bool),
    entry(Namespace::Presentation, "display-footer", "IsFooterVisible", ValueKind::Bool),
    entry(
        Namespace::Presentation,
        "display-page-number",
        "IsPageNumberVisible",
        ValueKind::Bool,
    ),
    entry(
        Namespace::Presentation,
        "display-date-time",
        "IsDateTimeVisible",
        ValueKind::Bool,
    ),
    tagged(
        Namespace::Style,
        "data-style-name",
        "DateTimeFormat",
        ValueKind::String,
        ContextId::DateTimeFormat,
    ),
    entry(
        Namespace::Presentation,
        "transition-speed",
        "Speed",
        ValueKind::Enum(TRANSITION_SPEED),
    ),
    entry(Namespace::Presentation, "duration", "Duration", ValueKind::String),
    tagged(
        Namespace::Presentation,
        "sound",
        "Sound",
        ValueKind::String,
        ContextId::PageSoundUrl,
    ),
    entry(
        Namespace::Presentation,
        "background-visible",
        "IsBackgroundVisible",
        ValueKind::Bool,
    ),
    entry(
        Namespace::Presentation,
        "background-objects-visible",
        "IsBackgroundObjectsVisible",
        ValueKind::Bool,
    ),
    entry(
        Namespace::Presentation,
        "visibility",
        "Visible",
        ValueKind::BoolToken("visible"),
    ),
    entry(Namespace::Draw, "fill", "FillStyle", ValueKind::Enum(FILL_STYLE)),
    entry(Namespace::Draw, "fill-color", "FillColor", ValueKind::Color),
    tagged(
        Namespace::Draw,
        "fill-gradient-name",
        "FillGradientName",
        ValueKind::String,
        ContextId::FillGradientName,
    ),
    tagged(
        Namespace::Draw,
        "fill-hatch-name",
        "FillHatchName",
        ValueKind::String,
        ContextId::FillHatchName,
    ),
    tagged(
        Namespace::Draw,
        "fill-image-name",
        "FillBitmapName",
        ValueKind::String,
        ContextId::FillBitmapName,
    ),
    tagged(
        Namespace::Draw,
        "opacity-name",
        "FillTransparenceGradientName",
        ValueKind::String,
        ContextId::FillTransparenceName,
    ),
];

/// Table cell properties.
pub static TABLE_CELL_PROPERTIES: &[PropertyEntry] = &[
    entry(Namespace::Fo, "background-color", "BackColor", ValueKind::Color),
    entry(Namespace::Fo, "padding-left", "TextLeftDistance", ValueKind::Measure),
    entry(Namespace::Fo, "padding-right", "TextRightDistance", ValueKind::Measure),
    entry(Namespace::Fo, "padding-top", "TextUpperDistance", ValueKind::Measure),
    entry(Namespace::Fo, "padding-bottom", "TextLowerDistance", ValueKind::Measure),
    entry(
        Namespace::Style,
        "vertical-align",
        "TextVerticalAdjust",
        ValueKind::Enum(TEXT_VERTICAL_ADJUST),
    ),
    entry(Namespace::Fo, "border", "Border", ValueKind::String),
    entry(Namespace::Fo, "wrap-option", "TextWordWrap", ValueKind::BoolToken("wrap")),
    entry(Namespace::Draw, "auto-grow-height", "TextAutoGrowHeight", ValueKind::Bool),
];

/// Table row properties.
pub static TABLE_ROW_PROPERTIES: &[PropertyEntry] = &[
    entry(Namespace::Style, "row-height", "Height", ValueKind::Measure),
    entry(Namespace::Style, "min-row-height", "MinHeight", ValueKind::Measure),
    entry(
        Namespace::Style,
        "use-optimal-row-height",
        "IsAutoHeight",
        ValueKind::Bool,
    ),
];

/// Table column properties.
pub static TABLE_COLUMN_PROPERTIES: &[PropertyEntry] = &[
    entry(Namespace::Style, "column-width", "Width", ValueKind::Measure),
    entry(
        Namespace::Style,
        "use-optimal-column-width",
        "OptimalWidth",
        ValueKind::Bool,
    ),
];

/// Paragraph and text properties.
pub static TEXT_PROPERTIES: &[PropertyEntry] = &[
    entry(Namespace::Fo, "color", "CharColor", ValueKind::Color),
    entry(Namespace::Fo, "font-weight", "CharWeight", ValueKind::String),
    entry(Namespace::Fo, "text-align", "ParaAdjust", ValueKind::Enum(PARA_ADJUST)),
    entry(Namespace::Fo, "margin-left", "ParaLeftMargin", ValueKind::Measure),
    entry(Namespace::Fo, "margin-right", "ParaRightMargin", ValueKind::Measure),
];

/// Built-in mapper for a family, if the importer knows one.
pub fn builtin_mapper(family: StyleFamily) -> Option<Arc<dyn PropertyMapper>> {
    let entries: &'static [PropertyEntry] = match family {
        StyleFamily::Graphics | StyleFamily::Presentation => GRAPHICS_PROPERTIES,
        StyleFamily::DrawingPage => DRAWING_PAGE_PROPERTIES,
        StyleFamily::TableCell => TABLE_CELL_PROPERTIES,
        StyleFamily::TableRow => TABLE_ROW_PROPERTIES,
        StyleFamily::TableColumn => TABLE_COLUMN_PROPERTIES,
        StyleFamily::Paragraph | StyleFamily::Text => TEXT_PROPERTIES,
        StyleFamily::PageMaster
        | StyleFamily::MasterPage
        | StyleFamily::PresentationPageLayout
        | StyleFamily::DataStyle
        | StyleFamily::StrokeDash
        | StyleFamily::Marker
        | StyleFamily::Gradient
        | StyleFamily::Hatch
        | StyleFamily::FillImage => return None,
    };
    Some(Arc::new(TablePropertyMapper::new(entries)))
}
