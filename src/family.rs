//! Style families and markup namespaces.

use core::fmt;

/// Closed set of stylable object categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleFamily {
    /// Drawing page (slide background, transitions, header/footer flags).
    DrawingPage,
    /// Graphic objects.
    Graphics,
    /// Presentation objects (master-page scoped outline/title styles).
    Presentation,
    /// Table cells.
    TableCell,
    /// Table rows.
    TableRow,
    /// Table columns.
    TableColumn,
    /// Paragraphs.
    Paragraph,
    /// Text spans.
    Text,
    /// Physical page geometry (`style:page-layout`).
    PageMaster,
    /// Master pages.
    MasterPage,
    /// Presentation page layouts (placeholder arrangements).
    PresentationPageLayout,
    /// Number, date and time formats.
    DataStyle,
    /// Named line dash definitions (`draw:stroke-dash`).
    StrokeDash,
    /// Named line-end markers (`draw:marker`).
    Marker,
    /// Named gradients, including opacity gradients.
    Gradient,
    /// Named hatches.
    Hatch,
    /// Named fill bitmaps.
    FillImage,
}

impl StyleFamily {
    /// Parse a `style:family` attribute value.
    ///
    /// Only families that may appear on `style:style` / `style:default-style`
    /// are accepted; container-only families return `None`.
    pub fn from_markup(value: &str) -> Option<Self> {
        match value {
            "drawing-page" => Some(Self::DrawingPage),
            "graphic" | "graphics" => Some(Self::Graphics),
            "presentation" => Some(Self::Presentation),
            "table-cell" => Some(Self::TableCell),
            "table-row" => Some(Self::TableRow),
            "table-column" => Some(Self::TableColumn),
            "paragraph" => Some(Self::Paragraph),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Canonical markup name.
    pub fn markup_name(self) -> &'static str {
        match self {
            Self::DrawingPage => "drawing-page",
            Self::Graphics => "graphic",
            Self::Presentation => "presentation",
            Self::TableCell => "table-cell",
            Self::TableRow => "table-row",
            Self::TableColumn => "table-column",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::PageMaster => "page-layout",
            Self::MasterPage => "master-page",
            Self::PresentationPageLayout => "presentation-page-layout",
            Self::DataStyle => "data-style",
            Self::StrokeDash => "stroke-dash",
            Self::Marker => "marker",
            Self::Gradient => "gradient",
            Self::Hatch => "hatch",
            Self::FillImage => "fill-image",
        }
    }
}

impl fmt::Display for StyleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.markup_name())
    }
}

/// Markup namespaces understood by the importer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Office,
    Style,
    Draw,
    Presentation,
    Svg,
    Fo,
    Table,
    Number,
    Text,
    XLink,
    LoExt,
    /// Any namespace the importer does not interpret.
    Unknown,
}

const KNOWN_NAMESPACES: &[(&str, &str, Namespace)] = &[
    (
        "office",
        "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
        Namespace::Office,
    ),
    (
        "style",
        "urn:oasis:names:tc:opendocument:xmlns:style:1.0",
        Namespace::Style,
    ),
    (
        "draw",
        "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0",
        Namespace::Draw,
    ),
    (
        "presentation",
        "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0",
        Namespace::Presentation,
    ),
    (
        "svg",
        "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0",
        Namespace::Svg,
    ),
    (
        "fo",
        "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
        Namespace::Fo,
    ),
    (
        "table",
        "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
        Namespace::Table,
    ),
    (
        "number",
        "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0",
        Namespace::Number,
    ),
    (
        "text",
        "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
        Namespace::Text,
    ),
    ("xlink", "http://www.w3.org/1999/xlink", Namespace::XLink),
    (
        "loext",
        "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0",
        Namespace::LoExt,
    ),
];

impl Namespace {
    /// Namespace for a well-known namespace URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        KNOWN_NAMESPACES
            .iter()
            .find(|(_, known, _)| *known == uri)
            .map(|(_, _, ns)| *ns)
    }
}

/// Prefix to namespace resolution.
///
/// Seeded with the conventional prefixes; `xmlns:*` declarations naming a
/// known URI add or rebind prefixes.
#[derive(Clone, Debug)]
pub struct NamespaceMap {
    bindings: Vec<(String, Namespace)>,
}

impl Default for NamespaceMap {
    fn default() -> Self {
        Self {
            bindings: KNOWN_NAMESPACES
                .iter()
                .map(|(prefix, _, ns)| ((*prefix).to_string(), *ns))
                .collect(),
        }
    }
}

impl NamespaceMap {
    /// Bind `prefix` to the namespace identified by `uri`.
    ///
    /// Unknown URIs bind the prefix to [`Namespace::Unknown`], including
    /// conventional prefixes that a document redeclares.
    pub fn declare(&mut self, prefix: &str, uri: &str) {
        let ns = Namespace::from_uri(uri).unwrap_or(Namespace::Unknown);
        if let Some(binding) = self.bindings.iter_mut().find(|(p, _)| p == prefix) {
            binding.1 = ns;
        } else {
            self.bindings.push((prefix.to_string(), ns));
        }
    }

    /// Namespace bound to `prefix`.
    pub fn resolve(&self, prefix: &str) -> Namespace {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| *ns)
            .unwrap_or(Namespace::Unknown)
    }

    /// Split a qualified name and resolve its prefix.
    pub fn split<'a>(&self, qname: &'a str) -> (Namespace, &'a str) {
        match qname.split_once(':') {
            Some((prefix, local)) => (self.resolve(prefix), local),
            None => (Namespace::Unknown, qname),
        }
    }
}
