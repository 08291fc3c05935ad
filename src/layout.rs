//! Presentation layout inference from placeholder arrangements.
//!
//! A `style:presentation-page-layout` lists the placeholders of a page; the
//! host format has no explicit layout code, so the code is recovered from
//! the number of placeholders, their role names, and (for a few ambiguous
//! shapes) the relative horizontal position of the second and third one.
//!
//! The decision table is order-sensitive and asymmetric. Every branch is
//! kept as written by producers of the format, including the
//! seven-placeholder case.

use core::fmt;

use crate::record::PlaceholderRecord;

/// Inferred layout archetype of a presentation page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Title,
    TitleContent,
    Chart,
    Title2Content,
    TextChart,
    Org,
    TextClip,
    ChartText,
    Tab,
    ClipText,
    TextObj,
    Obj,
    TitleContent2Content,
    TextOverObj,
    TitleContentOverContent,
    Title2ContentContent,
    Title2ContentOverContent,
    ObjText,
    Title4Content,
    TitleOnly,
    /// No recognizable layout.
    None,
    Notes,
    Handout1,
    Handout2,
    Handout3,
    Handout4,
    Handout6,
    VTitleVContentOverVContent,
    VTitleVContent,
    TitleVContent,
    Title2VText,
    Handout9,
    OnlyText,
    FourClipart,
    SixClipart,
}

const CODES: &[(LayoutKind, i32)] = &[
    (LayoutKind::Title, 0),
    (LayoutKind::TitleContent, 1),
    (LayoutKind::Chart, 2),
    (LayoutKind::Title2Content, 3),
    (LayoutKind::TextChart, 4),
    (LayoutKind::Org, 5),
    (LayoutKind::TextClip, 6),
    (LayoutKind::ChartText, 7),
    (LayoutKind::Tab, 8),
    (LayoutKind::ClipText, 9),
    (LayoutKind::TextObj, 10),
    (LayoutKind::Obj, 11),
    (LayoutKind::TitleContent2Content, 12),
    (LayoutKind::TextOverObj, 13),
    (LayoutKind::TitleContentOverContent, 14),
    (LayoutKind::Title2ContentContent, 15),
    (LayoutKind::Title2ContentOverContent, 16),
    (LayoutKind::ObjText, 17),
    (LayoutKind::Title4Content, 18),
    (LayoutKind::TitleOnly, 19),
    (LayoutKind::None, 20),
    (LayoutKind::Notes, 21),
    (LayoutKind::Handout1, 22),
    (LayoutKind::Handout2, 23),
    (LayoutKind::Handout3, 24),
    (LayoutKind::Handout4, 25),
    (LayoutKind::Handout6, 26),
    (LayoutKind::VTitleVContentOverVContent, 27),
    (LayoutKind::VTitleVContent, 28),
    (LayoutKind::TitleVContent, 29),
    (LayoutKind::Title2VText, 30),
    (LayoutKind::Handout9, 31),
    (LayoutKind::OnlyText, 32),
    (LayoutKind::FourClipart, 33),
    (LayoutKind::SixClipart, 34),
];

impl LayoutKind {
    /// Stable numeric layout code.
    pub fn code(self) -> i32 {
        CODES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, code)| *code)
            .unwrap_or(20)
    }

    /// Layout for a numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(kind, _)| *kind)
    }

    /// Whether this is one of the handout arrangements.
    pub fn is_handout(self) -> bool {
        matches!(
            self,
            Self::Handout1
                | Self::Handout2
                | Self::Handout3
                | Self::Handout4
                | Self::Handout6
                | Self::Handout9
        )
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Infer the layout of a page from its placeholders, in document order.
///
/// Pure and total: shapes the table does not know resolve to
/// [`LayoutKind::None`]. Position comparisons are strict, so equal `x`
/// values take the "else" branch.
pub fn infer_layout(placeholders: &[PlaceholderRecord]) -> LayoutKind {
    let Some(first) = placeholders.first() else {
        return LayoutKind::None;
    };
    let count = placeholders.len();

    if first.name == "handout" {
        return match count {
            1 => LayoutKind::Handout1,
            2 => LayoutKind::Handout2,
            3 => LayoutKind::Handout3,
            4 => LayoutKind::Handout4,
            9 => LayoutKind::Handout9,
            _ => LayoutKind::Handout6,
        };
    }

    let name = |i: usize| placeholders[i].name.as_str();
    let left_of = |a: usize, b: usize| placeholders[a].x < placeholders[b].x;

    let kind = match count {
        1 => {
            if first.name == "title" {
                LayoutKind::TitleOnly
            } else {
                LayoutKind::OnlyText
            }
        }
        2 => match name(1) {
            "subtitle" => LayoutKind::Title,
            "outline" => LayoutKind::TitleContent,
            "chart" => LayoutKind::Chart,
            "table" => LayoutKind::Tab,
            "object" => LayoutKind::Obj,
            "vertical_outline" => {
                if first.name == "vertical_title" {
                    LayoutKind::VTitleVContent
                } else {
                    LayoutKind::TitleVContent
                }
            }
            _ => LayoutKind::Notes,
        },
        3 => match (name(1), name(2)) {
            ("outline", "outline") => LayoutKind::Title2Content,
            ("outline", "chart") => LayoutKind::TextChart,
            ("outline", "graphic") => LayoutKind::TextClip,
            // outline left, object right / outline top, object below
            ("outline", _) if left_of(1, 2) => LayoutKind::TextObj,
            ("outline", _) => LayoutKind::TextOverObj,
            ("chart", _) => LayoutKind::ChartText,
            ("graphic", "vertical_outline") => LayoutKind::Title2VText,
            ("graphic", _) => LayoutKind::ClipText,
            ("vertical_outline", _) => LayoutKind::VTitleVContentOverVContent,
            _ if left_of(1, 2) => LayoutKind::ObjText,
            _ => LayoutKind::TitleContentOverContent,
        },
        4 => {
            if name(1) == "object" {
                if left_of(1, 2) {
                    LayoutKind::Title2ContentOverContent
                } else {
                    LayoutKind::Title2ContentContent
                }
            } else {
                LayoutKind::TitleContent2Content
            }
        }
        5 => {
            if name(1) == "object" {
                LayoutKind::Title4Content
            } else {
                LayoutKind::FourClipart
            }
        }
        // Six content placeholders plus a title would suggest a six-content
        // layout, but readers of the format expect the four-clipart code.
        7 => LayoutKind::FourClipart,
        _ => LayoutKind::None,
    };
    if kind == LayoutKind::None {
        log::debug!(
            "No layout matches {} placeholders starting with {:?}",
            count,
            first.name
        );
    }
    kind
}
