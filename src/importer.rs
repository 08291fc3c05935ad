//! Streaming importer for ODF style sections.
//!
//! [`StylesImporter`] consumes element-open / element-close / character
//! events and builds the named and automatic [`StyleCollection`]s, page
//! layouts, data styles, declarations and master pages. [`import_styles_xml`]
//! drives it from a `quick-xml` reader.
//!
//! Parsing only inserts records. Cross-references are patched in
//! [`StylesImporter::finish`], and nothing touches the document model until
//! [`ImportedStyles::apply`].

extern crate alloc;

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use smallvec::SmallVec;

use crate::collection::{ApplyReport, DuplicatePolicy, StyleCollection, StyleScope};
use crate::context::{DateTimeDecl, ImportContext};
use crate::error::{
    ImportPhase, StyleError, CODE_LIMIT, CODE_XML_STRUCTURE, CODE_XML_TOKENIZE,
};
use crate::family::{Namespace, NamespaceMap, StyleFamily};
use crate::layout::{infer_layout, LayoutKind};
use crate::property::{ContextId, PropertyMapper, PropertyValue};
use crate::record::{
    MasterPageRecord, NumberStyleKind, NumberStyleRecord, Orientation, PageLayoutRecord,
    PageMasterRecord, PlaceholderRecord, StyleRecord,
};
use crate::target::{PropertyApplier, StyleFamilies};
use crate::units::parse_measure_mm100;

/// Hard caps applied while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportLimits {
    /// Maximum style records per scope, defaults included.
    pub max_styles_per_scope: usize,
    /// Maximum distinct properties on one style.
    pub max_properties_per_style: usize,
    /// Maximum placeholders in one presentation page layout.
    pub max_placeholders: usize,
    /// Maximum element nesting depth.
    pub max_depth: usize,
    /// Maximum text bytes of one header/footer/date-time declaration.
    pub max_decl_text_bytes: usize,
    /// Maximum text bytes of one literal (`number:text`) inside a data style.
    pub max_data_text_bytes: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_styles_per_scope: 65_536,
            max_properties_per_style: 512,
            max_placeholders: 64,
            max_depth: 256,
            max_decl_text_bytes: 64 * 1024,
            max_data_text_bytes: 4 * 1024,
        }
    }
}

impl ImportLimits {
    /// Conservative limits for constrained targets.
    pub fn embedded() -> Self {
        Self {
            max_styles_per_scope: 1024,
            max_properties_per_style: 64,
            max_placeholders: 16,
            max_depth: 64,
            max_decl_text_bytes: 4 * 1024,
            max_data_text_bytes: 256,
        }
    }
}

/// Kind of document the styles belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentKind {
    #[default]
    Presentation,
    Drawing,
}

/// Importer configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub limits: ImportLimits,
    pub duplicate_policy: DuplicatePolicy,
    pub document_kind: DocumentKind,
}

impl ImportOptions {
    pub fn with_limits(mut self, limits: ImportLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_document_kind(mut self, kind: DocumentKind) -> Self {
        self.document_kind = kind;
        self
    }
}

/// Date/time format building blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DateToken {
    Day,
    Month,
    Year,
    DayOfWeek,
    Hours,
    Minutes,
    Seconds,
    AmPm,
}

impl DateToken {
    fn code(self, long: bool, textual: bool) -> &'static str {
        match (self, long) {
            (Self::Day, true) => "DD",
            (Self::Day, false) => "D",
            (Self::Month, true) if textual => "MMMM",
            (Self::Month, false) if textual => "MMM",
            (Self::Month, true) => "MM",
            (Self::Month, false) => "M",
            (Self::Year, true) => "YYYY",
            (Self::Year, false) => "YY",
            (Self::DayOfWeek, true) => "NNNN",
            (Self::DayOfWeek, false) => "NN",
            (Self::Hours, true) => "HH",
            (Self::Hours, false) => "H",
            (Self::Minutes, true) => "MM",
            (Self::Minutes, false) => "M",
            (Self::Seconds, true) => "SS",
            (Self::Seconds, false) => "S",
            (Self::AmPm, _) => "AM/PM",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeclKind {
    Header,
    Footer,
    DateTime,
}

/// Elements the importer reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ElementKind {
    Styles,
    AutomaticStyles,
    MasterStyles,
    Style,
    DefaultStyle,
    PropertyGroup { drawing_page: bool },
    Sound,
    PageLayout,
    PageLayoutProperties,
    PresentationPageLayout,
    Placeholder,
    DateStyle(NumberStyleKind),
    DateField(DateToken),
    DateText,
    OtherDataStyle,
    Decl(DeclKind),
    DrawResource(StyleFamily),
    MasterPage { handout: bool },
    Other,
}

fn classify(ns: Namespace, local: &str) -> ElementKind {
    match (ns, local) {
        (Namespace::Office, "styles") => ElementKind::Styles,
        (Namespace::Office, "automatic-styles") => ElementKind::AutomaticStyles,
        (Namespace::Office, "master-styles") => ElementKind::MasterStyles,
        (Namespace::Style, "style") => ElementKind::Style,
        (Namespace::Style, "default-style") => ElementKind::DefaultStyle,
        (Namespace::Style, "drawing-page-properties") => {
            ElementKind::PropertyGroup { drawing_page: true }
        }
        (
            Namespace::Style,
            "graphic-properties"
            | "paragraph-properties"
            | "text-properties"
            | "table-cell-properties"
            | "table-row-properties"
            | "table-column-properties",
        ) => ElementKind::PropertyGroup {
            drawing_page: false,
        },
        (Namespace::Presentation, "sound") => ElementKind::Sound,
        (Namespace::Style, "page-layout") => ElementKind::PageLayout,
        (Namespace::Style, "page-layout-properties") => ElementKind::PageLayoutProperties,
        (Namespace::Style, "presentation-page-layout") => ElementKind::PresentationPageLayout,
        (Namespace::Presentation, "placeholder") => ElementKind::Placeholder,
        (Namespace::Number, "date-style") => ElementKind::DateStyle(NumberStyleKind::Date),
        (Namespace::Number, "time-style") => ElementKind::DateStyle(NumberStyleKind::Time),
        (Namespace::Number, "day") => ElementKind::DateField(DateToken::Day),
        (Namespace::Number, "month") => ElementKind::DateField(DateToken::Month),
        (Namespace::Number, "year") => ElementKind::DateField(DateToken::Year),
        (Namespace::Number, "day-of-week") => ElementKind::DateField(DateToken::DayOfWeek),
        (Namespace::Number, "hours") => ElementKind::DateField(DateToken::Hours),
        (Namespace::Number, "minutes") => ElementKind::DateField(DateToken::Minutes),
        (Namespace::Number, "seconds") => ElementKind::DateField(DateToken::Seconds),
        (Namespace::Number, "am-pm") => ElementKind::DateField(DateToken::AmPm),
        (Namespace::Number, "text") => ElementKind::DateText,
        (
            Namespace::Number,
            "number-style" | "currency-style" | "percentage-style" | "boolean-style"
            | "text-style",
        ) => ElementKind::OtherDataStyle,
        (Namespace::Presentation, "header-decl") => ElementKind::Decl(DeclKind::Header),
        (Namespace::Presentation, "footer-decl") => ElementKind::Decl(DeclKind::Footer),
        (Namespace::Presentation, "date-time-decl") => ElementKind::Decl(DeclKind::DateTime),
        (Namespace::Draw, "stroke-dash") => ElementKind::DrawResource(StyleFamily::StrokeDash),
        (Namespace::Draw, "marker") => ElementKind::DrawResource(StyleFamily::Marker),
        (Namespace::Draw, "gradient" | "opacity") => {
            ElementKind::DrawResource(StyleFamily::Gradient)
        }
        (Namespace::Draw, "hatch") => ElementKind::DrawResource(StyleFamily::Hatch),
        (Namespace::Draw, "fill-image") => ElementKind::DrawResource(StyleFamily::FillImage),
        (Namespace::Style, "master-page") => ElementKind::MasterPage { handout: false },
        (Namespace::Style, "handout-master") => ElementKind::MasterPage { handout: true },
        _ => ElementKind::Other,
    }
}

/// Open element state.
#[derive(Debug)]
enum Frame {
    /// Element without own state; children are still interpreted.
    Container,
    /// Subtree ignored entirely.
    Skip,
    Scope(StyleScope),
    MasterStyles,
    Style {
        record: StyleRecord,
        scope: StyleScope,
    },
    Properties {
        drawing_page: bool,
    },
    PageLayout(PageMasterRecord),
    PresentationPageLayout {
        name: String,
        placeholders: Vec<PlaceholderRecord>,
    },
    DateStyle {
        name: String,
        kind: NumberStyleKind,
        code: String,
    },
    DateText(String),
    Decl {
        kind: DeclKind,
        name: String,
        text: String,
        fixed: bool,
        format: Option<String>,
    },
    MasterPage(MasterPageRecord),
}

/// Attribute lookup by resolved namespace.
fn attr<'a, K: AsRef<str>, V: AsRef<str>>(
    namespaces: &NamespaceMap,
    attrs: &'a [(K, V)],
    ns: Namespace,
    local: &str,
) -> Option<&'a str> {
    attrs.iter().find_map(|(key, value)| {
        let (key_ns, key_local) = namespaces.split(key.as_ref());
        (key_ns == ns && key_local == local).then(|| value.as_ref())
    })
}

fn attr_string<K: AsRef<str>, V: AsRef<str>>(
    namespaces: &NamespaceMap,
    attrs: &[(K, V)],
    ns: Namespace,
    local: &str,
) -> Option<String> {
    attr(namespaces, attrs, ns, local).map(ToString::to_string)
}

fn limit_error(kind: &'static str, actual: usize, limit: usize) -> StyleError {
    StyleError::new(
        ImportPhase::Parse,
        CODE_LIMIT,
        format!("{} exceeds limit ({} > {})", kind, actual, limit),
    )
    .with_limit(kind, actual, limit)
}

/// Event-driven style importer.
pub struct StylesImporter {
    options: ImportOptions,
    namespaces: NamespaceMap,
    context: ImportContext,
    named: StyleCollection,
    automatic: StyleCollection,
    master_pages: Vec<MasterPageRecord>,
    stack: SmallVec<[Frame; 16]>,
}

impl StylesImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            namespaces: NamespaceMap::default(),
            context: ImportContext::new(),
            named: StyleCollection::new(StyleScope::Named)
                .with_duplicate_policy(options.duplicate_policy),
            automatic: StyleCollection::new(StyleScope::Automatic)
                .with_duplicate_policy(options.duplicate_policy),
            master_pages: Vec::with_capacity(0),
            stack: SmallVec::new(),
        }
    }

    /// Use `mapper` for `family` in both scopes.
    pub fn set_mapper(&mut self, family: StyleFamily, mapper: Arc<dyn PropertyMapper>) {
        self.named.set_mapper(family, mapper.clone());
        self.automatic.set_mapper(family, mapper);
    }

    /// Current element nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn collection_mut(&mut self, scope: StyleScope) -> &mut StyleCollection {
        match scope {
            StyleScope::Named => &mut self.named,
            StyleScope::Automatic => &mut self.automatic,
        }
    }

    fn collection(&self, scope: StyleScope) -> &StyleCollection {
        match scope {
            StyleScope::Named => &self.named,
            StyleScope::Automatic => &self.automatic,
        }
    }

    /// Scope of the innermost enclosing style section.
    fn current_scope(&self) -> StyleScope {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Scope(scope) => Some(*scope),
                Frame::MasterStyles | Frame::MasterPage(_) => Some(StyleScope::Named),
                _ => None,
            })
            .unwrap_or(StyleScope::Named)
    }

    /// Handle an element-open event.
    ///
    /// `attrs` are `(qualified name, unescaped value)` pairs. `xmlns:*`
    /// declarations among them are applied before the element is
    /// interpreted.
    pub fn start_element<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        qname: &str,
        attrs: &[(K, V)],
    ) -> Result<(), StyleError> {
        for (key, value) in attrs {
            if let Some(prefix) = key.as_ref().strip_prefix("xmlns:") {
                self.namespaces.declare(prefix, value.as_ref());
            }
        }
        if self.stack.len() >= self.options.limits.max_depth {
            return Err(limit_error(
                "max_depth",
                self.stack.len() + 1,
                self.options.limits.max_depth,
            )
            .with_element(qname));
        }
        if matches!(self.stack.last(), Some(Frame::Skip)) {
            self.stack.push(Frame::Skip);
            return Ok(());
        }
        let (ns, local) = self.namespaces.split(qname);
        let frame = match classify(ns, local) {
            ElementKind::Styles => Frame::Scope(StyleScope::Named),
            ElementKind::AutomaticStyles => Frame::Scope(StyleScope::Automatic),
            ElementKind::MasterStyles => Frame::MasterStyles,
            ElementKind::Style => self.open_style(attrs, false),
            ElementKind::DefaultStyle => self.open_style(attrs, true),
            ElementKind::PropertyGroup { drawing_page } => {
                self.read_properties(qname, attrs)?;
                Frame::Properties { drawing_page }
            }
            ElementKind::Sound => {
                self.read_sound(attrs);
                Frame::Skip
            }
            ElementKind::PageLayout => self.open_page_layout(attrs),
            ElementKind::PageLayoutProperties => {
                self.read_page_layout_properties(attrs);
                Frame::Skip
            }
            ElementKind::PresentationPageLayout => Frame::PresentationPageLayout {
                name: attr_string(&self.namespaces, attrs, Namespace::Style, "name")
                    .unwrap_or_default(),
                placeholders: Vec::new(),
            },
            ElementKind::Placeholder => {
                self.read_placeholder(attrs)?;
                Frame::Skip
            }
            ElementKind::DateStyle(kind) => Frame::DateStyle {
                name: attr_string(&self.namespaces, attrs, Namespace::Style, "name")
                    .unwrap_or_default(),
                kind,
                code: String::new(),
            },
            ElementKind::DateField(token) => {
                self.read_date_field(token, attrs);
                Frame::Skip
            }
            ElementKind::DateText => match self.stack.last() {
                Some(Frame::DateStyle { .. }) => Frame::DateText(String::new()),
                _ => Frame::Skip,
            },
            ElementKind::OtherDataStyle => {
                log::debug!("Skipping data style {}", qname);
                Frame::Skip
            }
            ElementKind::Decl(kind) => Frame::Decl {
                kind,
                name: attr_string(&self.namespaces, attrs, Namespace::Presentation, "name")
                    .unwrap_or_default(),
                text: String::new(),
                fixed: attr(&self.namespaces, attrs, Namespace::Presentation, "source")
                    == Some("fixed"),
                format: attr_string(&self.namespaces, attrs, Namespace::Style, "data-style-name"),
            },
            ElementKind::DrawResource(family) => {
                self.register_draw_resource(family, attrs);
                Frame::Skip
            }
            ElementKind::MasterPage { handout } => self.open_master_page(attrs, handout),
            ElementKind::Other => Frame::Container,
        };
        self.stack.push(frame);
        Ok(())
    }

    /// Handle an element-close event.
    pub fn end_element(&mut self, qname: &str) -> Result<(), StyleError> {
        let Some(frame) = self.stack.pop() else {
            return Err(StyleError::new(
                ImportPhase::Parse,
                CODE_XML_STRUCTURE,
                "Element closed without matching open",
            )
            .with_element(qname));
        };
        match frame {
            Frame::Style { record, scope } => self.close_style(record, scope)?,
            Frame::PageLayout(page_master) => {
                let scope = self.current_scope();
                self.collection_mut(scope).add_page_master(page_master);
            }
            Frame::PresentationPageLayout { name, placeholders } => {
                let kind = infer_layout(&placeholders);
                log::debug!(
                    "Page layout {:?}: {} placeholders -> {}",
                    name,
                    placeholders.len(),
                    kind
                );
                let scope = self.current_scope();
                self.collection_mut(scope)
                    .add_page_layout(PageLayoutRecord { name, kind });
            }
            Frame::DateStyle { name, kind, code } => {
                let key = self.context.format_keys.intern(&code);
                let scope = self.current_scope();
                self.collection_mut(scope).add_number_style(NumberStyleRecord {
                    name,
                    kind,
                    format_code: code,
                    key,
                });
            }
            Frame::DateText(text) => {
                if let Some(Frame::DateStyle { code, .. }) = self.stack.last_mut() {
                    if text.chars().any(char::is_alphabetic) {
                        code.push('"');
                        code.push_str(&text);
                        code.push('"');
                    } else {
                        code.push_str(&text);
                    }
                }
            }
            Frame::Decl {
                kind,
                name,
                text,
                fixed,
                format,
            } => match kind {
                DeclKind::Header => self.context.add_header_decl(name, text),
                DeclKind::Footer => self.context.add_footer_decl(name, text),
                DeclKind::DateTime => self.context.add_date_time_decl(
                    name,
                    DateTimeDecl {
                        text,
                        fixed,
                        format,
                    },
                ),
            },
            Frame::MasterPage(master) => self.master_pages.push(master),
            Frame::Container
            | Frame::Skip
            | Frame::Scope(_)
            | Frame::MasterStyles
            | Frame::Properties { .. } => {}
        }
        Ok(())
    }

    /// Handle character data.
    pub fn characters(&mut self, text: &str) -> Result<(), StyleError> {
        let limits = self.options.limits;
        match self.stack.last_mut() {
            Some(Frame::Decl { text: buf, .. }) => {
                let total = buf.len() + text.len();
                if total > limits.max_decl_text_bytes {
                    return Err(limit_error(
                        "max_decl_text_bytes",
                        total,
                        limits.max_decl_text_bytes,
                    ));
                }
                buf.push_str(text);
            }
            Some(Frame::DateText(buf)) => {
                let total = buf.len() + text.len();
                if total > limits.max_data_text_bytes {
                    return Err(limit_error(
                        "max_data_text_bytes",
                        total,
                        limits.max_data_text_bytes,
                    ));
                }
                buf.push_str(text);
            }
            _ => {}
        }
        Ok(())
    }

    /// Close the stream and run the finishing pass.
    pub fn finish(mut self) -> Result<ImportedStyles, StyleError> {
        if !self.stack.is_empty() {
            return Err(StyleError::new(
                ImportPhase::Finish,
                CODE_XML_STRUCTURE,
                format!("{} elements left open", self.stack.len()),
            ));
        }
        let named_patched = self.named.finish(None);
        let automatic_patched = self.automatic.finish(Some(&self.named));
        log::debug!(
            "Finished import: {} named, {} automatic styles, {} date-time references patched",
            self.named.len(),
            self.automatic.len(),
            named_patched + automatic_patched
        );
        Ok(ImportedStyles {
            named: self.named,
            automatic: self.automatic,
            master_pages: self.master_pages,
            context: self.context,
        })
    }

    fn open_style<K: AsRef<str>, V: AsRef<str>>(&mut self, attrs: &[(K, V)], default: bool) -> Frame {
        let in_master_page = matches!(self.stack.last(), Some(Frame::MasterPage(_)));
        let family_attr = attr(&self.namespaces, attrs, Namespace::Style, "family");
        let family = if in_master_page && !default {
            StyleFamily::Presentation
        } else {
            match family_attr.and_then(StyleFamily::from_markup) {
                Some(family) => family,
                None => {
                    log::debug!("Skipping style with unsupported family {:?}", family_attr);
                    return Frame::Skip;
                }
            }
        };
        let scope = self.current_scope();
        if default {
            return Frame::Style {
                record: StyleRecord::default_style(family),
                scope,
            };
        }
        let Some(name) = attr(&self.namespaces, attrs, Namespace::Style, "name") else {
            log::debug!("Skipping unnamed {} style", family);
            return Frame::Skip;
        };
        let mut record = StyleRecord::new(family, name);
        if let Some(display) = attr(&self.namespaces, attrs, Namespace::Style, "display-name") {
            if !display.is_empty() {
                record = record.with_display_name(display);
            }
        }
        if let Some(parent) = attr(&self.namespaces, attrs, Namespace::Style, "parent-style-name") {
            if !parent.is_empty() {
                record = record.with_parent(parent);
            }
        }
        Frame::Style { record, scope }
    }

    fn close_style(&mut self, record: StyleRecord, scope: StyleScope) -> Result<(), StyleError> {
        let max = self.options.limits.max_styles_per_scope;
        let collection = self.collection(scope);
        let replaces = if record.is_default {
            collection.default_style(record.family).is_some()
        } else {
            collection.find(record.family, &record.name).is_some()
        };
        if !replaces && collection.len() >= max {
            return Err(limit_error("max_styles_per_scope", collection.len() + 1, max)
                .with_family(record.family)
                .with_style(record.name));
        }
        let display_name = (!record.is_default && record.display_name != record.name)
            .then(|| (record.family, record.name.clone(), record.display_name.clone()));
        self.collection_mut(scope).add(record)?;
        if let Some((family, name, display_name)) = display_name {
            self.context.display_names.register(family, name, display_name);
        }
        Ok(())
    }

    fn read_properties<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        qname: &str,
        attrs: &[(K, V)],
    ) -> Result<(), StyleError> {
        let max = self.options.limits.max_properties_per_style;
        let Some(Frame::Style { record, scope }) = self.stack.last_mut() else {
            return Ok(());
        };
        let mapper = match *scope {
            StyleScope::Named => self.named.mapper(record.family),
            StyleScope::Automatic => self.automatic.mapper(record.family),
        };
        let Some(mapper) = mapper else {
            log::debug!("No property mapper for {}; ignoring {}", record.family, qname);
            return Ok(());
        };
        for (key, raw) in attrs {
            let (ns, local) = self.namespaces.split(key.as_ref());
            let Some(index) = mapper.index_for(ns, local) else {
                continue;
            };
            let Some(value) = mapper.parse_value(index, raw.as_ref()) else {
                log::debug!(
                    "Style {:?}: unparsable {}={:?}",
                    record.name,
                    key.as_ref(),
                    raw.as_ref()
                );
                continue;
            };
            if record.property(index).is_none() && record.properties().len() >= max {
                return Err(limit_error(
                    "max_properties_per_style",
                    record.properties().len() + 1,
                    max,
                )
                .with_family(record.family)
                .with_style(record.name.as_str())
                .with_property(key.as_ref()));
            }
            record.set_property(index, value);
        }
        Ok(())
    }

    fn read_sound<K: AsRef<str>, V: AsRef<str>>(&mut self, attrs: &[(K, V)]) {
        let depth = self.stack.len();
        if depth < 2 || !matches!(self.stack[depth - 1], Frame::Properties { drawing_page: true }) {
            return;
        }
        let Some(href) = attr(&self.namespaces, attrs, Namespace::XLink, "href") else {
            return;
        };
        let Frame::Style { record, scope } = &mut self.stack[depth - 2] else {
            return;
        };
        let mapper = match *scope {
            StyleScope::Named => self.named.mapper(record.family),
            StyleScope::Automatic => self.automatic.mapper(record.family),
        };
        if let Some(index) = mapper.and_then(|m| m.index_for_context(ContextId::PageSoundUrl)) {
            record.set_property(index, PropertyValue::Str(href.to_string()));
        }
    }

    fn open_page_layout<K: AsRef<str>, V: AsRef<str>>(&self, attrs: &[(K, V)]) -> Frame {
        let orientation = match self.options.document_kind {
            DocumentKind::Drawing => Orientation::Portrait,
            DocumentKind::Presentation => Orientation::Landscape,
        };
        let name = attr(&self.namespaces, attrs, Namespace::Style, "name").unwrap_or_default();
        Frame::PageLayout(PageMasterRecord::new(name, orientation))
    }

    fn read_page_layout_properties<K: AsRef<str>, V: AsRef<str>>(&mut self, attrs: &[(K, V)]) {
        let Some(Frame::PageLayout(page)) = self.stack.last_mut() else {
            return;
        };
        for (key, raw) in attrs {
            let raw = raw.as_ref();
            match self.namespaces.split(key.as_ref()) {
                (Namespace::Style, "print-orientation") => {
                    page.orientation = if raw == "portrait" {
                        Orientation::Portrait
                    } else {
                        Orientation::Landscape
                    };
                }
                (Namespace::Fo, local) => {
                    let slot = match local {
                        "margin-top" => &mut page.margin_top,
                        "margin-bottom" => &mut page.margin_bottom,
                        "margin-left" => &mut page.margin_left,
                        "margin-right" => &mut page.margin_right,
                        "page-width" => &mut page.width,
                        "page-height" => &mut page.height,
                        _ => continue,
                    };
                    if let Some(value) = parse_measure_mm100(raw) {
                        *slot = value;
                    }
                }
                _ => {}
            }
        }
    }

    fn read_placeholder<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        attrs: &[(K, V)],
    ) -> Result<(), StyleError> {
        let max = self.options.limits.max_placeholders;
        let Some(Frame::PresentationPageLayout { name, placeholders }) = self.stack.last_mut()
        else {
            return Ok(());
        };
        if placeholders.len() >= max {
            return Err(limit_error("max_placeholders", placeholders.len() + 1, max)
                .with_style(name.as_str()));
        }
        let object = attr(&self.namespaces, attrs, Namespace::Presentation, "object")
            .unwrap_or_default();
        let x = attr(&self.namespaces, attrs, Namespace::Svg, "x")
            .and_then(parse_measure_mm100)
            .unwrap_or(0);
        placeholders.push(PlaceholderRecord::new(object, x));
        Ok(())
    }

    fn read_date_field<K: AsRef<str>, V: AsRef<str>>(&mut self, token: DateToken, attrs: &[(K, V)]) {
        let long = attr(&self.namespaces, attrs, Namespace::Number, "style") == Some("long");
        let textual = attr(&self.namespaces, attrs, Namespace::Number, "textual") == Some("true");
        if let Some(Frame::DateStyle { code, .. }) = self.stack.last_mut() {
            code.push_str(token.code(long, textual));
        }
    }

    fn register_draw_resource<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        family: StyleFamily,
        attrs: &[(K, V)],
    ) {
        let name = attr(&self.namespaces, attrs, Namespace::Draw, "name");
        let display = attr(&self.namespaces, attrs, Namespace::Draw, "display-name");
        if let (Some(name), Some(display)) = (name, display) {
            self.context.display_names.register(family, name, display);
        }
    }

    fn open_master_page<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        attrs: &[(K, V)],
        handout: bool,
    ) -> Frame {
        let get = |ns, local| attr_string(&self.namespaces, attrs, ns, local);
        let name = get(Namespace::Style, "name").unwrap_or_default();
        let display_name = get(Namespace::Style, "display-name")
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| name.clone());
        let mut master = MasterPageRecord {
            page_layout_name: get(Namespace::Style, "page-layout-name"),
            style_name: get(Namespace::Draw, "style-name"),
            presentation_page_layout_name: get(
                Namespace::Presentation,
                "presentation-page-layout-name",
            ),
            use_header_name: get(Namespace::Presentation, "use-header-name"),
            use_footer_name: get(Namespace::Presentation, "use-footer-name"),
            use_date_time_name: get(Namespace::Presentation, "use-date-time-name"),
            is_handout: handout,
            ordinal: None,
            name,
            display_name,
        };
        if master.display_name != master.name {
            self.context.display_names.register(
                StyleFamily::MasterPage,
                master.name.as_str(),
                master.display_name.as_str(),
            );
        }
        if !handout {
            master.ordinal = Some(self.context.next_master_page());
        }
        Frame::MasterPage(master)
    }
}

/// Result of a complete import, ready to be applied.
#[derive(Debug)]
pub struct ImportedStyles {
    pub named: StyleCollection,
    pub automatic: StyleCollection,
    /// Master pages and handout masters in document order.
    pub master_pages: Vec<MasterPageRecord>,
    pub context: ImportContext,
}

impl ImportedStyles {
    /// Materialize the named styles and master-page styles onto `families`
    /// and associate automatic styles with them.
    ///
    /// Graphics styles go to the `"graphics"` family and table-cell styles
    /// to `"cell"`. Missing families are skipped.
    pub fn apply<F: StyleFamilies>(
        &mut self,
        families: &mut F,
        applier: &dyn PropertyApplier,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        let display_names = &self.context.display_names;
        for (family, target) in [
            (StyleFamily::Graphics, "graphics"),
            (StyleFamily::TableCell, "cell"),
        ] {
            let Some(container) = families.family_mut(target) else {
                log::debug!("Document has no {:?} style family", target);
                continue;
            };
            report.merge(
                self.named
                    .apply_family(family, container, "", applier, display_names),
            );
            report.merge(
                self.named
                    .resolve_parents(family, container, "", display_names),
            );
        }
        for master in &self.master_pages {
            if master.is_handout || master.name.is_empty() {
                continue;
            }
            if let Some(master_report) =
                self.named
                    .set_master_page_styles(master, families, applier, display_names)
            {
                report.merge(master_report);
            }
        }
        let associated = self.automatic.associate_with_parent_scope(&self.named);
        log::debug!(
            "Applied styles: {} created, {} updated, {} parented, {} automatic associated, {} warnings",
            report.created,
            report.updated,
            report.parented,
            associated,
            report.warnings.len()
        );
        report
    }

    /// Page layouts of both scopes, named first.
    pub fn page_layouts(&self) -> Vec<(&str, LayoutKind)> {
        let mut layouts = self.named.page_layouts();
        layouts.extend(self.automatic.page_layouts());
        layouts
    }

    pub fn master_page(&self, name: &str) -> Option<&MasterPageRecord> {
        self.master_pages.iter().find(|m| m.name == name)
    }

    /// Page master of either scope.
    pub fn page_master(&self, name: &str) -> Option<&PageMasterRecord> {
        self.automatic
            .page_master(name)
            .or_else(|| self.named.page_master(name))
    }
}

fn reader_token_offset(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

fn tokenize_error(reader: &Reader<&[u8]>, what: &str, detail: impl core::fmt::Debug) -> StyleError {
    StyleError::new(
        ImportPhase::Parse,
        CODE_XML_TOKENIZE,
        format!("{} error: {:?}", what, detail),
    )
    .with_token_offset(reader_token_offset(reader))
}

fn decode_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String, StyleError> {
    reader
        .decoder()
        .decode(raw)
        .map(|name| name.into_owned())
        .map_err(|err| tokenize_error(reader, "Tag name decode", err))
}

fn collect_attributes(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
    out: &mut Vec<(String, String)>,
) -> Result<(), StyleError> {
    out.clear();
    for attr in e.attributes().flatten() {
        let key = match reader.decoder().decode(attr.key.as_ref()) {
            Ok(key) => key.into_owned(),
            Err(_) => continue,
        };
        let raw = match reader.decoder().decode(&attr.value) {
            Ok(value) => value,
            Err(_) => continue,
        };
        let value = quick_xml::escape::unescape(&raw)
            .map_err(|err| tokenize_error(reader, "Attribute unescape", err))?;
        out.push((key, value.into_owned()));
    }
    Ok(())
}

/// Import a `styles.xml` (or any fragment holding style sections).
pub fn import_styles_xml(bytes: &[u8], options: ImportOptions) -> Result<ImportedStyles, StyleError> {
    let mut importer = StylesImporter::new(options);
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::with_capacity(1024);
    let mut attrs: Vec<(String, String)> = Vec::with_capacity(16);
    let mut entity_buf = String::with_capacity(16);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = decode_name(&reader, e.name().as_ref())?;
                collect_attributes(&reader, &e, &mut attrs)?;
                let offset = reader_token_offset(&reader);
                importer
                    .start_element(&name, &attrs)
                    .map_err(|err| err.with_token_offset(offset))?;
            }
            Ok(Event::Empty(e)) => {
                let name = decode_name(&reader, e.name().as_ref())?;
                collect_attributes(&reader, &e, &mut attrs)?;
                let offset = reader_token_offset(&reader);
                importer
                    .start_element(&name, &attrs)
                    .and_then(|()| importer.end_element(&name))
                    .map_err(|err| err.with_token_offset(offset))?;
            }
            Ok(Event::End(e)) => {
                let name = decode_name(&reader, e.name().as_ref())?;
                let offset = reader_token_offset(&reader);
                importer
                    .end_element(&name)
                    .map_err(|err| err.with_token_offset(offset))?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .decode()
                    .map_err(|err| tokenize_error(&reader, "Text decode", err))?;
                importer.characters(&text)?;
            }
            Ok(Event::CData(e)) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|err| tokenize_error(&reader, "CDATA decode", err))?;
                importer.characters(&text)?;
            }
            Ok(Event::GeneralRef(e)) => {
                let entity_name = e
                    .decode()
                    .map_err(|err| tokenize_error(&reader, "Entity decode", err))?;
                entity_buf.clear();
                entity_buf.push('&');
                entity_buf.push_str(&entity_name);
                entity_buf.push(';');
                let resolved: Cow<'_, str> = quick_xml::escape::unescape(&entity_buf)
                    .map_err(|err| tokenize_error(&reader, "Entity unescape", err))?;
                importer.characters(&resolved)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(tokenize_error(&reader, "XML", err)),
        }
        buf.clear();
    }

    importer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(xml: &str) -> ImportedStyles {
        import_styles_xml(xml.as_bytes(), ImportOptions::default()).expect("import should succeed")
    }

    #[test]
    fn event_api_builds_records_without_xml() {
        let mut importer = StylesImporter::new(ImportOptions::default());
        importer
            .start_element("office:styles", &[] as &[(&str, &str)])
            .expect("open");
        importer
            .start_element(
                "style:style",
                &[("style:name", "gr"), ("style:family", "graphic")],
            )
            .expect("open");
        importer
            .start_element("style:graphic-properties", &[("draw:fill-color", "#00ff00")])
            .expect("open");
        importer.end_element("style:graphic-properties").expect("close");
        importer.end_element("style:style").expect("close");
        importer.end_element("office:styles").expect("close");
        let styles = importer.finish().expect("finish");
        let record = styles
            .named
            .find(StyleFamily::Graphics, "gr")
            .expect("graphics style");
        assert_eq!(record.properties().len(), 1);
        assert_eq!(record.properties()[0].value, PropertyValue::Int(0x00ff00));
    }

    #[test]
    fn unbalanced_close_is_a_structure_error() {
        let mut importer = StylesImporter::new(ImportOptions::default());
        let err = importer.end_element("office:styles").expect_err("nothing open");
        assert_eq!(err.code, CODE_XML_STRUCTURE);
    }

    #[test]
    fn unknown_family_subtree_is_skipped() {
        let styles = import(
            r##"<office:styles>
                 <style:style style:name="c1" style:family="chart">
                   <style:graphic-properties draw:fill-color="#000000"/>
                 </style:style>
                 <style:style style:name="g1" style:family="graphic"/>
               </office:styles>"##,
        );
        assert_eq!(styles.named.len(), 1);
        assert!(styles.named.find(StyleFamily::Graphics, "g1").is_some());
    }

    #[test]
    fn date_style_builds_format_code() {
        let styles = import(
            r#"<office:styles>
                 <number:date-style style:name="D3">
                   <number:day number:style="long"/><number:text>.</number:text>
                   <number:month number:style="long" number:textual="true"/><number:text> </number:text>
                   <number:year number:style="long"/>
                 </number:date-style>
                 <number:time-style style:name="T1">
                   <number:hours/><number:text>:</number:text><number:minutes number:style="long"/>
                 </number:time-style>
                 <number:number-style style:name="N1"><number:number/></number:number-style>
               </office:styles>"#,
        );
        let date = styles.named.number_style("D3").expect("date style");
        assert_eq!(date.format_code, "DD.MMMM YYYY");
        assert_eq!(date.key, 1);
        let time = styles.named.number_style("T1").expect("time style");
        assert_eq!(time.format_code, "H:MM");
        assert_eq!(time.kind, NumberStyleKind::Time);
        assert_eq!(time.key, 2);
        assert!(styles.named.number_style("N1").is_none());
    }

    #[test]
    fn data_style_text_limit_is_enforced() {
        let limits = ImportLimits {
            max_data_text_bytes: 4,
            ..ImportLimits::default()
        };
        let err = import_styles_xml(
            br#"<office:styles><number:date-style style:name="D1">
                  <number:day/><number:text> of the month </number:text>
                </number:date-style></office:styles>"#,
            ImportOptions::default().with_limits(limits),
        )
        .expect_err("literal too long");
        assert_eq!(err.code, CODE_LIMIT);
        assert!(err.to_string().contains("max_data_text_bytes"));
    }

    #[test]
    fn rejected_duplicate_keeps_first_display_name() {
        let mut importer = StylesImporter::new(
            ImportOptions::default().with_duplicate_policy(DuplicatePolicy::Reject),
        );
        let no_attrs: &[(&str, &str)] = &[];
        importer.start_element("office:styles", no_attrs).expect("open");
        for display in ["First", "Second"] {
            importer
                .start_element(
                    "style:style",
                    &[
                        ("style:name", "a"),
                        ("style:display-name", display),
                        ("style:family", "graphic"),
                    ],
                )
                .expect("open");
            let closed = importer.end_element("style:style");
            assert_eq!(closed.is_err(), display == "Second");
        }
        importer.end_element("office:styles").expect("close");
        let styles = importer.finish().expect("finish");
        assert_eq!(
            styles
                .context
                .display_names
                .display_name_for(StyleFamily::Graphics, "a"),
            "First"
        );
    }

    #[test]
    fn declarations_collect_text() {
        let styles = import(
            r#"<office:styles>
                 <presentation:header-decl presentation:name="hdr1">Quarterly &amp; annual</presentation:header-decl>
                 <presentation:date-time-decl presentation:name="dtd1" presentation:source="current-date" style:data-style-name="D3"/>
                 <presentation:date-time-decl presentation:name="dtd2" presentation:source="fixed">1 May</presentation:date-time-decl>
               </office:styles>"#,
        );
        assert_eq!(styles.context.header_decl("hdr1"), Some("Quarterly & annual"));
        let current = styles.context.date_time_decl("dtd1").expect("decl");
        assert!(!current.fixed);
        assert_eq!(current.format.as_deref(), Some("D3"));
        let fixed = styles.context.date_time_decl("dtd2").expect("decl");
        assert!(fixed.fixed);
        assert_eq!(fixed.text, "1 May");
    }

    #[test]
    fn page_layout_orientation_defaults_by_document_kind() {
        let xml = r#"<office:automatic-styles>
                       <style:page-layout style:name="PM1">
                         <style:page-layout-properties fo:margin-top="1cm" fo:page-width="28cm" fo:page-height="21cm"/>
                       </style:page-layout>
                       <style:page-layout style:name="PM2">
                         <style:page-layout-properties style:print-orientation="portrait"/>
                       </style:page-layout>
                     </office:automatic-styles>"#;
        let presentation = import(xml);
        let pm1 = presentation.page_master("PM1").expect("PM1");
        assert_eq!(pm1.orientation, Orientation::Landscape);
        assert_eq!(pm1.margin_top, 1000);
        assert_eq!(pm1.width, 28000);
        assert_eq!(
            presentation.page_master("PM2").map(|p| p.orientation),
            Some(Orientation::Portrait)
        );

        let drawing = import_styles_xml(
            xml.as_bytes(),
            ImportOptions::default().with_document_kind(DocumentKind::Drawing),
        )
        .expect("import");
        assert_eq!(
            drawing.page_master("PM1").map(|p| p.orientation),
            Some(Orientation::Portrait)
        );
    }

    #[test]
    fn placeholder_limit_is_enforced() {
        let limits = ImportLimits {
            max_placeholders: 2,
            ..ImportLimits::default()
        };
        let err = import_styles_xml(
            br#"<office:styles><style:presentation-page-layout style:name="AL1T0">
                  <presentation:placeholder presentation:object="title"/>
                  <presentation:placeholder presentation:object="outline"/>
                  <presentation:placeholder presentation:object="outline"/>
                </style:presentation-page-layout></office:styles>"#,
            ImportOptions::default().with_limits(limits),
        )
        .expect_err("limit exceeded");
        assert_eq!(err.code, CODE_LIMIT);
        assert!(err.to_string().contains("max_placeholders"));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let limits = ImportLimits {
            max_depth: 2,
            ..ImportLimits::default()
        };
        let err = import_styles_xml(
            b"<a><b><c/></b></a>",
            ImportOptions::default().with_limits(limits),
        )
        .expect_err("too deep");
        assert_eq!(err.code, CODE_LIMIT);
    }

    #[test]
    fn malformed_xml_reports_tokenize_error() {
        let err = import_styles_xml(b"<office:styles><style:style></office:styles>", ImportOptions::default())
            .expect_err("mismatched tags");
        assert_eq!(err.code, CODE_XML_TOKENIZE);
    }

    #[test]
    fn embedded_limits_are_tighter() {
        let embedded = ImportLimits::embedded();
        let default = ImportLimits::default();
        assert!(embedded.max_styles_per_scope < default.max_styles_per_scope);
        assert!(embedded.max_depth < default.max_depth);
    }
}
