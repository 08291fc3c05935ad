//! Error and warning types for style import.
//!
//! Errors carry a processing phase and a stable machine-readable code so
//! callers can branch without matching on message text. Conditions that only
//! affect a single style are reported as [`ImportWarning`]s and never abort
//! the surrounding pass.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::family::StyleFamily;

/// A duplicate `(family, name)` pair was inserted into one scope.
pub const CODE_DUPLICATE: &str = "STYLE_DUPLICATE";
/// A parent style name could not be matched after prefix stripping.
pub const CODE_UNRESOLVED_PARENT: &str = "STYLE_UNRESOLVED_PARENT";
/// The document model rejected a property write or reset.
pub const CODE_PROPERTY_APPLY: &str = "STYLE_PROPERTY_APPLY";
/// The document model failed to look up or create a styled object.
pub const CODE_TARGET_LOOKUP: &str = "STYLE_TARGET_LOOKUP";
/// A configured import limit was exceeded.
pub const CODE_LIMIT: &str = "STYLE_LIMIT";
/// The markup tokenizer failed.
pub const CODE_XML_TOKENIZE: &str = "XML_TOKENIZE_ERROR";
/// The markup was well-formed but structurally unusable.
pub const CODE_XML_STRUCTURE: &str = "XML_STRUCTURE_ERROR";

/// Import phase in which an error or warning originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportPhase {
    /// Streaming markup parse (record construction).
    Parse,
    /// Whole-scope finishing pass (deferred property patches).
    Finish,
    /// Materialization onto document-model objects.
    Apply,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parse => "parse",
            Self::Finish => "finish",
            Self::Apply => "apply",
        };
        f.write_str(name)
    }
}

/// Typed actual-vs-limit context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitContext {
    /// Name of the limit that was hit.
    pub kind: &'static str,
    /// Observed value.
    pub actual: usize,
    /// Configured maximum.
    pub limit: usize,
}

/// Optional context attached to a [`StyleError`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleErrorContext {
    /// Style family of the offending record.
    pub family: Option<StyleFamily>,
    /// Name of the offending style.
    pub style_name: Option<Box<str>>,
    /// Property API key involved, if any.
    pub property: Option<Box<str>>,
    /// Element (qualified name) being processed.
    pub element: Option<Box<str>>,
    /// Tokenizer byte offset.
    pub token_offset: Option<usize>,
    /// Limit that was exceeded.
    pub limit: Option<LimitContext>,
}

/// Structured error for style import operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleError {
    /// Phase where this error originated.
    pub phase: ImportPhase,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: Box<str>,
    /// Optional additional context.
    pub context: Option<Box<StyleErrorContext>>,
}

impl StyleError {
    pub(crate) fn new(phase: ImportPhase, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            phase,
            code,
            message: message.into().into_boxed_str(),
            context: None,
        }
    }

    fn context_mut(&mut self) -> &mut StyleErrorContext {
        self.context
            .get_or_insert_with(|| Box::new(StyleErrorContext::default()))
    }

    pub(crate) fn with_family(mut self, family: StyleFamily) -> Self {
        self.context_mut().family = Some(family);
        self
    }

    pub(crate) fn with_style(mut self, name: impl Into<String>) -> Self {
        self.context_mut().style_name = Some(name.into().into_boxed_str());
        self
    }

    pub(crate) fn with_property(mut self, key: impl Into<String>) -> Self {
        self.context_mut().property = Some(key.into().into_boxed_str());
        self
    }

    pub(crate) fn with_element(mut self, element: impl Into<String>) -> Self {
        self.context_mut().element = Some(element.into().into_boxed_str());
        self
    }

    pub(crate) fn with_token_offset(mut self, offset: usize) -> Self {
        self.context_mut().token_offset = Some(offset);
        self
    }

    pub(crate) fn with_limit(mut self, kind: &'static str, actual: usize, limit: usize) -> Self {
        self.context_mut().limit = Some(LimitContext {
            kind,
            actual,
            limit,
        });
        self
    }

    /// Style family from the error context, if recorded.
    pub fn family(&self) -> Option<StyleFamily> {
        self.context.as_deref().and_then(|ctx| ctx.family)
    }

    /// Style name from the error context, if recorded.
    pub fn style_name(&self) -> Option<&str> {
        self.context
            .as_deref()
            .and_then(|ctx| ctx.style_name.as_deref())
    }
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.phase, self.code, self.message)?;
        if let Some(ctx) = &self.context {
            if let Some(family) = ctx.family {
                write!(f, " [family={}]", family)?;
            }
            if let Some(name) = ctx.style_name.as_deref() {
                write!(f, " [style={}]", name)?;
            }
            if let Some(property) = ctx.property.as_deref() {
                write!(f, " [property={}]", property)?;
            }
            if let Some(element) = ctx.element.as_deref() {
                write!(f, " [element={}]", element)?;
            }
            if let Some(offset) = ctx.token_offset {
                write!(f, " [token_offset={}]", offset)?;
            }
            if let Some(limit) = &ctx.limit {
                write!(
                    f,
                    " [limit_kind={} actual={} limit={}]",
                    limit.kind, limit.actual, limit.limit
                )?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for StyleError {}

/// Failure reported by the external document model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetError {
    /// Property key or object name the failure relates to.
    pub key: Box<str>,
    /// Human-readable message.
    pub message: Box<str>,
}

impl TargetError {
    /// Create a document-model error for `key`.
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
        }
    }
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl std::error::Error for TargetError {}

impl From<TargetError> for StyleError {
    fn from(err: TargetError) -> Self {
        StyleError::new(ImportPhase::Apply, CODE_PROPERTY_APPLY, err.message.as_ref())
            .with_property(err.key.as_ref())
    }
}

/// A non-fatal problem isolated to one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportWarning {
    /// Phase where the problem was detected.
    pub phase: ImportPhase,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Family of the affected style.
    pub family: StyleFamily,
    /// Name of the affected style.
    pub style_name: Box<str>,
    /// Human-readable message.
    pub message: Box<str>,
}

impl ImportWarning {
    pub(crate) fn from_error(err: &StyleError, family: StyleFamily, style_name: &str) -> Self {
        Self {
            phase: err.phase,
            code: err.code,
            family,
            style_name: style_name.into(),
            message: err.message.clone(),
        }
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [family={} style={}]",
            self.phase, self.code, self.message, self.family, self.style_name
        )
    }
}
