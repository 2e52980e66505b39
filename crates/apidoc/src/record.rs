//! Structured results of parsing tag values.

use crate::context::ScopeId;
use crate::grammar::TagKind;

/// A parsed `@param`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamRecord {
    /// Accepted types, never empty.
    pub types: Vec<String>,
    /// Parameter name.
    pub name: String,
    /// Default from the `[name=default]` form.
    pub default_value: Option<String>,
    /// Rendered HTML description.
    pub description: Option<String>,
}

/// A parsed `@returns`, or the returns slot of a method.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReturnsRecord {
    /// Return types in declaration order.
    pub types: Vec<String>,
    /// Rendered HTML description.
    pub description: Option<String>,
}

/// A parsed `@method`, `@event` or `@action`.
///
/// Its parameters and return slot live in the [`DocumentContext`](crate::DocumentContext)
/// scope named by `scope`, where later tags keep appending to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralRecord {
    /// Which structural tag this is.
    pub kind: TagKind,
    /// Name as written.
    pub name: String,
    /// Scope holding the attached params and returns.
    pub scope: ScopeId,
}

/// A parsed `@property`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRecord {
    /// Property types, never empty.
    pub types: Vec<String>,
    /// Property name.
    pub name: String,
    /// Rendered HTML description.
    pub description: Option<String>,
}

/// Record produced for one tag occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagRecord {
    /// `@param`
    Param(ParamRecord),
    /// `@returns`
    Returns(ReturnsRecord),
    /// `@method`, `@event`, `@action`
    Structural(StructuralRecord),
    /// `@property`
    Property(PropertyRecord),
}

/// One recognized tag occurrence, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationToken {
    /// Tag name as written.
    pub name: String,
    /// Raw, trimmed tag value.
    pub value: String,
    /// 1-based source line of the marker.
    pub line: usize,
    /// Parsed record; `None` for unknown tags and grammar mismatches.
    pub record: Option<TagRecord>,
}

impl AnnotationToken {
    /// The tag kind, if the name is supported.
    #[must_use]
    pub fn kind(&self) -> Option<TagKind> {
        TagKind::from_name(&self.name)
    }

    /// Short plain-text label, used where markup cannot go (e.g. a ToC title).
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.record {
            Some(TagRecord::Structural(record)) => &record.name,
            Some(TagRecord::Param(record)) => &record.name,
            Some(TagRecord::Property(record)) => &record.name,
            Some(TagRecord::Returns(_)) | None => &self.name,
        }
    }
}
