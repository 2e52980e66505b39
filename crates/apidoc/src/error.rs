//! Error types for annotation processing.

/// Fatal annotation error; aborts the current render.
///
/// Grammar mismatches are not errors: a tag whose value does not fit its
/// shape renders as nothing.
#[derive(Debug, thiserror::Error)]
pub enum ApiDocError {
    /// Tag name outside the supported set.
    #[error("Unknown tag {marker}{name}")]
    UnknownTag {
        /// Marker character the tag was written with.
        marker: char,
        /// Tag name as written.
        name: String,
    },
    /// `@returns` with no open `@method`.
    #[error("@return needs to be in the context of a @method (line {line})")]
    ReturnsOutsideMethod {
        /// 1-based source line of the offending tag.
        line: usize,
    },
    /// A template failed while rendering a tag.
    #[error("template error for tag @{tag}: {source}")]
    Template {
        /// Name of the tag being rendered.
        tag: String,
        /// Underlying template failure.
        #[source]
        source: TemplateError,
    },
}

/// Failure inside a [`TemplateSet`](crate::TemplateSet) method.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A required view field is empty.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// Writing into the output buffer failed.
    #[error("formatting failed")]
    Fmt(#[from] std::fmt::Error),
    /// Failure reported by a custom template set.
    #[error("{0}")]
    Custom(String),
}
