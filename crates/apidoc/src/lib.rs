//! API documentation annotations for markdown.
//!
//! Lines starting with a tag such as `@method`, `@param {String} path` or
//! `@returns {Boolean}` are rendered as structured HTML fragments while the
//! rest of the document goes through the regular markdown renderer.
//!
//! # Tags
//!
//! - `@method name`, `@event name`, `@action name` open a scope. Following
//!   `@param` tags attach to it and `@returns` tags attach to the last method.
//! - `@param {Types} name [- description]` and its `name {Types}` mirror.
//!   Optional params are written `[name]` or `[name=default]`.
//! - `@returns {Types} [description]`
//! - `@property {Types} name [- description]`
//!
//! Types are separated by `|`. Descriptions are markdown. A tag's value
//! continues on following lines until a blank line, another tag or a new
//! block.
//!
//! # Pipeline
//!
//! 1. [`AnnotationScanner`] replaces tags with `{{APIDOC_<n>}}` placeholders
//!    (under a fresh prefix when the document already contains one)
//!    and parses each value into a record linked through a [`DocumentContext`].
//! 2. The markdown renderer renders the rewritten document.
//! 3. [`AnnotationRenderer`] renders each token through a [`TemplateSet`] and
//!    the placeholders are substituted.
//!
//! [`ApiDocRenderer`] drives all three steps.
//!
//! # Example
//!
//! ```
//! use apidoc::ApiDocRenderer;
//!
//! let html = ApiDocRenderer::new()
//!     .render("@method close\n@returns {Boolean} Whether it was open.")
//!     .unwrap()
//!     .html;
//! assert!(html.starts_with(r#"<div class="jsdoc-method">"#));
//! assert!(html.contains("Whether it was open."));
//! ```

mod context;
mod error;
mod extension;
mod fence;
mod grammar;
mod parsers;
mod pipeline;
mod record;
mod render;
mod scanner;
mod templates;

pub use context::{DocumentContext, Scope, ScopeId};
pub use error::{ApiDocError, TemplateError};
pub use extension::AnnotationExtension;
pub use grammar::TagKind;
pub use parsers::{RenderMarkdown, parse_tag};
pub use pipeline::ApiDocRenderer;
pub use record::{
    AnnotationToken, ParamRecord, PropertyRecord, ReturnsRecord, StructuralRecord, TagRecord,
};
pub use render::AnnotationRenderer;
pub use scanner::{AnnotationScanner, placeholder};
pub use templates::{
    DefaultTemplates, MethodView, ParamView, PropertyView, ReturnsView, StructuralView,
    TemplateSet,
};
