//! Turns annotation tokens into HTML fragments.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::DocumentContext;
use crate::error::{ApiDocError, TemplateError};
use crate::grammar::TagKind;
use crate::record::{AnnotationToken, StructuralRecord, TagRecord};
use crate::templates::{
    MethodView, ParamView, PropertyView, ReturnsView, StructuralView, TemplateSet,
};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Renders tokens of one document through a [`TemplateSet`].
pub struct AnnotationRenderer<'a> {
    templates: &'a dyn TemplateSet,
    context: &'a DocumentContext,
    marker: char,
}

impl<'a> AnnotationRenderer<'a> {
    /// Create a renderer over the context the tokens were scanned into.
    ///
    /// `marker` is only used to report unknown tags as written.
    #[must_use]
    pub fn new(templates: &'a dyn TemplateSet, context: &'a DocumentContext, marker: char) -> Self {
        Self {
            templates,
            context,
            marker,
        }
    }

    /// Render a token as a single-line HTML fragment.
    ///
    /// Tokens whose value did not match their grammar render as an empty
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiDocError::UnknownTag`] for unsupported names and
    /// [`ApiDocError::Template`] when the template fails.
    pub fn render(&self, token: &AnnotationToken) -> Result<String, ApiDocError> {
        let Some(kind) = token.kind() else {
            return Err(ApiDocError::UnknownTag {
                marker: self.marker,
                name: token.name.clone(),
            });
        };
        let Some(record) = &token.record else {
            tracing::debug!(tag = %kind, line = token.line, "tag value did not match, rendering nothing");
            return Ok(String::new());
        };

        let html = self
            .dispatch(kind, record)
            .map_err(|source| ApiDocError::Template {
                tag: token.name.clone(),
                source,
            })?;

        Ok(collapse_whitespace(&html))
    }

    fn dispatch(&self, kind: TagKind, record: &TagRecord) -> Result<String, TemplateError> {
        match record {
            TagRecord::Param(param) => self.templates.param(&ParamView::from(param)),
            TagRecord::Returns(returns) => self.templates.returns(&ReturnsView::from(returns)),
            TagRecord::Property(property) => {
                self.templates.property(&PropertyView::from(property))
            }
            TagRecord::Structural(structural) => self.structural(kind, structural),
        }
    }

    fn structural(
        &self,
        kind: TagKind,
        record: &StructuralRecord,
    ) -> Result<String, TemplateError> {
        let scope = self.context.scope(record.scope);
        match kind {
            TagKind::Method => self.templates.method(&MethodView {
                name: &record.name,
                params: &scope.params,
                returns: scope.returns.as_ref().map(ReturnsView::from).unwrap_or_default(),
            }),
            TagKind::Event | TagKind::Action => {
                let view = StructuralView {
                    kind,
                    name: &record.name,
                    params: &scope.params,
                };
                if kind == TagKind::Event {
                    self.templates.event(&view)
                } else {
                    self.templates.action(&view)
                }
            }
            TagKind::Param | TagKind::Returns | TagKind::Property => Err(TemplateError::Custom(
                format!("@{kind} cannot carry a structural record"),
            )),
        }
    }
}

/// Collapse whitespace runs to one space and trim the ends.
fn collapse_whitespace(html: &str) -> String {
    WHITESPACE.replace_all(html, " ").trim().to_owned()
}
