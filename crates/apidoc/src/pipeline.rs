//! Markdown-to-HTML pipeline with annotation support.

use apidoc_config::{AnnotationsConfig, Config};
use apidoc_renderer::{HtmlBackend, MarkdownRenderer, RenderResult};

use crate::error::ApiDocError;
use crate::extension::AnnotationExtension;
use crate::parsers::RenderMarkdown;
use crate::templates::{DefaultTemplates, TemplateSet};

/// Renders markdown documents containing annotation tags to HTML.
///
/// Tag descriptions are rendered by the same pipeline, so they may use any
/// markdown the document can.
///
/// # Example
///
/// ```
/// use apidoc::ApiDocRenderer;
///
/// let renderer = ApiDocRenderer::new();
/// let result = renderer.render("@event ready").unwrap();
/// assert_eq!(
///     result.html,
///     r#"<div class="jsdoc-event"><code class="jsdoc-event-name">ready</code></div>"#
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ApiDocRenderer<T: TemplateSet = DefaultTemplates> {
    annotations: AnnotationsConfig,
    gfm: bool,
    templates: T,
}

impl Default for ApiDocRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiDocRenderer {
    /// Create a renderer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Create a renderer from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            annotations: config.annotations.clone(),
            gfm: config.markdown.gfm,
            templates: DefaultTemplates::new(&config.annotations.class_prefix),
        }
    }
}

impl<T: TemplateSet> ApiDocRenderer<T> {
    /// Replace the template set.
    #[must_use]
    pub fn with_templates<U: TemplateSet>(self, templates: U) -> ApiDocRenderer<U> {
        ApiDocRenderer {
            annotations: self.annotations,
            gfm: self.gfm,
            templates,
        }
    }

    /// Template set in use.
    #[must_use]
    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Render a markdown document.
    ///
    /// # Errors
    ///
    /// Returns the first annotation error; no partial output is produced.
    pub fn render(&self, markdown: &str) -> Result<RenderResult, ApiDocError> {
        let mut extension = AnnotationExtension::new(&self.annotations, &self.templates, self);
        MarkdownRenderer::<HtmlBackend>::new()
            .with_gfm(self.gfm)
            .render_with_extension(markdown, &mut extension)
    }
}

impl<T: TemplateSet> RenderMarkdown for ApiDocRenderer<T> {
    fn render_markdown(&self, markdown: &str) -> Result<String, ApiDocError> {
        self.render(markdown).map(|result| result.html)
    }
}
