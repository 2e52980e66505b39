//! Markdown extension hooking annotations into a render pass.

use std::sync::LazyLock;

use apidoc_config::AnnotationsConfig;
use apidoc_renderer::{MarkdownExtension, RenderResult};
use regex::{Captures, Regex};

use crate::context::DocumentContext;
use crate::error::ApiDocError;
use crate::parsers::RenderMarkdown;
use crate::record::AnnotationToken;
use crate::render::AnnotationRenderer;
use crate::scanner::AnnotationScanner;
use crate::templates::TemplateSet;

/// Placeholder with any prefix; only the document's own prefix is replaced.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(?P<prefix>APIDOC\d*)_(?P<index>\d+)\}\}").unwrap()
});

/// A paragraph holding nothing but placeholders.
static PLACEHOLDER_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<p>((?:\s*\{\{APIDOC\d*_\d+\}\})+\s*)</p>").unwrap()
});

/// Scans tags before parsing and substitutes their HTML afterwards.
///
/// One extension value handles one document: `preprocess` starts a fresh
/// [`DocumentContext`].
pub struct AnnotationExtension<'a> {
    config: &'a AnnotationsConfig,
    templates: &'a dyn TemplateSet,
    markdown: &'a dyn RenderMarkdown,
    tokens: Vec<AnnotationToken>,
    context: DocumentContext,
    prefix: String,
}

impl<'a> AnnotationExtension<'a> {
    /// Create an extension.
    ///
    /// `markdown` renders tag descriptions; it usually recurses into the
    /// same pipeline that drives this extension.
    #[must_use]
    pub fn new(
        config: &'a AnnotationsConfig,
        templates: &'a dyn TemplateSet,
        markdown: &'a dyn RenderMarkdown,
    ) -> Self {
        Self {
            config,
            templates,
            markdown,
            tokens: Vec::new(),
            context: DocumentContext::new(),
            prefix: String::new(),
        }
    }

    /// Tokens found by the last `preprocess` call.
    #[must_use]
    pub fn tokens(&self) -> &[AnnotationToken] {
        &self.tokens
    }
}

impl MarkdownExtension for AnnotationExtension<'_> {
    type Error = ApiDocError;

    fn preprocess(&mut self, markdown: &str) -> Result<String, ApiDocError> {
        let mut scanner = AnnotationScanner::new(self.config, self.markdown);
        let source = scanner.process(markdown)?;
        (self.tokens, self.context, self.prefix) = scanner.into_parts();
        tracing::debug!(tokens = self.tokens.len(), "scanned annotations");
        Ok(source)
    }

    fn post_process(&mut self, result: &mut RenderResult) -> Result<(), ApiDocError> {
        if self.tokens.is_empty() {
            return Ok(());
        }

        let renderer = AnnotationRenderer::new(self.templates, &self.context, self.config.marker);
        let fragments = self
            .tokens
            .iter()
            .map(|token| renderer.render(token))
            .collect::<Result<Vec<_>, _>>()?;

        let prefix = self.prefix.as_str();
        let unwrapped = PLACEHOLDER_PARAGRAPH.replace_all(&result.html, |caps: &Captures| {
            let inner = &caps[1];
            let own = PLACEHOLDER
                .captures_iter(inner)
                .all(|placeholder| &placeholder["prefix"] == prefix);
            if own {
                inner.trim().to_owned()
            } else {
                caps[0].to_owned()
            }
        });
        result.html = substitute(&unwrapped, prefix, |index| {
            fragments.get(index).map(String::as_str)
        });

        for entry in &mut result.toc {
            if PLACEHOLDER.is_match(&entry.title) {
                entry.title = substitute(&entry.title, prefix, |index| {
                    self.tokens.get(index).map(AnnotationToken::label)
                });
            }
        }

        Ok(())
    }
}

/// Replace every placeholder carrying `prefix` in one pass. Other prefixes
/// and unknown indices stay as written.
fn substitute<'t>(
    text: &str,
    prefix: &str,
    lookup: impl Fn(usize) -> Option<&'t str>,
) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            Some(&caps["prefix"])
                .filter(|found| *found == prefix)
                .and_then(|_| caps["index"].parse::<usize>().ok())
                .and_then(&lookup)
                .unwrap_or(&caps[0])
                .to_owned()
        })
        .into_owned()
}
