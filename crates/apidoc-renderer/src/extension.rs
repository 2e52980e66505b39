//! Extension hook around a render pass.

use crate::renderer::RenderResult;

/// A plugin that rewrites markdown before parsing and edits the result after.
///
/// Extensions usually swap syntax the parser does not know for opaque text
/// placeholders in [`preprocess`](Self::preprocess) and replace those
/// placeholders with rendered fragments in [`post_process`](Self::post_process).
/// See [`MarkdownRenderer::render_with_extension`](crate::MarkdownRenderer::render_with_extension).
pub trait MarkdownExtension {
    /// Error raised by either phase.
    type Error;

    /// Rewrite the raw markdown source.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the render is aborted.
    fn preprocess(&mut self, markdown: &str) -> Result<String, Self::Error>;

    /// Edit the rendered HTML and table of contents in place.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the render is aborted.
    fn post_process(&mut self, result: &mut RenderResult) -> Result<(), Self::Error>;
}
