//! Markdown renderer with a pluggable backend and an extension hook.
//!
//! This crate provides a generic [`MarkdownRenderer`] that walks
//! pulldown-cmark events and delegates format-specific elements (code blocks,
//! blockquotes, images) to a [`RenderBackend`]. [`HtmlBackend`] produces
//! semantic HTML5.
//!
//! Headings get unique slug ids and are collected into a table of contents.
//! A [`MarkdownExtension`] can rewrite the source before parsing and edit the
//! [`RenderResult`] afterwards; the `apidoc` crate plugs its annotation
//! syntax in this way.
//!
//! # Example
//!
//! ```
//! use apidoc_renderer::{HtmlBackend, MarkdownRenderer};
//!
//! let result = MarkdownRenderer::<HtmlBackend>::new().render_markdown("# Hello\n\n**Bold** text");
//! assert_eq!(result.toc[0].id, "hello");
//! assert!(result.html.ends_with("<p><strong>Bold</strong> text</p>"));
//! ```

mod backend;
mod extension;
mod html;
mod renderer;
mod state;
mod util;

pub use backend::RenderBackend;
pub use extension::MarkdownExtension;
pub use html::HtmlBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};
