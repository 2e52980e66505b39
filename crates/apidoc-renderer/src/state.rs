//! Per-element state tracked while walking pulldown-cmark events.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// Buffered fenced or indented code block.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// Close the block, returning its language and raw content.
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Column alignment and header tracking for GFM tables.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Inline `style` attribute for the current cell, empty when unaligned.
    pub(crate) fn alignment_attr(&self) -> &'static str {
        match self.alignments.get(self.cell) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Alt text collected between image start and end events.
#[derive(Default)]
pub(crate) struct ImageState {
    alt: Option<String>,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.alt = Some(String::new());
    }

    pub(crate) fn end(&mut self) -> String {
        self.alt.take().unwrap_or_default()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.alt.is_some()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        if let Some(alt) = self.alt.as_mut() {
            alt.push_str(text);
        }
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// An open heading: its level plus plain-text and HTML buffers.
struct OpenHeading {
    level: u8,
    text: String,
    html: String,
}

/// A heading ready to be written out.
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) html: String,
}

/// Heading capture, unique anchor ids and the table of contents.
#[derive(Default)]
pub(crate) struct HeadingState {
    open: Option<OpenHeading>,
    toc: Vec<TocEntry>,
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn is_active(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn start(&mut self, level: u8) {
        self.open = Some(OpenHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    /// Append plain text (used for the slug and the ToC title).
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(open) = self.open.as_mut() {
            open.text.push_str(text);
        }
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        if let Some(open) = self.open.as_mut() {
            open.html.push_str(html);
        }
    }

    /// Close the current heading and record it in the table of contents.
    pub(crate) fn complete(&mut self) -> Option<CompletedHeading> {
        let open = self.open.take()?;
        let title = open.text.trim().to_owned();
        let id = self.unique_id(&title);

        self.toc.push(TocEntry {
            level: open.level,
            title,
            id: id.clone(),
        });

        Some(CompletedHeading {
            level: open.level,
            id,
            html: open.html.trim().to_owned(),
        })
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }

    fn unique_id(&mut self, text: &str) -> String {
        let base = slugify(text);
        let seen = self.id_counts.entry(base.clone()).or_default();
        let id = if *seen == 0 {
            base
        } else {
            format!("{base}-{seen}")
        };
        *seen += 1;
        id
    }
}

/// Convert text to a URL-safe slug.
///
/// Lowercases ASCII alphanumerics, turns whitespace, dashes and underscores
/// into single dashes, and drops everything else.
///
/// # Example
///
/// ```
/// use apidoc_renderer::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Array<String>"), "arraystring");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
