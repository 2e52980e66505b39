//! Annotation scanner: finds tags in raw markdown and swaps them for
//! placeholders.
//!
//! The scanner runs before the markdown parser. Each recognized tag (plus
//! its continuation lines) becomes an [`AnnotationToken`] and its source is
//! replaced by `{{<prefix>_<index>}}`, which the parser passes through as
//! text. The prefix is `APIDOC`, or `APIDOC<n>` when the document already
//! contains `APIDOC_`, so literal text never collides with a placeholder.

use apidoc_config::AnnotationsConfig;

use crate::context::DocumentContext;
use crate::error::ApiDocError;
use crate::fence::FenceTracker;
use crate::grammar::{self, TagKind};
use crate::parsers::{RenderMarkdown, parse_tag};
use crate::record::AnnotationToken;

const PLACEHOLDER_STEM: &str = "APIDOC";

/// Placeholder text for the token at `index`.
#[must_use]
pub fn placeholder(prefix: &str, index: usize) -> String {
    format!("{{{{{prefix}_{index}}}}}")
}

/// First placeholder prefix whose `<prefix>_` does not occur in `input`.
fn placeholder_prefix(input: &str) -> String {
    let mut prefix = PLACEHOLDER_STEM.to_owned();
    let mut attempt = 0_usize;
    while input.contains(&format!("{prefix}_")) {
        attempt += 1;
        prefix = format!("{PLACEHOLDER_STEM}{attempt}");
    }
    prefix
}

/// Line-by-line tag scanner for one document.
///
/// # Example
///
/// ```
/// use apidoc::{AnnotationScanner, ApiDocError};
/// use apidoc_config::AnnotationsConfig;
///
/// let config = AnnotationsConfig::default();
/// let markdown = |text: &str| -> Result<String, ApiDocError> { Ok(text.to_owned()) };
/// let mut scanner = AnnotationScanner::new(&config, &markdown);
///
/// let output = scanner.process("@method open\n@param {String} path\n").unwrap();
/// assert_eq!(output, "{{APIDOC_0}}\n{{APIDOC_1}}\n");
/// assert_eq!(scanner.tokens().len(), 2);
/// ```
pub struct AnnotationScanner<'a> {
    config: &'a AnnotationsConfig,
    markdown: &'a dyn RenderMarkdown,
    fence: FenceTracker,
    context: DocumentContext,
    tokens: Vec<AnnotationToken>,
    prefix: String,
}

impl<'a> AnnotationScanner<'a> {
    /// Create a scanner with a fresh document context.
    #[must_use]
    pub fn new(config: &'a AnnotationsConfig, markdown: &'a dyn RenderMarkdown) -> Self {
        Self {
            config,
            markdown,
            fence: FenceTracker::default(),
            context: DocumentContext::new(),
            tokens: Vec::new(),
            prefix: PLACEHOLDER_STEM.to_owned(),
        }
    }

    /// Replace every tag in `input` with its placeholder.
    ///
    /// Untouched lines keep their line endings. A tag's continuation lines
    /// are folded into the placeholder line. The placeholder prefix is
    /// chosen afresh for each input.
    ///
    /// # Errors
    ///
    /// Returns the first usage error, such as `@returns` outside a method.
    pub fn process(&mut self, input: &str) -> Result<String, ApiDocError> {
        self.prefix = placeholder_prefix(input);
        let lines: Vec<&str> = input.split_inclusive('\n').collect();
        let mut output = String::with_capacity(input.len());
        let mut idx = 0;

        while idx < lines.len() {
            let raw = lines[idx];
            let line_num = idx + 1;
            idx += 1;

            let (content, ending) = split_line_ending(raw);
            let prefix = grammar::line_prefix(content);

            if self.config.skip_code_fences {
                let was_in_fence = self.fence.in_fence();
                let is_fence = self.fence.update(&content[prefix.container..]);
                if was_in_fence || is_fence {
                    output.push_str(raw);
                    continue;
                }
            }

            let Some(start) = grammar::find_tag_start(
                content,
                &prefix,
                self.config.marker,
                self.config.require_line_start,
            ) else {
                output.push_str(raw);
                continue;
            };

            let mut value = content[start.name.end..].to_owned();
            if !prefix.heading {
                while let Some(extra) = lines
                    .get(idx)
                    .and_then(|next| grammar::continuation(split_line_ending(next).0, self.config.marker))
                {
                    value.push('\n');
                    value.push_str(extra);
                    idx += 1;
                }
            }

            let name = &content[start.name.clone()];
            let token = self.recognize(name, value.trim(), line_num)?;

            output.push_str(&content[..start.marker]);
            output.push_str(&placeholder(&self.prefix, self.tokens.len()));
            output.push_str(ending);
            self.tokens.push(token);
        }

        Ok(output)
    }

    fn recognize(
        &mut self,
        name: &str,
        value: &str,
        line: usize,
    ) -> Result<AnnotationToken, ApiDocError> {
        tracing::debug!(tag = name, line, "recognized annotation");

        // Unknown names are reported by the renderer.
        let record = match TagKind::from_name(name) {
            Some(kind) => parse_tag(kind, value, line, &mut self.context, self.markdown)?,
            None => None,
        };

        Ok(AnnotationToken {
            name: name.to_owned(),
            value: value.to_owned(),
            line,
            record,
        })
    }

    /// Tokens recognized so far, in source order.
    #[must_use]
    pub fn tokens(&self) -> &[AnnotationToken] {
        &self.tokens
    }

    /// The document context built while scanning.
    #[must_use]
    pub fn context(&self) -> &DocumentContext {
        &self.context
    }

    /// Placeholder prefix used by the last `process` call.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Consume the scanner, returning its tokens, context and placeholder
    /// prefix.
    #[must_use]
    pub fn into_parts(self) -> (Vec<AnnotationToken>, DocumentContext, String) {
        (self.tokens, self.context, self.prefix)
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let content = line.trim_end_matches(['\n', '\r']);
    (content, &line[content.len()..])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::record::TagRecord;

    fn echo(markdown: &str) -> Result<String, ApiDocError> {
        Ok(markdown.to_owned())
    }

    fn scan_with(config: &AnnotationsConfig, input: &str) -> (String, Vec<AnnotationToken>) {
        let mut scanner = AnnotationScanner::new(config, &echo);
        let output = scanner.process(input).unwrap();
        (output, scanner.into_parts().0)
    }

    fn scan(input: &str) -> (String, Vec<AnnotationToken>) {
        scan_with(&AnnotationsConfig::default(), input)
    }

    #[test]
    fn test_placeholder_format() {
        assert_eq!(placeholder("APIDOC", 0), "{{APIDOC_0}}");
        assert_eq!(placeholder("APIDOC2", 12), "{{APIDOC2_12}}");
    }

    #[test]
    fn test_prefix_avoids_literal_placeholders() {
        assert_eq!(placeholder_prefix("plain text"), "APIDOC");
        assert_eq!(placeholder_prefix("`{{APIDOC_0}}`"), "APIDOC1");
        assert_eq!(placeholder_prefix("APIDOC_ and APIDOC1_x"), "APIDOC2");
        assert_eq!(placeholder_prefix("only {{APIDOC1_0}}"), "APIDOC");
    }

    #[test]
    fn test_literal_placeholder_in_source_gets_fresh_prefix() {
        let config = AnnotationsConfig::default();
        let mut scanner = AnnotationScanner::new(&config, &echo);
        let output = scanner
            .process("Use `{{APIDOC_0}}` here.\n\n@event e\n")
            .unwrap();
        assert_eq!(scanner.prefix(), "APIDOC1");
        assert_eq!(output, "Use `{{APIDOC_0}}` here.\n\n{{APIDOC1_0}}\n");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let input = "# Title\r\n\r\nSome *text* with me@example.com.\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, input);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_single_tag() {
        let (output, tokens) = scan("@param {type} paramName");
        assert_eq!(output, "{{APIDOC_0}}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "param");
        assert_eq!(tokens[0].value, "{type} paramName");
        assert_eq!(tokens[0].line, 1);
        assert!(matches!(tokens[0].record, Some(TagRecord::Param(_))));
    }

    #[test]
    fn test_tokens_in_source_order() {
        let (output, tokens) = scan("@method m\n@param {Boolean} p1\n@param {Boolean} p2\n");
        assert_eq!(output, "{{APIDOC_0}}\n{{APIDOC_1}}\n{{APIDOC_2}}\n");
        let names: Vec<_> = tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["method", "param", "param"]);
        let lines: Vec<_> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, [1, 2, 3]);
    }

    #[test]
    fn test_multi_line_value() {
        let input = "@param {String} path - where the\n  file lives\n\nAfter.\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, "{{APIDOC_0}}\n\nAfter.\n");
        assert_eq!(tokens[0].value, "{String} path - where the\nfile lives");
    }

    #[test]
    fn test_value_stops_at_next_block() {
        let input = "@event e\n- item\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, "{{APIDOC_0}}\n- item\n");
        assert_eq!(tokens[0].value, "e");
    }

    #[test]
    fn test_tag_in_heading_ends_at_line() {
        let input = "## @method methodName\n@param {Boolean} p1\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, "## {{APIDOC_0}}\n{{APIDOC_1}}\n");
        assert_eq!(tokens[0].value, "methodName");
    }

    #[test]
    fn test_heading_does_not_swallow_next_line() {
        let input = "### @event ready\nFired once.\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, "### {{APIDOC_0}}\nFired once.\n");
        assert_eq!(tokens[0].value, "ready");
    }

    #[test]
    fn test_tags_in_list_and_blockquote() {
        let input = "- @param {A} a\n> @param {B} b\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, "- {{APIDOC_0}}\n> {{APIDOC_1}}\n");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_fenced_code_left_alone() {
        let input = "```\n@method inside\n```\n@method outside\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, "```\n@method inside\n```\n{{APIDOC_0}}\n");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "outside");
    }

    #[test]
    fn test_tag_value_stops_before_fence() {
        let input = "@method m\n```\n@param {T} x\n```\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, "{{APIDOC_0}}\n```\n@param {T} x\n```\n");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_fences_scanned_when_disabled() {
        let config = AnnotationsConfig {
            skip_code_fences: false,
            ..AnnotationsConfig::default()
        };
        let (output, tokens) = scan_with(&config, "~~~\n@event inside\n~~~\n");
        assert_eq!(output, "~~~\n{{APIDOC_0}}\n~~~\n");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_mid_sentence_marker_is_text_by_default() {
        let input = "Call it with @param first.\n";
        let (output, tokens) = scan(input);
        assert_eq!(output, input);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_lax_mode_finds_mid_sentence_tags() {
        let config = AnnotationsConfig {
            require_line_start: false,
            ..AnnotationsConfig::default()
        };
        let (output, tokens) = scan_with(&config, "See @event ready\n");
        assert_eq!(output, "See {{APIDOC_0}}\n");
        assert_eq!(tokens[0].value, "ready");
    }

    #[test]
    fn test_unknown_tag_is_recorded_without_record() {
        let (output, tokens) = scan("@foo bar");
        assert_eq!(output, "{{APIDOC_0}}");
        assert_eq!(tokens[0].name, "foo");
        assert_eq!(tokens[0].record, None);
    }

    #[test]
    fn test_returns_outside_method_reports_line() {
        let config = AnnotationsConfig::default();
        let mut scanner = AnnotationScanner::new(&config, &echo);
        let err = scanner
            .process("Intro.\n\n@returns {Boolean}\n")
            .unwrap_err();
        assert!(matches!(err, ApiDocError::ReturnsOutsideMethod { line: 3 }));
    }

    #[test]
    fn test_context_links_params() {
        let config = AnnotationsConfig::default();
        let mut scanner = AnnotationScanner::new(&config, &echo);
        scanner
            .process("@event e\n@param {A} a\n@param {B} b\n")
            .unwrap();

        let Some(TagRecord::Structural(event)) = &scanner.tokens()[0].record else {
            panic!("expected structural record");
        };
        assert_eq!(scanner.context().scope(event.scope).params.len(), 2);
    }

    #[test]
    fn test_custom_marker() {
        let config = AnnotationsConfig {
            marker: '!',
            ..AnnotationsConfig::default()
        };
        let (output, tokens) = scan_with(&config, "!method m\n\n@method not\n");
        assert_eq!(output, "{{APIDOC_0}}\n\n@method not\n");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "m");
    }

    #[test]
    fn test_crlf_endings_preserved() {
        let (output, tokens) = scan("@method m\r\ntext\r\n\r\nmore\r\n");
        assert_eq!(output, "{{APIDOC_0}}\r\n\r\nmore\r\n");
        assert_eq!(tokens[0].value, "m\ntext");
    }
}
