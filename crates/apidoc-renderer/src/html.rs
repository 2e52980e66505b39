//! HTML backend for markdown rendering.

use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::state::escape_html;

/// HTML5 render backend.
///
/// Code blocks become `<pre><code>` with a `language-*` class, images
/// become `<img>` and blockquotes stay `<blockquote>`.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        match lang {
            Some(lang) => write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap(),
            None => write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap(),
        }
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        write!(out, r#"<img src="{}""#, escape_html(src)).unwrap();
        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        write!(out, r#" alt="{}">"#, escape_html(alt)).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("js"), "a < b", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-js">a &lt; b</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "@method keep", &mut out);
        assert_eq!(out, "<pre><code>@method keep</code></pre>");
    }

    #[test]
    fn test_blockquote() {
        let mut out = String::new();
        HtmlBackend::blockquote_start(&mut out);
        out.push_str("quoted");
        HtmlBackend::blockquote_end(&mut out);
        assert_eq!(out, "<blockquote>quoted</blockquote>");
    }

    #[test]
    fn test_image() {
        let mut out = String::new();
        HtmlBackend::image("diagram.png", "Flow", "", &mut out);
        assert_eq!(out, r#"<img src="diagram.png" alt="Flow">"#);
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend::image("diagram.png", "Flow", "Request \"flow\"", &mut out);
        assert_eq!(
            out,
            r#"<img src="diagram.png" title="Request &quot;flow&quot;" alt="Flow">"#
        );
    }

    #[test]
    fn test_default_break_and_rule() {
        let mut out = String::new();
        HtmlBackend::hard_break(&mut out);
        HtmlBackend::horizontal_rule(&mut out);
        assert_eq!(out, "<br><hr>");
    }

    #[test]
    fn test_task_list_marker() {
        let mut out = String::new();
        HtmlBackend::task_list_marker(true, &mut out);
        HtmlBackend::task_list_marker(false, &mut out);
        assert_eq!(
            out,
            r#"<input type="checkbox" checked disabled> <input type="checkbox" disabled> "#
        );
    }
}
