//! Per-tag value parsers.
//!
//! Each parser turns a raw tag value into a [`TagRecord`], linking it into
//! the [`DocumentContext`] where the tag kind calls for it. A value that does
//! not fit its tag's grammar yields `Ok(None)`.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::DocumentContext;
use crate::error::ApiDocError;
use crate::grammar::TagKind;
use crate::record::{ParamRecord, PropertyRecord, ReturnsRecord, StructuralRecord, TagRecord};

/// Recursive markdown rendering for tag descriptions.
pub trait RenderMarkdown {
    /// Render a markdown fragment to HTML.
    ///
    /// # Errors
    ///
    /// Returns any error raised while rendering annotations nested in the
    /// fragment.
    fn render_markdown(&self, markdown: &str) -> Result<String, ApiDocError>;
}

impl<F> RenderMarkdown for F
where
    F: Fn(&str) -> Result<String, ApiDocError>,
{
    fn render_markdown(&self, markdown: &str) -> Result<String, ApiDocError> {
        self(markdown)
    }
}

/// `{types} name rest`
static TYPES_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\{(?P<types>[^{}]*)\}\s+(?P<name>\[[^\]]*\]|[\w$.]+)(?P<rest>.*)$").unwrap()
});

/// `name {types} rest`
static NAME_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<name>\[[^\]]*\]|[\w$.]+)\s+\{(?P<types>[^{}]*)\}(?P<rest>.*)$").unwrap()
});

/// `{types} rest`
static RETURNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\{(?P<types>[^{}]*)\}(?P<rest>.*)$").unwrap());

/// `[name]` or `[name=default]`
static OPTIONAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*(?P<name>[\w$.]+)\s*(?:=\s*(?P<default>.*?)\s*)?\]$").unwrap()
});

/// Parse one tag value.
///
/// # Errors
///
/// Returns [`ApiDocError::ReturnsOutsideMethod`] for `@returns` without an
/// open method, and propagates description rendering errors.
pub fn parse_tag(
    kind: TagKind,
    value: &str,
    line: usize,
    context: &mut DocumentContext,
    markdown: &dyn RenderMarkdown,
) -> Result<Option<TagRecord>, ApiDocError> {
    let value = value.trim();
    let record = match kind {
        TagKind::Method | TagKind::Event | TagKind::Action => {
            Some(TagRecord::Structural(structural(kind, value, context)))
        }
        TagKind::Param => param(value, line, context, markdown)?.map(TagRecord::Param),
        TagKind::Returns => returns(value, line, context, markdown)?.map(TagRecord::Returns),
        TagKind::Property => property(value, line, markdown)?.map(TagRecord::Property),
    };

    if record.is_none() {
        tracing::debug!(tag = %kind, value, line, "tag value does not match its grammar, skipping");
    }
    Ok(record)
}

fn structural(kind: TagKind, value: &str, context: &mut DocumentContext) -> StructuralRecord {
    StructuralRecord {
        kind,
        name: value.to_owned(),
        scope: context.open_scope(kind),
    }
}

fn param(
    value: &str,
    line: usize,
    context: &mut DocumentContext,
    markdown: &dyn RenderMarkdown,
) -> Result<Option<ParamRecord>, ApiDocError> {
    let Some(parts) = NamedParts::parse(value) else {
        return Ok(None);
    };
    let record = ParamRecord {
        types: parts.types,
        name: parts.name,
        default_value: parts.default_value,
        description: render_description(parts.rest, line, markdown)?,
    };

    if let Some(sink) = context.open_params_sink() {
        sink.push(record.clone());
    }
    Ok(Some(record))
}

fn property(
    value: &str,
    line: usize,
    markdown: &dyn RenderMarkdown,
) -> Result<Option<PropertyRecord>, ApiDocError> {
    let Some(parts) = NamedParts::parse(value) else {
        return Ok(None);
    };
    Ok(Some(PropertyRecord {
        types: parts.types,
        name: parts.name,
        description: render_description(parts.rest, line, markdown)?,
    }))
}

fn returns(
    value: &str,
    line: usize,
    context: &mut DocumentContext,
    markdown: &dyn RenderMarkdown,
) -> Result<Option<ReturnsRecord>, ApiDocError> {
    if context.open_returns_sink().is_none() {
        return Err(ApiDocError::ReturnsOutsideMethod { line });
    }

    let Some(caps) = RETURNS.captures(value) else {
        return Ok(None);
    };
    let Some(types) = split_types(&caps["types"]) else {
        return Ok(None);
    };
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    let description = render_description(rest, line, markdown)?;

    if let Some(sink) = context.open_returns_sink() {
        sink.types.extend(types.iter().cloned());
        sink.description.clone_from(&description);
    }
    Ok(Some(ReturnsRecord { types, description }))
}

/// Pieces shared by the `@param` and `@property` grammars.
struct NamedParts<'a> {
    types: Vec<String>,
    name: String,
    default_value: Option<String>,
    rest: &'a str,
}

impl<'a> NamedParts<'a> {
    fn parse(value: &'a str) -> Option<Self> {
        let caps = TYPES_FIRST
            .captures(value)
            .or_else(|| NAME_FIRST.captures(value))?;
        let types = split_types(&caps["types"])?;
        let (name, default_value) = split_name(&caps["name"])?;
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        Some(Self {
            types,
            name,
            default_value,
            rest,
        })
    }
}

/// Split a brace-delimited type expression: `(A|B)` and `A | B` both give
/// `[A, B]`. Returns `None` if no type remains.
fn split_types(raw: &str) -> Option<Vec<String>> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(raw);
    let types: Vec<String> = raw
        .split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    (!types.is_empty()).then_some(types)
}

fn split_name(raw: &str) -> Option<(String, Option<String>)> {
    if !raw.starts_with('[') {
        return Some((raw.to_owned(), None));
    }
    let caps = OPTIONAL_NAME.captures(raw)?;
    let default_value = caps
        .name("default")
        .map(|m| m.as_str().to_owned())
        .filter(|d| !d.is_empty());
    Some((caps["name"].to_owned(), default_value))
}

/// Render a description, dropping an optional leading `-` separator.
///
/// Usage errors raised by tags nested in the description are reported at
/// `line`, the line of the enclosing tag.
fn render_description(
    rest: &str,
    line: usize,
    markdown: &dyn RenderMarkdown,
) -> Result<Option<String>, ApiDocError> {
    let mut text = rest.trim();
    if let Some(after) = text.strip_prefix('-')
        && (after.is_empty() || after.starts_with(char::is_whitespace))
    {
        text = after.trim_start();
    }
    if text.is_empty() {
        return Ok(None);
    }

    let html = markdown.render_markdown(text).map_err(|err| match err {
        ApiDocError::ReturnsOutsideMethod { .. } => ApiDocError::ReturnsOutsideMethod { line },
        other => other,
    })?;
    Ok(Some(strip_wrapping_paragraph(&html).to_owned()))
}

/// Remove the `<p>` around a description that rendered as one paragraph.
fn strip_wrapping_paragraph(html: &str) -> &str {
    let html = html.trim();
    html.strip_prefix("<p>")
        .and_then(|inner| inner.strip_suffix("</p>"))
        .filter(|inner| !inner.contains("</p>"))
        .unwrap_or(html)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Wraps text in a paragraph the way a markdown renderer would.
    fn paragraphs(markdown: &str) -> Result<String, ApiDocError> {
        Ok(markdown
            .split("\n\n")
            .map(|p| format!("<p>{p}</p>"))
            .collect())
    }

    fn parse(kind: TagKind, value: &str, context: &mut DocumentContext) -> Option<TagRecord> {
        parse_tag(kind, value, 1, context, &paragraphs).unwrap()
    }

    fn parse_param(value: &str) -> Option<ParamRecord> {
        match parse(TagKind::Param, value, &mut DocumentContext::new()) {
            Some(TagRecord::Param(record)) => Some(record),
            None => None,
            Some(other) => panic!("expected a param record, got {other:?}"),
        }
    }

    fn record(types: &[&str], name: &str, description: Option<&str>) -> ParamRecord {
        ParamRecord {
            types: types.iter().map(|&t| t.to_owned()).collect(),
            name: name.to_owned(),
            default_value: None,
            description: description.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn test_param_types_first() {
        assert_eq!(
            parse_param("{type} paramName"),
            Some(record(&["type"], "paramName", None))
        );
    }

    #[test]
    fn test_param_orderings_agree() {
        let expected = Some(record(&["T"], "n", Some("d")));
        assert_eq!(parse_param("{T} n - d"), expected);
        assert_eq!(parse_param("{T} n d"), expected);
        assert_eq!(parse_param("n {T} d"), expected);
        assert_eq!(parse_param("n {T} - d"), expected);
    }

    #[test]
    fn test_param_union_types() {
        let parsed = parse_param("{String|Number} value").unwrap();
        assert_eq!(parsed.types, ["String", "Number"]);

        let parsed = parse_param("{(Type1 | Type2)} value").unwrap();
        assert_eq!(parsed.types, ["Type1", "Type2"]);
    }

    #[test]
    fn test_param_default_value() {
        let parsed = parse_param("{type} [paramName=FooBar] - here goes description").unwrap();
        assert_eq!(parsed.name, "paramName");
        assert_eq!(parsed.default_value.as_deref(), Some("FooBar"));
        assert_eq!(parsed.description.as_deref(), Some("here goes description"));
    }

    #[test]
    fn test_param_optional_without_default() {
        let parsed = parse_param("{type} [paramName]").unwrap();
        assert_eq!(parsed.name, "paramName");
        assert_eq!(parsed.default_value, None);
    }

    #[test]
    fn test_param_dotted_name() {
        let parsed = parse_param("{Object} options.timeout - in ms").unwrap();
        assert_eq!(parsed.name, "options.timeout");
        assert_eq!(parsed.description.as_deref(), Some("in ms"));
    }

    #[test]
    fn test_param_grammar_mismatch() {
        assert_eq!(parse_param("paramName"), None);
        assert_eq!(parse_param("{} paramName"), None);
        assert_eq!(parse_param("{ | } paramName"), None);
        assert_eq!(parse_param("{type}"), None);
        assert_eq!(parse_param("{type} [=x]"), None);
    }

    #[test]
    fn test_param_multi_paragraph_description_keeps_wrappers() {
        let parsed = parse_param("{T} n first\n\nsecond").unwrap();
        assert_eq!(
            parsed.description.as_deref(),
            Some("<p>first</p><p>second</p>")
        );
    }

    #[test]
    fn test_param_dash_only_description() {
        assert_eq!(parse_param("{T} n -"), Some(record(&["T"], "n", None)));
        assert_eq!(
            parse_param("{T} n -1 or more"),
            Some(record(&["T"], "n", Some("-1 or more")))
        );
    }

    #[test]
    fn test_param_attaches_to_open_scope() {
        let mut context = DocumentContext::new();
        let Some(TagRecord::Structural(method)) = parse(TagKind::Method, "m", &mut context)
        else {
            panic!("expected structural record");
        };
        parse(TagKind::Param, "{Boolean} p1", &mut context);
        parse(TagKind::Param, "{Boolean} p2", &mut context);

        let names: Vec<_> = context
            .scope(method.scope)
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["p1", "p2"]);
    }

    #[test]
    fn test_param_without_scope_is_standalone() {
        let mut context = DocumentContext::new();
        let parsed = parse(TagKind::Param, "{T} x", &mut context);
        assert!(matches!(parsed, Some(TagRecord::Param(_))));
        assert!(context.open_params_sink().is_none());
    }

    #[test]
    fn test_structural_always_produces_record() {
        let mut context = DocumentContext::new();
        for kind in [TagKind::Method, TagKind::Event, TagKind::Action] {
            let parsed = parse(kind, "  name  ", &mut context);
            let Some(TagRecord::Structural(record)) = parsed else {
                panic!("expected structural record for {kind}");
            };
            assert_eq!(record.kind, kind);
            assert_eq!(record.name, "name");
        }

        let parsed = parse(TagKind::Event, "", &mut context);
        assert!(matches!(parsed, Some(TagRecord::Structural(r)) if r.name.is_empty()));
    }

    #[test]
    fn test_returns_accumulate_types() {
        let mut context = DocumentContext::new();
        let Some(TagRecord::Structural(method)) = parse(TagKind::Method, "m", &mut context)
        else {
            panic!("expected structural record");
        };
        let first = parse(TagKind::Returns, "{A} - first", &mut context);
        let second = parse(TagKind::Returns, "{B}", &mut context);

        assert_eq!(
            first,
            Some(TagRecord::Returns(ReturnsRecord {
                types: vec!["A".to_owned()],
                description: Some("first".to_owned()),
            }))
        );
        assert_eq!(
            second,
            Some(TagRecord::Returns(ReturnsRecord {
                types: vec!["B".to_owned()],
                description: None,
            }))
        );

        let slot = context.scope(method.scope).returns.clone().unwrap();
        assert_eq!(slot.types, ["A", "B"]);
        // Last writer wins, even when it has no description.
        assert_eq!(slot.description, None);
    }

    #[test]
    fn test_returns_outside_method_fails_for_any_value() {
        for value in ["{A} - fine", "not a returns value", ""] {
            let mut context = DocumentContext::new();
            let err = parse_tag(TagKind::Returns, value, 7, &mut context, &paragraphs).unwrap_err();
            assert!(matches!(err, ApiDocError::ReturnsOutsideMethod { line: 7 }));
        }
    }

    #[test]
    fn test_returns_after_event_attach_to_method() {
        let mut context = DocumentContext::new();
        let Some(TagRecord::Structural(method)) = parse(TagKind::Method, "m", &mut context)
        else {
            panic!("expected structural record");
        };
        parse(TagKind::Event, "e", &mut context);
        let result = parse_tag(TagKind::Returns, "{A}", 3, &mut context, &paragraphs).unwrap();
        assert!(matches!(result, Some(TagRecord::Returns(_))));

        let slot = context.scope(method.scope).returns.clone().unwrap();
        assert_eq!(slot.types, ["A"]);
    }

    #[test]
    fn test_returns_grammar_mismatch_inside_method() {
        let mut context = DocumentContext::new();
        parse(TagKind::Method, "m", &mut context);
        assert_eq!(parse(TagKind::Returns, "Boolean", &mut context), None);
        assert_eq!(
            context.open_returns_sink().cloned(),
            Some(ReturnsRecord::default())
        );
    }

    #[test]
    fn test_property_never_links() {
        let mut context = DocumentContext::new();
        let Some(TagRecord::Structural(method)) = parse(TagKind::Method, "m", &mut context)
        else {
            panic!("expected structural record");
        };
        let parsed = parse(TagKind::Property, "{Boolean} enabled - on/off", &mut context);

        assert_eq!(
            parsed,
            Some(TagRecord::Property(PropertyRecord {
                types: vec!["Boolean".to_owned()],
                name: "enabled".to_owned(),
                description: Some("on/off".to_owned()),
            }))
        );
        assert!(context.scope(method.scope).params.is_empty());
    }

    #[test]
    fn test_description_render_error_propagates() {
        let failing = |_: &str| -> Result<String, ApiDocError> {
            Err(ApiDocError::UnknownTag {
                marker: '@',
                name: "nested".to_owned(),
            })
        };
        let result = parse_tag(
            TagKind::Param,
            "{T} x uses @nested",
            1,
            &mut DocumentContext::new(),
            &failing,
        );
        assert!(matches!(result, Err(ApiDocError::UnknownTag { .. })));
    }

    #[test]
    fn test_nested_returns_error_reports_enclosing_line() {
        let nested = |_: &str| -> Result<String, ApiDocError> {
            Err(ApiDocError::ReturnsOutsideMethod { line: 2 })
        };
        let result = parse_tag(
            TagKind::Param,
            "{T} x - see\nthe @returns {A}",
            9,
            &mut DocumentContext::new(),
            &nested,
        );
        assert!(matches!(
            result,
            Err(ApiDocError::ReturnsOutsideMethod { line: 9 })
        ));
    }

    #[test]
    fn test_strip_wrapping_paragraph() {
        assert_eq!(strip_wrapping_paragraph("<p>text</p>\n"), "text");
        assert_eq!(strip_wrapping_paragraph("<em>x</em>"), "<em>x</em>");
        assert_eq!(
            strip_wrapping_paragraph("<p>a</p><p>b</p>"),
            "<p>a</p><p>b</p>"
        );
    }
}
