//! Template set: turns tag views into HTML fragments.
//!
//! A [`TemplateSet`] has one method per tag kind. Each takes a read-only
//! view of the parsed record and returns a single balanced HTML subtree.
//! Methods may call their siblings on `self` to compose fragments, e.g. a
//! method template rendering each of its params through [`TemplateSet::param`].

use std::fmt::{self, Write};

use apidoc_renderer::{escape_html, slugify};

use crate::error::TemplateError;
use crate::grammar::TagKind;
use crate::record::{ParamRecord, PropertyRecord, ReturnsRecord};

/// View of a `@param`.
#[derive(Clone, Copy, Debug)]
pub struct ParamView<'a> {
    /// Accepted types.
    pub types: &'a [String],
    /// Parameter name.
    pub name: &'a str,
    /// Default value of an optional parameter.
    pub default_value: Option<&'a str>,
    /// Description HTML.
    pub description: Option<&'a str>,
}

impl<'a> From<&'a ParamRecord> for ParamView<'a> {
    fn from(record: &'a ParamRecord) -> Self {
        Self {
            types: &record.types,
            name: &record.name,
            default_value: record.default_value.as_deref(),
            description: record.description.as_deref(),
        }
    }
}

/// View of a `@returns` tag or a method's return slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReturnsView<'a> {
    /// Return types.
    pub types: &'a [String],
    /// Description HTML.
    pub description: Option<&'a str>,
}

impl<'a> From<&'a ReturnsRecord> for ReturnsView<'a> {
    fn from(record: &'a ReturnsRecord) -> Self {
        Self {
            types: &record.types,
            description: record.description.as_deref(),
        }
    }
}

/// View of a `@method` with everything attached to it.
#[derive(Clone, Copy, Debug)]
pub struct MethodView<'a> {
    /// Method name.
    pub name: &'a str,
    /// Attached params in source order.
    pub params: &'a [ParamRecord],
    /// Accumulated return types and last description.
    pub returns: ReturnsView<'a>,
}

/// View of an `@event` or `@action`.
#[derive(Clone, Copy, Debug)]
pub struct StructuralView<'a> {
    /// Event or action.
    pub kind: TagKind,
    /// Name as written.
    pub name: &'a str,
    /// Attached params in source order.
    pub params: &'a [ParamRecord],
}

/// View of a `@property`.
#[derive(Clone, Copy, Debug)]
pub struct PropertyView<'a> {
    /// Property types.
    pub types: &'a [String],
    /// Property name.
    pub name: &'a str,
    /// Description HTML.
    pub description: Option<&'a str>,
}

impl<'a> From<&'a PropertyRecord> for PropertyView<'a> {
    fn from(record: &'a PropertyRecord) -> Self {
        Self {
            types: &record.types,
            name: &record.name,
            description: record.description.as_deref(),
        }
    }
}

/// Swappable HTML templates, one per tag kind.
///
/// Output whitespace does not matter: the renderer collapses it.
pub trait TemplateSet {
    /// Render a `@method`.
    fn method(&self, view: &MethodView<'_>) -> Result<String, TemplateError>;
    /// Render an `@event`.
    fn event(&self, view: &StructuralView<'_>) -> Result<String, TemplateError>;
    /// Render an `@action`.
    fn action(&self, view: &StructuralView<'_>) -> Result<String, TemplateError>;
    /// Render a `@param`.
    fn param(&self, view: &ParamView<'_>) -> Result<String, TemplateError>;
    /// Render a `@returns`.
    fn returns(&self, view: &ReturnsView<'_>) -> Result<String, TemplateError>;
    /// Render a `@property`.
    fn property(&self, view: &PropertyView<'_>) -> Result<String, TemplateError>;
}

/// Default markup with every class namespaced by a prefix.
///
/// ```
/// use apidoc::{DefaultTemplates, ParamView, TemplateSet};
///
/// let types = vec!["Boolean".to_owned()];
/// let view = ParamView { types: &types, name: "p1", default_value: None, description: None };
/// let html = DefaultTemplates::default().param(&view).unwrap();
/// assert!(html.starts_with(r#"<div class="jsdoc-param jsdoc-param-arg">"#));
/// assert!(html.contains(r#"<code class="jsdoc-param-type jsdoc-param-type-boolean">Boolean</code>"#));
/// ```
#[derive(Clone, Debug)]
pub struct DefaultTemplates {
    prefix: String,
}

impl Default for DefaultTemplates {
    fn default() -> Self {
        Self::new("jsdoc")
    }
}

impl DefaultTemplates {
    /// Create templates using `prefix` for every class name.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Class prefix in use.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn write_types(&self, out: &mut String, owner: &str, types: &[String]) -> fmt::Result {
        let p = &self.prefix;
        for ty in types {
            write!(out, r#"<code class="{p}-{owner}-type"#)?;
            let slug = slugify(ty);
            if !slug.is_empty() {
                write!(out, " {p}-{owner}-type-{slug}")?;
            }
            write!(out, r#"">{}</code>"#, escape_html(ty))?;
        }
        Ok(())
    }

    fn write_signature(&self, out: &mut String, owner: &str, params: &[ParamRecord]) -> fmt::Result {
        let p = &self.prefix;
        write!(
            out,
            r#"<code class="{p}-{owner}-brace {p}-{owner}-brace-left">(</code>"#
        )?;
        for param in params {
            write!(out, r#"<code class="{p}-{owner}-param"#)?;
            let slug = slugify(&param.name);
            if !slug.is_empty() {
                write!(out, " {p}-{owner}-param-{slug}")?;
            }
            write!(out, r#"">{}</code>"#, escape_html(&param.name))?;
        }
        write!(
            out,
            r#"<code class="{p}-{owner}-brace {p}-{owner}-brace-right">)</code>"#
        )
    }

    fn write_description(
        &self,
        out: &mut String,
        owner: &str,
        description: Option<&str>,
    ) -> fmt::Result {
        match description {
            Some(html) => write!(
                out,
                r#"<span class="{p}-{owner}-description">{html}</span>"#,
                p = self.prefix
            ),
            None => Ok(()),
        }
    }

    fn named_with_params(
        &self,
        owner: &str,
        name: &str,
        params: &[ParamRecord],
    ) -> Result<String, TemplateError> {
        require_name(name)?;
        let p = &self.prefix;
        let mut out = String::new();
        write!(
            out,
            r#"<div class="{p}-{owner}"><code class="{p}-{owner}-name">{}</code>"#,
            escape_html(name)
        )?;
        if !params.is_empty() {
            write!(out, r#"<span class="{p}-{owner}-params">"#)?;
            self.write_signature(&mut out, owner, params)?;
            out.push_str("</span>");
        }
        out.push_str("</div>");
        Ok(out)
    }

    fn typed_named(
        &self,
        owner: &str,
        types: &[String],
        name: &str,
        default_value: Option<&str>,
        description: Option<&str>,
    ) -> Result<String, TemplateError> {
        require_name(name)?;
        let p = &self.prefix;
        let mut out = String::new();
        if owner == "param" {
            write!(out, r#"<div class="{p}-param {p}-param-arg">"#)?;
        } else {
            write!(out, r#"<div class="{p}-{owner}">"#)?;
        }
        if !types.is_empty() {
            write!(out, r#"<span class="{p}-{owner}-types">"#)?;
            self.write_types(&mut out, owner, types)?;
            out.push_str("</span>");
        }
        write!(
            out,
            r#"<code class="{p}-{owner}-name">{}</code>"#,
            escape_html(name)
        )?;
        if let Some(default_value) = default_value {
            write!(
                out,
                r#"<code class="{p}-{owner}-default-value">{}</code>"#,
                escape_html(default_value)
            )?;
        }
        self.write_description(&mut out, owner, description)?;
        out.push_str("</div>");
        Ok(out)
    }
}

fn require_name(name: &str) -> Result<(), TemplateError> {
    if name.trim().is_empty() {
        return Err(TemplateError::MissingField("name"));
    }
    Ok(())
}

impl TemplateSet for DefaultTemplates {
    fn method(&self, view: &MethodView<'_>) -> Result<String, TemplateError> {
        require_name(view.name)?;
        let p = &self.prefix;
        let mut out = String::new();
        write!(
            out,
            r#"<div class="{p}-method"><code class="{p}-method-name">{}</code><span class="{p}-method-params">"#,
            escape_html(view.name)
        )?;
        self.write_signature(&mut out, "method", view.params)?;
        if !view.returns.types.is_empty() {
            write!(out, r#"<span class="{p}-method-returns">"#)?;
            self.write_types(&mut out, "method-returns", view.returns.types)?;
            out.push_str("</span>");
        }
        out.push_str("</span></div>");
        Ok(out)
    }

    fn event(&self, view: &StructuralView<'_>) -> Result<String, TemplateError> {
        self.named_with_params("event", view.name, view.params)
    }

    fn action(&self, view: &StructuralView<'_>) -> Result<String, TemplateError> {
        self.named_with_params("action", view.name, view.params)
    }

    fn param(&self, view: &ParamView<'_>) -> Result<String, TemplateError> {
        self.typed_named(
            "param",
            view.types,
            view.name,
            view.default_value,
            view.description,
        )
    }

    fn returns(&self, view: &ReturnsView<'_>) -> Result<String, TemplateError> {
        let p = &self.prefix;
        let mut out = String::new();
        write!(
            out,
            r#"<div class="{p}-returns"><span class="{p}-returns-types">"#
        )?;
        self.write_types(&mut out, "returns", view.types)?;
        out.push_str("</span>");
        self.write_description(&mut out, "returns", view.description)?;
        out.push_str("</div>");
        Ok(out)
    }

    fn property(&self, view: &PropertyView<'_>) -> Result<String, TemplateError> {
        self.typed_named("property", view.types, view.name, None, view.description)
    }
}
