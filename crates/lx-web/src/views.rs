//! Handlebars view registry.
//!
//! Templates are embedded at compile time from `templates/`. HTML escaping is
//! on (the handlebars default), so entity names render safely.

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason, TemplateError,
};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.hbs")),
    ("alert", include_str!("../templates/alert.hbs")),
    ("muted", include_str!("../templates/muted.hbs")),
    ("feature1_form", include_str!("../templates/feature1_form.hbs")),
    ("feature1_result", include_str!("../templates/feature1_result.hbs")),
    ("feature2_form", include_str!("../templates/feature2_form.hbs")),
    ("feature2_result", include_str!("../templates/feature2_result.hbs")),
    ("feature3_form", include_str!("../templates/feature3_form.hbs")),
    ("feature3_result", include_str!("../templates/feature3_result.hbs")),
    ("feature4_form", include_str!("../templates/feature4_form.hbs")),
    ("feature4_result", include_str!("../templates/feature4_result.hbs")),
    ("feature5_form", include_str!("../templates/feature5_form.hbs")),
    ("feature5_result", include_str!("../templates/feature5_result.hbs")),
    ("feature6_form", include_str!("../templates/feature6_form.hbs")),
    ("feature6_result", include_str!("../templates/feature6_result.hbs")),
    ("feature7", include_str!("../templates/feature7.hbs")),
];

/// Severity of an inline alert partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    /// CSS suffix of the `alert-*` class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Registry of compiled dashboard templates.
pub struct Views {
    handlebars: Handlebars<'static>,
}

impl Views {
    /// Compile every embedded template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if a template fails to parse.
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_helper("fixed", Box::new(fixed_helper));
        handlebars.register_helper("json", Box::new(json_helper));

        for (name, source) in TEMPLATES {
            handlebars.register_template_string(name, *source)?;
        }

        Ok(Self { handlebars })
    }

    /// Render a registered template.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if `name` is unknown or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, RenderError> {
        self.handlebars.render(name, data)
    }

    /// Render the `alert` partial.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if rendering fails.
    pub fn alert(&self, level: AlertLevel, message: &str) -> Result<String, RenderError> {
        self.render(
            "alert",
            &serde_json::json!({ "level": level, "message": message }),
        )
    }

    /// Render the `muted` hint paragraph.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if rendering fails.
    pub fn muted(&self, message: &str) -> Result<String, RenderError> {
        self.render("muted", &serde_json::json!({ "message": message }))
    }
}

/// `{{fixed value digits}}`: format a number with a fixed number of decimals.
fn fixed_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .and_then(|v| v.value().as_f64())
        .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("fixed", 0))?;
    let digits = h
        .param(1)
        .and_then(|v| v.value().as_u64())
        .and_then(|d| usize::try_from(d).ok())
        .unwrap_or(2);

    out.write(&format!("{value:.digits$}"))?;
    Ok(())
}

/// `{{json value}}`: compact JSON, empty for null.
fn json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let Some(param) = h.param(0) else {
        return Ok(());
    };
    if param.value().is_null() {
        return Ok(());
    }
    out.write(&handlebars::html_escape(&param.value().to_string()))?;
    Ok(())
}
