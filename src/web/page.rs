//! HTML rendering for the single-page form.

use crate::domain::model::{Processing, Region, Variety, Verdict, MIN_ALTITUDE};
use crate::utils::error::Result;
use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};

pub const PAGE_TITLE: &str = "Predicting Specialty Coffee";
pub const HEADER_IMAGE_ROUTE: &str = "/photo/coffeeheader.jpg";

// The `.html` suffix turns on auto-escaping for every interpolated value.
const PAGE_TEMPLATE_NAME: &str = "page.html";
const PAGE_TEMPLATE: &str = include_str!("templates/page.html");

/// Raw widget values as posted by the browser. Absent fields arrive empty
/// and are rejected when parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct FormView {
    #[serde(default)]
    pub altitude: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub processing: String,
    #[serde(default)]
    pub variety: String,
}

impl Default for FormView {
    fn default() -> Self {
        Self {
            altitude: MIN_ALTITUDE.to_string(),
            region: Region::ALL[0].as_str().to_string(),
            processing: Processing::ALL[0].as_str().to_string(),
            variety: Variety::ALL[0].as_str().to_string(),
        }
    }
}

/// What to show under the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Verdict(Verdict),
    Error(String),
}

#[derive(Serialize)]
struct SelectField<'a> {
    name: &'static str,
    caption: &'static str,
    options: Vec<&'static str>,
    selected: &'a str,
}

impl<'a> SelectField<'a> {
    fn new(name: &'static str, caption: &'static str, options: impl IntoIterator<Item = &'static str>, selected: &'a str) -> Self {
        Self {
            name,
            caption,
            options: options.into_iter().collect(),
            selected,
        }
    }
}

pub fn render_page(view: &FormView, outcome: Option<&Outcome>) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
    let template = env.get_template(PAGE_TEMPLATE_NAME)?;

    let selects = [
        SelectField::new(Region::FIELD, "Region", Region::ALL.iter().map(|r| r.as_str()), &view.region),
        SelectField::new(
            Processing::FIELD,
            "Processing Method",
            Processing::ALL.iter().map(|p| p.as_str()),
            &view.processing,
        ),
        SelectField::new(Variety::FIELD, "Arabica Variety", Variety::ALL.iter().map(|v| v.as_str()), &view.variety),
    ];

    let (success, error) = match outcome {
        Some(Outcome::Verdict(verdict)) => (Some(verdict.message()), None),
        Some(Outcome::Error(message)) => (None, Some(message.as_str())),
        None => (None, None),
    };

    let html = template.render(context! {
        title => PAGE_TITLE,
        header_image => HEADER_IMAGE_ROUTE,
        min_altitude => MIN_ALTITUDE,
        altitude => &view.altitude,
        selects => selects,
        success => success,
        error => error,
    })?;
    Ok(html)
}
