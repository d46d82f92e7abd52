use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::domain::{common_timezones, format_for_display, BirthDetails};

use super::super::Container;

pub const MISSING_FIELDS_MESSAGE: &str = "Please provide both name and city.";
pub const MISSING_FIELDS_STATUS: &str = "⚠ Missing required fields";
pub const INVALID_INPUT_STATUS: &str = "⚠ Invalid birth data";
pub const GENERATION_FAILED_STATUS: &str = "❌ Chart generation failed";
pub const VISUAL_MISSING_STATUS: &str = "⚠ Chart generated but SVG not found";

/// What a front end shows after a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartView {
    /// Rendered chart image, only when the file exists.
    pub visual_path: Option<String>,
    pub markdown: String,
    pub status: String,
}

impl ChartView {
    fn message(markdown: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            visual_path: None,
            markdown: markdown.into(),
            status: status.into(),
        }
    }
}

pub struct ChartController<'a> {
    container: &'a Container,
}

impl<'a> ChartController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Never fails; every outcome is described by the returned view.
    pub async fn generate(&self, details: &BirthDetails) -> ChartView {
        if !details.has_required_fields() {
            return ChartView::message(MISSING_FIELDS_MESSAGE, MISSING_FIELDS_STATUS);
        }

        let chart = match self.container.generate_chart_use_case().execute(details).await {
            Ok(chart) => chart,
            Err(e) if e.is_invalid_input() => {
                return ChartView::message(format!("Error: {e}"), INVALID_INPUT_STATUS)
            }
            Err(e) => return ChartView::message(format!("Error: {e}"), GENERATION_FAILED_STATUS),
        };

        let markdown = format_for_display(Some(chart.as_ref()));
        match chart.chart_svg_path() {
            Some(path) if !Path::new(path).exists() => {
                warn!("Chart visual {} does not exist", path);
                ChartView::message(markdown, VISUAL_MISSING_STATUS)
            }
            visual => ChartView {
                visual_path: visual.map(str::to_string),
                markdown,
                status: format!("✓ Chart generated for {}", chart.name()),
            },
        }
    }

    pub async fn status_line(&self) -> String {
        self.container.charts().status_line().await
    }

    /// Markdown for the active chart, or the no-chart placeholder.
    pub async fn current(&self) -> String {
        let chart = self.container.charts().chart().await;
        format_for_display(chart.as_deref())
    }

    /// The active chart as pretty JSON.
    pub async fn current_json(&self) -> Result<Option<String>> {
        match self.container.charts().chart().await {
            Some(chart) => Ok(Some(serde_json::to_string_pretty(chart.as_ref())?)),
            None => Ok(None),
        }
    }

    pub fn timezones(&self) -> String {
        common_timezones().join("\n")
    }
}
