use crate::domain::ChartRecord;

pub const NO_CHART_DISPLAY: &str = "No chart data available.";

/// Markdown summary of a chart for the front end.
///
/// Unlike [`super::format_context`] this tolerates the missing-chart case, and
/// it leaves orbs out of the aspect list.
pub fn format_for_display(chart: Option<&ChartRecord>) -> String {
    let Some(chart) = chart else {
        return NO_CHART_DISPLAY.to_string();
    };

    let birth = chart.birth_data();
    let mut lines = vec![
        format!("# Natal Chart: {}", chart.name()),
        String::new(),
        format!("**Birth:** {} at {}", birth.date, birth.time),
        format!("**Location:** {}", birth.city),
        String::new(),
        "## Core Identity".to_string(),
        String::new(),
    ];

    for text in chart.interpretation().values() {
        lines.push(text.to_string());
        lines.push(String::new());
    }

    lines.push("## Planetary Placements".to_string());
    lines.push(String::new());
    if !chart.placements().is_empty() {
        for placement in chart.placements() {
            let retro = if placement.retrograde { " ℞" } else { "" };
            lines.push(format!(
                "- **{}**: {} (House {}){}",
                placement.planet, placement.sign, placement.house, retro
            ));
        }
        lines.push(String::new());
    }

    if !chart.major_aspects().is_empty() {
        lines.push("## Major Aspects".to_string());
        lines.push(String::new());
        for aspect in chart.major_aspects() {
            lines.push(format!("- {}: {}", aspect.pair(), aspect.aspect_type));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
