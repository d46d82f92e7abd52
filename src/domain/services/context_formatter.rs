use crate::domain::ChartRecord;

/// Renders a chart as the grounding block appended to the system prompt.
///
/// Sections appear in a fixed order (placements, key themes, major aspects)
/// and a section without data is left out entirely. Houses and raw ecliptic
/// positions are never included, and aspects are capped by
/// [`ChartRecord::major_aspects`], which keeps the block small enough for the
/// model's context budget.
pub fn format_context(chart: &ChartRecord) -> String {
    let birth = chart.birth_data();
    let mut lines = vec![
        format!("User's Natal Chart - {}", chart.name()),
        format!("Birth: {} at {}", birth.date, birth.time),
        format!("Location: {}", birth.city),
    ];

    if !chart.placements().is_empty() {
        lines.push(String::new());
        lines.push("PLACEMENTS:".to_string());
        for placement in chart.placements() {
            let retro = if placement.retrograde { " (Retrograde)" } else { "" };
            lines.push(format!(
                "- {}: {} in House {}{}",
                placement.planet, placement.sign, placement.house, retro
            ));
        }
    }

    if !chart.interpretation().is_empty() {
        lines.push(String::new());
        lines.push("KEY THEMES:".to_string());
        for text in chart.interpretation().values() {
            lines.push(format!("- {}", text));
        }
    }

    if !chart.major_aspects().is_empty() {
        lines.push(String::new());
        lines.push("MAJOR ASPECTS:".to_string());
        for aspect in chart.major_aspects() {
            lines.push(format!(
                "- {}: {} (orb: {}°)",
                aspect.pair(),
                aspect.aspect_type,
                aspect.orb
            ));
        }
    }

    lines.join("\n")
}
