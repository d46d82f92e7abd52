use crate::domain::ChartRecord;

pub const MAX_SUGGESTED_PROMPTS: usize = 6;

/// Starters offered before any chart exists.
pub const GENERIC_PROMPTS: [&str; 5] = [
    "Tell me about my sun sign",
    "What does my moon sign mean?",
    "How do I read my natal chart?",
    "What are the most important placements?",
    "Explain houses in astrology",
];

/// Always appended after the chart-specific questions.
pub const CLOSING_PROMPTS: [&str; 3] = [
    "What stands out most in my chart?",
    "How can I work with my chart's challenges?",
    "What are my natural strengths according to my chart?",
];

/// Conversation starters, tailored to the chart when there is one.
pub fn suggested_prompts(chart: Option<&ChartRecord>) -> Vec<String> {
    let Some(chart) = chart else {
        return GENERIC_PROMPTS.iter().map(|p| p.to_string()).collect();
    };

    let mut prompts = Vec::with_capacity(MAX_SUGGESTED_PROMPTS);

    if let Some(sun) = chart.placement("Sun") {
        prompts.push(format!("What does my Sun in {} mean for my identity?", sun.sign));
    }
    if let Some(moon) = chart.placement("Moon") {
        prompts.push(format!("Tell me about my Moon in {}", moon.sign));
    }
    if let Some(venus) = chart.placement("Venus") {
        prompts.push(format!(
            "What does Venus in my {}th house say about relationships?",
            venus.house
        ));
    }

    prompts.extend(CLOSING_PROMPTS.iter().map(|p| p.to_string()));
    prompts.truncate(MAX_SUGGESTED_PROMPTS);
    prompts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{birth_data, sample_chart};
    use crate::domain::{ChartRecord, HouseNumber, Placement};

    #[test]
    fn generic_list_without_chart() {
        assert_eq!(
            suggested_prompts(None),
            vec![
                "Tell me about my sun sign",
                "What does my moon sign mean?",
                "How do I read my natal chart?",
                "What are the most important placements?",
                "Explain houses in astrology",
            ]
        );
    }

    #[test]
    fn sun_moon_venus_then_closing() {
        assert_eq!(
            suggested_prompts(Some(&sample_chart())),
            vec![
                "What does my Sun in Leo mean for my identity?",
                "Tell me about my Moon in Pisces",
                "What does Venus in my 7th house say about relationships?",
                "What stands out most in my chart?",
                "How can I work with my chart's challenges?",
                "What are my natural strengths according to my chart?",
            ]
        );
    }

    #[test]
    fn absent_planets_are_skipped() {
        let chart = ChartRecord::new("Ada", birth_data()).with_placements(vec![Placement::new(
            "Moon",
            "Aries",
            HouseNumber::Number(2),
        )]);
        let prompts = suggested_prompts(Some(&chart));

        assert_eq!(prompts.len(), 4);
        assert_eq!(prompts[0], "Tell me about my Moon in Aries");
        assert_eq!(&prompts[1..], &CLOSING_PROMPTS);
    }

    #[test]
    fn never_exceeds_six() {
        let chart = sample_chart();
        assert!(suggested_prompts(Some(&chart)).len() <= MAX_SUGGESTED_PROMPTS);
    }
}
