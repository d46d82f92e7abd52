//! Sample charts shared by unit tests.

use crate::domain::{Aspect, BirthData, ChartRecord, HouseNumber, Interpretation, Placement};

pub fn birth_data() -> BirthData {
    BirthData {
        date: "1990-08-15".to_string(),
        time: "14:30".to_string(),
        city: "Lisbon".to_string(),
        latitude: 38.7223,
        longitude: -9.1393,
        timezone: "Europe/Lisbon".to_string(),
    }
}

/// Sun in Leo, Moon in Pisces, Venus in the 7th house, Mercury retrograde.
pub fn sample_chart() -> ChartRecord {
    ChartRecord::new("Ada", birth_data())
        .with_placements(vec![
            Placement::new("Ascendant (Rising)", "Scorpio", HouseNumber::Label("1".to_string())),
            Placement::new("Sun", "Leo", HouseNumber::Number(10)).with_position(22.5),
            Placement::new("Moon", "Pisces", HouseNumber::Number(4)).with_position(3.1),
            Placement::new("Mercury", "Virgo", HouseNumber::Number(11)).retrograde(true),
            Placement::new("Venus", "Cancer", HouseNumber::Number(7)),
        ])
        .with_aspects(vec![
            Aspect::new("Sun", "Moon", "quincunx", 0.42),
            Aspect::new("Venus", "Mars", "square", 1.5),
        ])
        .with_interpretation(Interpretation {
            sun: Some("Sun reading.".to_string()),
            moon: Some("Moon reading.".to_string()),
            rising: Some("Rising reading.".to_string()),
        })
}

pub fn chart_with_aspects(count: usize) -> ChartRecord {
    let aspects = (0..count)
        .map(|i| Aspect::new(format!("Body{i}"), "Sun", "trine", i as f64 + 0.5))
        .collect();
    sample_chart().with_aspects(aspects)
}
