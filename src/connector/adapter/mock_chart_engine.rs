use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::application::ChartEngine;
use crate::domain::{
    interpret_core, Aspect, BirthData, BirthDetails, ChartRecord, DomainError, HouseCusp,
    HouseNumber, Placement, ZODIAC_SIGNS,
};

const ASCENDANT: &str = "Ascendant (Rising)";

const BODIES: [&str; 11] = [
    "Sun",
    "Moon",
    "Mercury",
    "Venus",
    "Mars",
    "Jupiter",
    "Saturn",
    "Uranus",
    "Neptune",
    "Pluto",
    "North Node",
];

/// (name, exact angle, allowed orb)
const MAJOR_ASPECTS: [(&str, f64, f64); 5] = [
    ("conjunction", 0.0, 8.0),
    ("sextile", 60.0, 6.0),
    ("square", 90.0, 8.0),
    ("trine", 120.0, 8.0),
    ("opposition", 180.0, 8.0),
];

/// Offline engine producing a plausible, fully deterministic chart.
///
/// Longitudes come from an RNG seeded with a SHA-256 of the birth details, so
/// the same person always gets the same chart. Houses are equal 30° segments
/// from the Ascendant. No visual is rendered.
pub struct MockChartEngine;

impl MockChartEngine {
    pub fn new() -> Self {
        Self
    }

    fn seed(details: &BirthDetails) -> u64 {
        let key = format!(
            "{}|{}|{}|{}|{}|{}|{:.4}|{:.4}|{}",
            details.name,
            details.year,
            details.month,
            details.day,
            details.hour,
            details.minute,
            details.latitude,
            details.longitude,
            details.timezone
        );
        let digest = Sha256::digest(key.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(seed)
    }

    fn build(details: &BirthDetails) -> ChartRecord {
        let mut rng = StdRng::seed_from_u64(Self::seed(details));

        let ascendant: f64 = rng.gen_range(0.0..360.0);
        let longitudes: Vec<f64> = BODIES.iter().map(|_| rng.gen_range(0.0..360.0)).collect();

        let mut placements = Vec::with_capacity(BODIES.len() + 1);
        placements.push(
            Placement::new(ASCENDANT, sign_of(ascendant), HouseNumber::Label("1".to_string()))
                .with_position(round2(ascendant % 30.0)),
        );
        for (body, &longitude) in BODIES.iter().zip(&longitudes) {
            let retrograde = match *body {
                "Sun" | "Moon" => false,
                "North Node" => true,
                _ => rng.gen_bool(0.2),
            };
            placements.push(
                Placement::new(*body, sign_of(longitude), house_of(longitude, ascendant).into())
                    .with_position(round2(longitude % 30.0))
                    .retrograde(retrograde),
            );
        }

        let houses = (1..=12u8)
            .map(|house| {
                let cusp = (ascendant + 30.0 * f64::from(house - 1)) % 360.0;
                HouseCusp {
                    house,
                    sign: sign_of(cusp).to_string(),
                    position: round2(cusp % 30.0),
                }
            })
            .collect();

        let interpretation = interpret_core(
            Some(sign_of(longitudes[0])),
            Some(sign_of(longitudes[1])),
            Some(sign_of(ascendant)),
        );

        let city = if details.city.trim().is_empty() {
            "Unknown".to_string()
        } else {
            details.city.clone()
        };
        let birth_data = BirthData {
            date: details.date_label(),
            time: details.time_label(),
            city,
            latitude: details.latitude,
            longitude: details.longitude,
            timezone: details.timezone.clone(),
        };

        ChartRecord::new(details.name.clone(), birth_data)
            .with_placements(placements)
            .with_aspects(find_aspects(&longitudes))
            .with_houses(houses)
            .with_interpretation(interpretation)
    }
}

impl Default for MockChartEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChartEngine for MockChartEngine {
    async fn compute_chart(&self, details: &BirthDetails) -> Result<ChartRecord, DomainError> {
        let chart = Self::build(details);
        debug!(
            "Mock chart for {}: {} placements, {} aspects",
            chart.name(),
            chart.placements().len(),
            chart.aspects().len()
        );
        Ok(chart)
    }

    fn engine_name(&self) -> &str {
        "mock-chart-engine"
    }

    fn is_synthetic(&self) -> bool {
        true
    }
}

fn sign_of(longitude: f64) -> &'static str {
    let index = (longitude.rem_euclid(360.0) / 30.0) as usize;
    ZODIAC_SIGNS[index.min(11)]
}

fn house_of(longitude: f64, ascendant: f64) -> u8 {
    let offset = (longitude - ascendant).rem_euclid(360.0);
    ((offset / 30.0) as u8).min(11) + 1
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Major aspects between every pair of bodies, tightest orb first.
fn find_aspects(longitudes: &[f64]) -> Vec<Aspect> {
    let mut aspects = Vec::new();
    for i in 0..longitudes.len() {
        for j in (i + 1)..longitudes.len() {
            let mut separation = (longitudes[i] - longitudes[j]).abs() % 360.0;
            if separation > 180.0 {
                separation = 360.0 - separation;
            }
            for (name, angle, max_orb) in MAJOR_ASPECTS {
                let orb = (separation - angle).abs();
                if orb <= max_orb {
                    aspects.push(
                        Aspect::new(BODIES[i], BODIES[j], name, round2(orb)).with_degrees(angle),
                    );
                }
            }
        }
    }
    aspects.sort_by(|a, b| a.orb.total_cmp(&b.orb));
    aspects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str) -> BirthDetails {
        BirthDetails {
            name: name.to_string(),
            year: 1990,
            month: 8,
            day: 15,
            hour: 14,
            minute: 30,
            city: "Lisbon".to_string(),
            latitude: 38.7223,
            longitude: -9.1393,
            timezone: "Europe/Lisbon".to_string(),
        }
    }

    #[tokio::test]
    async fn same_details_give_same_chart() {
        let engine = MockChartEngine::new();
        let a = engine.compute_chart(&details("Ada")).await.unwrap();
        let b = engine.compute_chart(&details("Ada")).await.unwrap();
        assert_eq!(a, b);

        let c = engine.compute_chart(&details("Grace")).await.unwrap();
        assert_ne!(a.placements(), c.placements());
    }

    #[tokio::test]
    async fn chart_shape_matches_engine_contract() {
        let chart = MockChartEngine::new()
            .compute_chart(&details("Ada"))
            .await
            .unwrap();

        assert_eq!(chart.placements().len(), 12);
        assert_eq!(chart.placements()[0].planet, ASCENDANT);
        assert_eq!(chart.placements()[1].planet, "Sun");
        assert_eq!(chart.placements()[11].planet, "North Node");
        assert!(chart
            .placements()
            .iter()
            .all(|p| ZODIAC_SIGNS.contains(&p.sign.as_str()) && p.position <= 30.0));

        assert_eq!(chart.houses().len(), 12);
        assert_eq!(chart.houses()[0].sign, chart.placements()[0].sign);

        let data = chart.birth_data();
        assert_eq!(data.date, "1990-08-15");
        assert_eq!(data.time, "14:30");
        assert_eq!(data.city, "Lisbon");
        assert!(chart.chart_svg_path().is_none());
    }

    #[tokio::test]
    async fn interpretation_follows_core_signs() {
        let chart = MockChartEngine::new()
            .compute_chart(&details("Ada"))
            .await
            .unwrap();
        let sun = chart.placement("Sun").unwrap();

        let expected = interpret_core(Some(sun.sign.as_str()), None, None).sun;
        assert_eq!(chart.interpretation().sun, expected);
        assert!(chart.interpretation().moon.is_some());
        assert!(chart.interpretation().rising.is_some());
    }

    #[test]
    fn aspects_are_sorted_and_within_orb() {
        let longitudes = [0.0, 3.5, 62.0, 181.0, 95.0, 240.0, 300.0, 10.0, 130.0, 200.0, 45.0];
        let aspects = find_aspects(&longitudes);

        assert!(!aspects.is_empty());
        assert!(aspects.windows(2).all(|w| w[0].orb <= w[1].orb));
        for aspect in &aspects {
            let (_, _, max_orb) = MAJOR_ASPECTS
                .iter()
                .find(|(name, _, _)| *name == aspect.aspect_type)
                .unwrap();
            assert!(aspect.orb <= *max_orb);
        }

        let sun_moon = aspects.iter().find(|a| a.pair() == "Sun-Moon").unwrap();
        assert_eq!(sun_moon.aspect_type, "conjunction");
        assert_eq!(sun_moon.orb, 3.5);
    }

    #[test]
    fn separation_wraps_around_the_zodiac() {
        let aspects = find_aspects(&[358.0, 2.0]);
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].aspect_type, "conjunction");
        assert_eq!(aspects[0].orb, 4.0);
    }

    #[test]
    fn houses_count_from_the_ascendant() {
        assert_eq!(house_of(100.0, 100.0), 1);
        assert_eq!(house_of(129.9, 100.0), 1);
        assert_eq!(house_of(130.0, 100.0), 2);
        assert_eq!(house_of(90.0, 100.0), 12);
        assert_eq!(sign_of(359.9), "Pisces");
        assert_eq!(sign_of(0.0), "Aries");
    }
}
