use std::fmt;

use serde::{Deserialize, Serialize};

/// Only this many aspects are ever surfaced to the chat context or the display.
pub const MAJOR_ASPECT_LIMIT: usize = 5;

const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// House a body falls in. Engines report either a number or a free label
/// (the Ascendant is reported as `"1"`, unresolved houses as `"Unknown"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HouseNumber {
    Number(u8),
    Label(String),
}

impl Default for HouseNumber {
    fn default() -> Self {
        HouseNumber::Label(unknown())
    }
}

impl From<u8> for HouseNumber {
    fn from(n: u8) -> Self {
        HouseNumber::Number(n)
    }
}

impl fmt::Display for HouseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseNumber::Number(n) => write!(f, "{}", n),
            HouseNumber::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub date: String,
    pub time: String,
    #[serde(default = "unknown")]
    pub city: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub timezone: String,
}

/// A body's sign and house at the birth moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub planet: String,
    #[serde(default = "unknown")]
    pub sign: String,
    /// Ecliptic position within the sign, in degrees.
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub house: HouseNumber,
    #[serde(default)]
    pub retrograde: bool,
}

impl Placement {
    pub fn new(planet: impl Into<String>, sign: impl Into<String>, house: HouseNumber) -> Self {
        Self {
            planet: planet.into(),
            sign: sign.into(),
            position: 0.0,
            house,
            retrograde: false,
        }
    }

    pub fn with_position(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    pub fn retrograde(mut self, retrograde: bool) -> Self {
        self.retrograde = retrograde;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    #[serde(default = "unknown")]
    pub planet1: String,
    #[serde(default = "unknown")]
    pub planet2: String,
    #[serde(default = "unknown")]
    pub aspect_type: String,
    /// Deviation from the exact aspect angle, in degrees.
    #[serde(default)]
    pub orb: f64,
    #[serde(default)]
    pub aspect_degrees: f64,
}

impl Aspect {
    pub fn new(
        planet1: impl Into<String>,
        planet2: impl Into<String>,
        aspect_type: impl Into<String>,
        orb: f64,
    ) -> Self {
        Self {
            planet1: planet1.into(),
            planet2: planet2.into(),
            aspect_type: aspect_type.into(),
            orb,
            aspect_degrees: 0.0,
        }
    }

    pub fn with_degrees(mut self, degrees: f64) -> Self {
        self.aspect_degrees = degrees;
        self
    }

    pub fn pair(&self) -> String {
        format!("{}-{}", self.planet1, self.planet2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    pub house: u8,
    #[serde(default = "unknown")]
    pub sign: String,
    #[serde(default)]
    pub position: f64,
}

/// Short readings of the three core placements, iterated sun, moon, rising.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sun: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rising: Option<String>,
}

impl Interpretation {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        [&self.sun, &self.moon, &self.rising]
            .into_iter()
            .filter_map(|v| v.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }
}

/// A successfully generated natal chart.
///
/// Failed generations never produce a `ChartRecord`; engines report them as
/// errors, and everything downstream treats "failed" the same as "no chart yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    name: String,
    birth_data: BirthData,
    #[serde(default)]
    placements: Vec<Placement>,
    #[serde(default)]
    aspects: Vec<Aspect>,
    #[serde(default)]
    houses: Vec<HouseCusp>,
    #[serde(default)]
    interpretation: Interpretation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chart_svg_path: Option<String>,
}

impl ChartRecord {
    pub fn new(name: impl Into<String>, birth_data: BirthData) -> Self {
        Self {
            name: name.into(),
            birth_data,
            placements: Vec::new(),
            aspects: Vec::new(),
            houses: Vec::new(),
            interpretation: Interpretation::default(),
            chart_svg_path: None,
        }
    }

    pub fn with_placements(mut self, placements: Vec<Placement>) -> Self {
        self.placements = placements;
        self
    }

    pub fn with_aspects(mut self, aspects: Vec<Aspect>) -> Self {
        self.aspects = aspects;
        self
    }

    pub fn with_houses(mut self, houses: Vec<HouseCusp>) -> Self {
        self.houses = houses;
        self
    }

    pub fn with_interpretation(mut self, interpretation: Interpretation) -> Self {
        self.interpretation = interpretation;
        self
    }

    pub fn with_chart_svg_path(mut self, path: impl Into<String>) -> Self {
        self.chart_svg_path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_data(&self) -> &BirthData {
        &self.birth_data
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, planet: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.planet == planet)
    }

    pub fn aspects(&self) -> &[Aspect] {
        &self.aspects
    }

    /// The leading aspects in engine order, capped at [`MAJOR_ASPECT_LIMIT`].
    pub fn major_aspects(&self) -> &[Aspect] {
        let end = self.aspects.len().min(MAJOR_ASPECT_LIMIT);
        &self.aspects[..end]
    }

    pub fn houses(&self) -> &[HouseCusp] {
        &self.houses
    }

    pub fn interpretation(&self) -> &Interpretation {
        &self.interpretation
    }

    pub fn chart_svg_path(&self) -> Option<&str> {
        self.chart_svg_path.as_deref()
    }
}
