//! Short stock readings for the Sun, Moon and Rising signs.

use crate::domain::Interpretation;

pub const ZODIAC_SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

const SUN_FALLBACK: &str = "Core identity and life force expression.";
const MOON_FALLBACK: &str = "Emotional nature and instinctual responses.";
const RISING_FALLBACK: &str = "Your outward persona and approach to life.";

pub fn interpret_sun(sign: &str) -> &'static str {
    match sign {
        "Aries" => "Bold, pioneering, and action-oriented. You lead with courage and initiative.",
        "Taurus" => "Grounded, patient, and values-driven. You seek stability and sensory pleasure.",
        "Gemini" => "Curious, communicative, and adaptable. You thrive on variety and mental stimulation.",
        "Cancer" => "Nurturing, intuitive, and emotionally deep. You value home and emotional security.",
        "Leo" => "Confident, creative, and expressive. You shine through self-expression and generosity.",
        "Virgo" => "Analytical, practical, and service-oriented. You excel through precision and helpfulness.",
        "Libra" => "Diplomatic, harmonious, and relationship-focused. You seek balance and beauty.",
        "Scorpio" => "Intense, transformative, and emotionally powerful. You dive deep and transform.",
        "Sagittarius" => "Adventurous, philosophical, and optimistic. You seek meaning and expansion.",
        "Capricorn" => "Ambitious, disciplined, and achievement-oriented. You build lasting structures.",
        "Aquarius" => "Innovative, humanitarian, and individualistic. You envision progressive futures.",
        "Pisces" => "Compassionate, imaginative, and spiritually attuned. You dissolve boundaries.",
        _ => SUN_FALLBACK,
    }
}

pub fn interpret_moon(sign: &str) -> &'static str {
    match sign {
        "Aries" => "Emotional courage and quick feelings. You need independence and action.",
        "Taurus" => "Emotional stability and comfort-seeking. You need security and sensory ease.",
        "Gemini" => "Emotionally curious and communicative. You need variety and mental connection.",
        "Cancer" => "Deeply nurturing and protective. You need emotional safety and family bonds.",
        "Leo" => "Emotionally warm and expressive. You need recognition and creative outlets.",
        "Virgo" => "Emotionally practical and analytical. You need order and useful service.",
        "Libra" => "Emotionally balanced and relational. You need harmony and partnership.",
        "Scorpio" => "Emotionally intense and private. You need depth and transformative connection.",
        "Sagittarius" => "Emotionally optimistic and free. You need adventure and philosophical meaning.",
        "Capricorn" => "Emotionally controlled and responsible. You need structure and achievement.",
        "Aquarius" => "Emotionally detached and humanitarian. You need freedom and intellectual stimulation.",
        "Pisces" => "Emotionally empathic and boundless. You need spiritual connection and creativity.",
        _ => MOON_FALLBACK,
    }
}

pub fn interpret_rising(sign: &str) -> &'static str {
    match sign {
        "Aries" => "You appear bold, direct, and energetic. First impression: pioneering and confident.",
        "Taurus" => "You appear calm, reliable, and grounded. First impression: stable and pleasant.",
        "Gemini" => "You appear curious, witty, and versatile. First impression: quick and engaging.",
        "Cancer" => "You appear gentle, protective, and empathetic. First impression: caring and sensitive.",
        "Leo" => "You appear confident, warm, and charismatic. First impression: radiant and generous.",
        "Virgo" => "You appear modest, helpful, and analytical. First impression: precise and thoughtful.",
        "Libra" => "You appear charming, diplomatic, and graceful. First impression: balanced and pleasant.",
        "Scorpio" => "You appear intense, magnetic, and private. First impression: powerful and mysterious.",
        "Sagittarius" => "You appear optimistic, adventurous, and open. First impression: friendly and philosophical.",
        "Capricorn" => "You appear serious, professional, and reserved. First impression: responsible and mature.",
        "Aquarius" => "You appear unique, friendly, and progressive. First impression: unconventional and interesting.",
        "Pisces" => "You appear gentle, dreamy, and compassionate. First impression: ethereal and artistic.",
        _ => RISING_FALLBACK,
    }
}

/// Builds the sun/moon/rising readings for whichever signs are known.
pub fn interpret_core(sun: Option<&str>, moon: Option<&str>, rising: Option<&str>) -> Interpretation {
    Interpretation {
        sun: sun.map(|s| interpret_sun(s).to_string()),
        moon: moon.map(|s| interpret_moon(s).to_string()),
        rising: rising.map(|s| interpret_rising(s).to_string()),
    }
}

/// Timezone ids offered as suggestions on birth-data entry.
pub fn common_timezones() -> &'static [&'static str] {
    &[
        "UTC",
        "America/New_York",
        "America/Chicago",
        "America/Los_Angeles",
        "Europe/London",
        "Europe/Paris",
        "Europe/Berlin",
        "Asia/Tokyo",
        "Asia/Shanghai",
        "Australia/Sydney",
        "America/Toronto",
        "America/Mexico_City",
        "Asia/Dubai",
        "Asia/Kolkata",
        "Pacific/Auckland",
    ]
}
