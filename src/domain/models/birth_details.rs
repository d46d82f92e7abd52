use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Birth moment and place, as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthDetails {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl BirthDetails {
    /// Name and city are the only fields without a sensible default.
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty() && !self.city.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.has_required_fields() {
            return Err(DomainError::invalid_input("name and city are required"));
        }
        self.birth_date()?;
        self.birth_time()?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DomainError::invalid_input(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DomainError::invalid_input(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        self.birth_timezone()?;
        Ok(())
    }

    pub fn birth_date(&self) -> Result<NaiveDate, DomainError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            DomainError::invalid_input(format!(
                "{}-{:02}-{:02} is not a calendar date",
                self.year, self.month, self.day
            ))
        })
    }

    pub fn birth_time(&self) -> Result<NaiveTime, DomainError> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or_else(|| {
            DomainError::invalid_input(format!(
                "{:02}:{:02} is not a time of day",
                self.hour, self.minute
            ))
        })
    }

    /// Resolves the IANA timezone id.
    pub fn birth_timezone(&self) -> Result<Tz, DomainError> {
        let id = self.timezone.trim();
        if id.is_empty() {
            return Err(DomainError::invalid_input("timezone is required"));
        }
        id.parse::<Tz>()
            .map_err(|_| DomainError::invalid_input(format!("unknown timezone '{id}'")))
    }

    pub fn date_label(&self) -> String {
        match self.birth_date() {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(_) => format!("{}-{:02}-{:02}", self.year, self.month, self.day),
        }
    }

    pub fn time_label(&self) -> String {
        match self.birth_time() {
            Ok(time) => time.format("%H:%M").to_string(),
            Err(_) => format!("{:02}:{:02}", self.hour, self.minute),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> BirthDetails {
        BirthDetails {
            name: "Ada".to_string(),
            year: 1990,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
            city: "New York".to_string(),
            latitude: 40.7128,
            longitude: -74.006,
            timezone: "America/New_York".to_string(),
        }
    }

    #[test]
    fn labels_are_zero_padded() {
        let mut d = details();
        d.month = 3;
        d.day = 7;
        d.hour = 4;
        d.minute = 5;
        assert_eq!(d.date_label(), "1990-03-07");
        assert_eq!(d.time_label(), "04:05");
    }

    #[test]
    fn blank_name_or_city_is_missing() {
        let mut d = details();
        d.city = "   ".to_string();
        assert!(!d.has_required_fields());
        assert!(d.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn rejects_impossible_dates() {
        let mut d = details();
        d.month = 2;
        d.day = 29;
        assert!(d.validate().is_err());

        d.year = 2000;
        assert!(d.validate().is_ok());

        d.month = 13;
        assert!(d.validate().is_err());
    }

    #[test]
    fn rejects_impossible_times() {
        let mut d = details();
        d.hour = 24;
        assert!(d.validate().unwrap_err().is_invalid_input());

        let mut d = details();
        d.minute = 60;
        assert!(d.validate().unwrap_err().is_invalid_input());

        let mut d = details();
        d.hour = 23;
        d.minute = 59;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut d = details();
        d.timezone = "Mars/Olympus".to_string();
        let err = d.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("unknown timezone 'Mars/Olympus'"));

        d.timezone = "  ".to_string();
        assert!(d.validate().unwrap_err().is_invalid_input());

        d.timezone = "Asia/Kolkata".to_string();
        assert_eq!(d.birth_timezone().unwrap(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn suggested_timezones_all_resolve() {
        for id in crate::domain::common_timezones() {
            let mut d = details();
            d.timezone = id.to_string();
            assert!(d.validate().is_ok(), "{id} should resolve");
        }
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut d = details();
        d.latitude = 91.0;
        assert!(d.validate().is_err());

        let mut d = details();
        d.longitude = -181.0;
        assert!(d.validate().is_err());
    }
}
