use clap::{Args, Subcommand};

use crate::domain::BirthDetails;

/// Birth data flags. Defaults mirror a blank entry form; only name and city
/// must be supplied.
#[derive(Args, Debug, Clone)]
pub struct BirthArgs {
    /// Whose chart to generate
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, default_value_t = 1990)]
    pub year: i32,

    #[arg(long, default_value_t = 1)]
    pub month: u32,

    #[arg(long, default_value_t = 1)]
    pub day: u32,

    /// Hour of birth, 24h clock
    #[arg(long, default_value_t = 12)]
    pub hour: u32,

    #[arg(long, default_value_t = 0)]
    pub minute: u32,

    /// Birth city
    #[arg(long)]
    pub city: Option<String>,

    #[arg(long, default_value_t = 40.7128, allow_hyphen_values = true)]
    pub latitude: f64,

    #[arg(long, default_value_t = -74.006, allow_hyphen_values = true)]
    pub longitude: f64,

    /// IANA timezone id (see `timezones`)
    #[arg(long, default_value = "America/New_York")]
    pub timezone: String,
}

impl BirthArgs {
    /// True when the user asked for a chart on this invocation.
    pub fn is_given(&self) -> bool {
        self.name.is_some() || self.city.is_some()
    }

    pub fn to_details(&self) -> BirthDetails {
        BirthDetails {
            name: self.name.clone().unwrap_or_default(),
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            city: self.city.clone().unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a natal chart and print its summary
    Chart {
        #[command(flatten)]
        birth: BirthArgs,

        /// Print the full chart record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask one question and print the whole reply
    Ask {
        message: String,

        #[command(flatten)]
        birth: BirthArgs,
    },

    /// Interactive chat with streamed replies
    Chat {
        #[command(flatten)]
        birth: BirthArgs,
    },

    /// Show suggested questions
    Prompts {
        #[command(flatten)]
        birth: BirthArgs,
    },

    /// List common timezone ids
    Timezones,

    /// Serve the JSON/SSE HTTP API
    Serve {
        #[arg(long, default_value_t = 7860)]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },
}
