//! Configuration module for the donor finder.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::models::Coordinates;

/// Default greeting typed out by the portfolio intro.
pub const DEFAULT_GREETING: &str = "Hey, Kaarthik Kishore Here.";

/// Default recipient of the portfolio contact form.
pub const DEFAULT_CONTACT_EMAIL: &str = "kaarthikkishoreg@gmail.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit log lines as JSON objects
    pub log_json: bool,
    /// Fixed coordinates reported by the location provider, if any
    pub location: Option<Coordinates>,
    /// Country calling code prefixed to WhatsApp numbers
    pub country_code: String,
    /// Text typed out by the portfolio intro animation
    pub greeting: String,
    /// Recipient of the portfolio contact form
    pub contact_email: String,
    /// System colour-scheme preference used when no theme is stored
    pub prefers_dark: bool,
    /// User agent used to choose between mail app and webmail compose
    pub user_agent: Option<String>,
    /// Problems found while loading, logged once logging is initialized
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/donors.sqlite"),
            log_level: "info".to_string(),
            log_json: false,
            location: None,
            country_code: "91".to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            prefers_dark: false,
            user_agent: None,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// Malformed values fall back to their defaults and are recorded in
    /// `warnings` for [`Config::log_warnings`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut warnings = Vec::new();
        let mut malformed = |key: &str, raw: &str| {
            warnings.push(format!("Ignoring malformed {key} {raw:?}"));
        };

        let db_path = lookup("DONOR_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let log_level = lookup("DONOR_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_json = match lookup("DONOR_LOG_JSON") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                malformed("DONOR_LOG_JSON", &raw);
                defaults.log_json
            }),
            None => defaults.log_json,
        };

        let location = lookup("DONOR_LOCATION").and_then(|raw| {
            let parsed = Coordinates::parse_pair(&raw);
            if parsed.is_none() {
                malformed("DONOR_LOCATION", &raw);
            }
            parsed
        });

        let country_code = match lookup("DONOR_COUNTRY_CODE") {
            Some(code) if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) => code,
            Some(raw) => {
                malformed("DONOR_COUNTRY_CODE", &raw);
                defaults.country_code
            }
            None => defaults.country_code,
        };

        let greeting = lookup("PORTFOLIO_GREETING").unwrap_or(defaults.greeting);

        let contact_email = lookup("PORTFOLIO_CONTACT_EMAIL").unwrap_or(defaults.contact_email);

        let prefers_dark = match lookup("PORTFOLIO_PREFERS_DARK") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                malformed("PORTFOLIO_PREFERS_DARK", &raw);
                defaults.prefers_dark
            }),
            None => defaults.prefers_dark,
        };

        let user_agent = lookup("PORTFOLIO_USER_AGENT");

        Self {
            db_path,
            log_level,
            log_json,
            location,
            country_code,
            greeting,
            contact_email,
            prefers_dark,
            user_agent,
            warnings,
        }
    }

    /// Emit the warnings collected while loading.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{}", warning);
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
