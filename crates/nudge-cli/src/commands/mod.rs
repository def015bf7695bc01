pub mod config;
pub mod context;
pub mod score;
pub mod timing;

use chrono::{DateTime, FixedOffset, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse a snake_case enum name the same way config files spell it.
pub fn parse_name<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    let normalized = value.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unrecognised value: '{value}'"))
}

/// RFC 3339 timestamp, or the current local time.
pub fn parse_at(at: Option<&str>) -> Result<DateTime<FixedOffset>, String> {
    match at {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| format!("invalid timestamp '{s}': {e} (expected RFC 3339)")),
        None => Ok(Local::now().fixed_offset()),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
