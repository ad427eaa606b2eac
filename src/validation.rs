//! Parameter parsing for MCP tools
//!
//! Every helper maps a bad argument to an `INVALID_PARAMS` error whose message
//! is shown to the client.

use chrono::{NaiveDate, NaiveTime};
use mcp_attr::Result as McpResult;
use std::str::FromStr;

/// Build an `INVALID_PARAMS` error with a public message
pub fn invalid_params(message: impl Into<String>) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message.into(), true)
}

/// Parse any label-like parameter (statuses, priorities, sort keys)
pub fn parse_param<T>(value: &str) -> McpResult<T>
where
    T: FromStr<Err = String>,
{
    value.parse::<T>().map_err(invalid_params)
}

/// Parse an optional parameter; `None` and blank strings stay `None`
pub fn parse_optional<T>(value: Option<&str>) -> McpResult<Option<T>>
where
    T: FromStr<Err = String>,
{
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_param(s).map(Some),
        None => Ok(None),
    }
}

/// Parse a date in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date_str
        ))
    })
}

pub fn parse_optional_date(date_str: Option<&str>) -> McpResult<Option<NaiveDate>> {
    match date_str.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(s).map(Some),
        None => Ok(None),
    }
}

/// Parse a clock time as HH:MM or HH:MM:SS
pub fn parse_time(time_str: &str) -> McpResult<NaiveTime> {
    let s = time_str.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| {
            invalid_params(format!(
                "Invalid time format '{}'. Use HH:MM (e.g., '09:30')",
                time_str
            ))
        })
}

pub fn parse_optional_time(time_str: Option<&str>) -> McpResult<Option<NaiveTime>> {
    match time_str.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_time(s).map(Some),
        None => Ok(None),
    }
}

/// Split a comma-separated tag parameter
pub fn parse_tags(tags: Option<&str>) -> Vec<String> {
    crate::model::split_tags(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TaskStatus};

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param::<TaskStatus>("to do").unwrap(), TaskStatus::Todo);
        assert_eq!(parse_param::<Priority>("HIGH").unwrap(), Priority::High);
        assert!(parse_param::<Priority>("urgent").is_err());
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert_eq!(parse_optional::<Priority>(None).unwrap(), None);
        assert_eq!(parse_optional::<Priority>(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional::<Priority>(Some("low")).unwrap(),
            Some(Priority::Low)
        );
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date("2025-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert!(parse_date("15/03/2025").is_err());
        assert_eq!(parse_optional_date(Some("")).unwrap(), None);

        assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(
            parse_time("17:05:30").unwrap(),
            NaiveTime::from_hms_opt(17, 5, 30).unwrap()
        );
        assert!(parse_time("9.30").is_err());
    }
}
