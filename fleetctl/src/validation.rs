//! Field-format checks shared by the form editors.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::net::IpAddr;
use std::str::FromStr;

/// Earliest manufacturing year accepted for a machine
pub const MIN_MANUFACTURING_YEAR: i32 = 1900;

static MAC_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$").expect("valid MAC regex"));

// Fits the NUMERIC(10,2) credit_value column without rounding
static CREDIT_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,8}(\.\d{1,2})?$").expect("valid credit regex"));

/// IPv4 or IPv6 address
pub fn is_valid_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// Six colon-separated pairs of hex digits, e.g. `00:1A:2B:3C:4D:5E`
pub fn is_valid_mac(value: &str) -> bool {
    MAC_ADDRESS.is_match(value)
}

/// Parse a non-negative credit value such as `0.25`: at most 8 integer digits and 2 decimals
pub fn parse_credit_value(value: &str) -> Option<Decimal> {
    if !CREDIT_VALUE.is_match(value) {
        return None;
    }
    Decimal::from_str(value).ok()
}

/// Parse a manufacturing year between [`MIN_MANUFACTURING_YEAR`] and the current year
pub fn parse_manufacturing_year(value: &str) -> Option<i32> {
    let current_year = Utc::now().year();
    value
        .parse::<i32>()
        .ok()
        .filter(|year| (MIN_MANUFACTURING_YEAR..=current_year).contains(year))
}
