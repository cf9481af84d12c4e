//! Parsing helpers shared by the importers.

use beanport_core::ExtractError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month};

const MDY: &[BorrowedFormatItem<'static>] = format_description!("[month]/[day]/[year]");
const MDY_UNPADDED: &[BorrowedFormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");
const YMD_COMPACT: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

/// Parse a US-style `MM/DD/YYYY` date, padded or not.
pub fn parse_mdy(value: &str, index: u32) -> Result<Date, ExtractError> {
    let value = value.trim();
    Date::parse(value, MDY)
        .or_else(|_| Date::parse(value, MDY_UNPADDED))
        .map_err(|_| ExtractError::InvalidDate {
            value: value.to_string(),
            index,
        })
}

/// Parse a compact `YYYYMMDD` date stamp.
pub fn parse_ymd_compact(value: &str, index: u32) -> Result<Date, ExtractError> {
    Date::parse(value.trim(), YMD_COMPACT).map_err(|_| ExtractError::InvalidDate {
        value: value.to_string(),
        index,
    })
}

/// Parse a dollar-ish money string: optional sign, optional `$`, thousands
/// separators tolerated (`-$1,234.56`).
pub fn parse_money(value: &str, index: u32) -> Result<Decimal, ExtractError> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    Decimal::from_str(&cleaned).map_err(|_| ExtractError::InvalidAmount {
        value: value.to_string(),
        index,
    })
}

/// Match a regex at the start of the text, like an anchored match.
pub fn matches_start(re: &Regex, text: &str) -> bool {
    re.find(text).is_some_and(|m| m.start() == 0)
}

/// Titlecase a bank-export description. Exports come ALL CAPS; Gruber-style
/// titlecasing leaves words with embedded capitals alone, so lowercase first.
pub fn titled(text: &str) -> String {
    titlecase::titlecase(&text.trim().to_lowercase())
}

/// Derive an account leaf segment from a free-text description:
/// `"401K PRETAX"` -> `"401k-Pretax"`. Falls back to `"Other"` when nothing
/// usable remains.
pub fn account_leaf(description: &str) -> String {
    let titled = titled(description);
    let mut out = String::with_capacity(titled.len());
    let mut pending_dash = false;
    for c in titled.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    let first_ok = out
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !first_ok {
        // Lowercase leads (titlecase keeps short words down) still need a
        // valid beancount segment start.
        let mut chars = out.chars();
        match chars.next() {
            Some(c) => out = c.to_ascii_uppercase().to_string() + chars.as_str(),
            None => return "Other".to_string(),
        }
    }
    out
}

pub fn month_from_name(name: &str) -> Option<Month> {
    match name.to_ascii_lowercase().as_str() {
        "january" | "jan" => Some(Month::January),
        "february" | "feb" => Some(Month::February),
        "march" | "mar" => Some(Month::March),
        "april" | "apr" => Some(Month::April),
        "may" => Some(Month::May),
        "june" | "jun" => Some(Month::June),
        "july" | "jul" => Some(Month::July),
        "august" | "aug" => Some(Month::August),
        "september" | "sep" => Some(Month::September),
        "october" | "oct" => Some(Month::October),
        "november" | "nov" => Some(Month::November),
        "december" | "dec" => Some(Month::December),
        _ => None,
    }
}

pub fn last_day_of_month(year: i32, month: Month) -> Option<Date> {
    Date::from_calendar_date(year, month, month.length(year)).ok()
}
