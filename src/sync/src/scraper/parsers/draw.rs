//! Draw entry normalizer for the draw notice endpoint.
//!
//! Turns a raw entry such as
//! `{"code": "2024124", "red": "02,14,15,17,25,30", "blue": "11", "date": "2024-10-29(二)"}`
//! into a validated [`DrawRecord`].

use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::{Result, SyncError};
use crate::types::{
    DrawCode, DrawPage, DrawRecord, RawDraw, BLUE_RANGE, DISPLAY_DATE_FORMAT, RED_COUNT,
    RED_RANGE, SOURCE_DATE_FORMAT,
};

/// Parenthetical annotation, ASCII or full-width, e.g. "(二)" or "（二）"
static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(（][^)）]*[)）]").expect("valid annotation pattern"));

/// Parser for draw notice entries
pub struct DrawParser;

impl DrawParser {
    /// Decode a response body
    pub fn parse_page(body: &str) -> Result<DrawPage> {
        Ok(serde_json::from_str(body)?)
    }

    /// Normalize one raw entry
    pub fn parse(raw: &RawDraw) -> Result<DrawRecord> {
        let code = DrawCode::new(raw.code.as_str());
        if code.is_empty() {
            return Err(SyncError::format("<empty>", "missing draw code"));
        }

        let draw_date = Self::parse_date(&raw.date)
            .ok_or_else(|| SyncError::format(code.as_str(), format!("bad date '{}'", raw.date)))?;
        let red = Self::parse_red(code.as_str(), &raw.red)?;
        let blue = Self::parse_ball(&raw.blue)
            .filter(|n| BLUE_RANGE.contains(n))
            .ok_or_else(|| SyncError::format(code.as_str(), format!("bad blue ball '{}'", raw.blue)))?;

        Ok(DrawRecord {
            code,
            draw_date,
            red,
            blue,
        })
    }

    /// Parse a source date, dropping any parenthetical annotation
    ///
    /// Also accepts the display format so that sheets written by this tool
    /// can be read back.
    pub fn parse_date(text: &str) -> Option<NaiveDate> {
        let stripped = ANNOTATION_RE.replace_all(text, "");
        let trimmed = stripped.trim();

        NaiveDate::parse_from_str(trimmed, SOURCE_DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, DISPLAY_DATE_FORMAT))
            .ok()
    }

    /// Parse the comma-joined red balls
    pub fn parse_red(code: &str, text: &str) -> Result<[u8; RED_COUNT]> {
        // Empty tokens count, so "a,,b" or a trailing comma fails below
        let tokens: Vec<&str> = text.split(',').map(str::trim).collect();

        if tokens.len() != RED_COUNT {
            return Err(SyncError::format(
                code,
                format!("expected {} red balls, got {}", RED_COUNT, tokens.len()),
            ));
        }

        let mut red = [0u8; RED_COUNT];
        for (slot, token) in red.iter_mut().zip(&tokens) {
            *slot = Self::parse_ball(token)
                .filter(|n| RED_RANGE.contains(n))
                .ok_or_else(|| SyncError::format(code, format!("bad red ball '{}'", token)))?;
        }

        let distinct: HashSet<u8> = red.iter().copied().collect();
        if distinct.len() != RED_COUNT {
            return Err(SyncError::format(code, format!("duplicate red balls '{}'", text)));
        }

        Ok(red)
    }

    /// Parse one ball number ("02" or "2")
    pub fn parse_ball(text: &str) -> Option<u8> {
        text.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(code: &str, red: &str, blue: &str, date: &str) -> RawDraw {
        RawDraw {
            code: code.to_string(),
            red: red.to_string(),
            blue: blue.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_parse_valid_entry() {
        let record =
            DrawParser::parse(&raw("2024124", "02,14,15,17,25,30", "11", "2024-10-29(二)")).unwrap();

        assert_eq!(record.code.as_str(), "2024124");
        assert_eq!(record.draw_date, NaiveDate::from_ymd_opt(2024, 10, 29).unwrap());
        assert_eq!(record.red, [2, 14, 15, 17, 25, 30]);
        assert_eq!(record.blue, 11);
        assert_eq!(record.date_display(), "2024年10月29日");
    }

    #[test]
    fn test_parse_date_annotations() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2);
        assert_eq!(DrawParser::parse_date("2024-01-02"), expected);
        assert_eq!(DrawParser::parse_date("2024-01-02(二)"), expected);
        assert_eq!(DrawParser::parse_date("2024-01-02（二）"), expected);
        assert_eq!(DrawParser::parse_date(" 2024-01-02 (Tue) "), expected);
        assert_eq!(DrawParser::parse_date("2024年01月02日"), expected);
        assert_eq!(DrawParser::parse_date("yesterday"), None);
    }

    #[test]
    fn test_five_red_balls_rejected() {
        let err = DrawParser::parse(&raw("2024124", "02,14,15,17,25", "11", "2024-10-29"))
            .unwrap_err();

        assert!(err.is_recoverable());
        assert!(err.to_string().contains("expected 6 red balls, got 5"));
    }

    #[test]
    fn test_empty_red_tokens_rejected() {
        let trailing = DrawParser::parse_red("2024124", "02,14,15,17,25,30,").unwrap_err();
        assert!(trailing.to_string().contains("expected 6 red balls, got 7"));

        let doubled = DrawParser::parse_red("2024124", "02,,14,15,17,25").unwrap_err();
        assert!(doubled.is_recoverable());
        assert!(doubled.to_string().contains("bad red ball ''"));

        assert!(DrawParser::parse_red("2024124", "").is_err());
    }

    #[test]
    fn test_duplicate_red_balls_rejected() {
        let result = DrawParser::parse(&raw("2024124", "02,02,15,17,25,30", "11", "2024-10-29"));
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_balls_rejected() {
        assert!(DrawParser::parse(&raw("2024124", "02,14,15,17,25,34", "11", "2024-10-29")).is_err());
        assert!(DrawParser::parse(&raw("2024124", "02,14,15,17,25,30", "17", "2024-10-29")).is_err());
        assert!(DrawParser::parse(&raw("2024124", "02,14,15,17,25,xx", "11", "2024-10-29")).is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = DrawParser::parse(&raw("2024124", "02,14,15,17,25,30", "11", "29/10/2024"))
            .unwrap_err();
        assert!(err.to_string().contains("bad date"));
    }

    #[test]
    fn test_empty_code_rejected() {
        assert!(DrawParser::parse(&raw("  ", "02,14,15,17,25,30", "11", "2024-10-29")).is_err());
    }

    #[test]
    fn test_parse_page_invalid_json() {
        let err = DrawParser::parse_page("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }
}
