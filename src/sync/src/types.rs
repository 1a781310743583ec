//! Draw records and the wire types of the draw notice endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Number of red balls in one draw
pub const RED_COUNT: usize = 6;

/// Valid red ball numbers
pub const RED_RANGE: std::ops::RangeInclusive<u8> = 1..=33;

/// Valid blue ball numbers
pub const BLUE_RANGE: std::ops::RangeInclusive<u8> = 1..=16;

/// Date format used for display and in the spreadsheet (e.g. 2024年10月29日)
pub const DISPLAY_DATE_FORMAT: &str = "%Y年%m月%d日";

/// Date format delivered by the endpoint
pub const SOURCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Draw identifier (format: YYYYNNN)
///
/// Compared as a string. The source always delivers fixed-width codes, so
/// lexicographic order is numeric order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawCode(String);

impl DrawCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DrawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrawCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// One validated draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub code: DrawCode,
    pub draw_date: NaiveDate,
    /// Red balls in the order the source lists them
    pub red: [u8; RED_COUNT],
    pub blue: u8,
}

impl DrawRecord {
    /// Draw date in display format
    pub fn date_display(&self) -> String {
        self.draw_date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// Red balls as zero-padded text (e.g. "02 14 15 17 25 30")
    pub fn red_display(&self) -> String {
        self.red
            .iter()
            .map(|n| format_ball(*n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Format a ball number the way the source writes it
pub fn format_ball(n: u8) -> String {
    format!("{:02}", n)
}

/// One entry of the endpoint's `result` list
#[derive(Debug, Clone, Deserialize)]
pub struct RawDraw {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    /// Comma-joined red balls, e.g. "02,14,15,17,25,30"
    pub red: String,
    #[serde(deserialize_with = "string_or_number")]
    pub blue: String,
    /// Draw date, possibly with a trailing weekday, e.g. "2024-10-29(二)"
    pub date: String,
}

/// Response body of the draw notice endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DrawPage {
    /// 0 on success
    pub state: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Vec<RawDraw>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Text(s) => s,
        Field::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_code_ordering() {
        let a = DrawCode::from("2024124");
        let b = DrawCode::from("2024123");
        assert!(a > b);
        assert!(DrawCode::from("2025001") > a);
    }

    #[test]
    fn test_draw_code_trims() {
        assert_eq!(DrawCode::new(" 2024001 ").as_str(), "2024001");
    }

    #[test]
    fn test_record_display() {
        let record = DrawRecord {
            code: DrawCode::from("2024124"),
            draw_date: NaiveDate::from_ymd_opt(2024, 10, 29).unwrap(),
            red: [2, 14, 15, 17, 25, 30],
            blue: 11,
        };
        assert_eq!(record.date_display(), "2024年10月29日");
        assert_eq!(record.red_display(), "02 14 15 17 25 30");
        assert_eq!(format_ball(record.blue), "11");
    }

    #[test]
    fn test_deserialize_page() {
        let body = r#"{
            "state": 0,
            "message": "查询成功",
            "result": [
                {"name": "双色球", "code": "2024124", "date": "2024-10-29(二)",
                 "red": "02,14,15,17,25,30", "blue": "11", "sales": "1"},
                {"code": 2024123, "date": "2024-10-27(日)",
                 "red": "01,05,09,12,20,33", "blue": 7}
            ]
        }"#;
        let page: DrawPage = serde_json::from_str(body).unwrap();

        assert_eq!(page.state, 0);
        assert_eq!(page.result.len(), 2);
        assert_eq!(page.result[0].code, "2024124");
        assert_eq!(page.result[1].code, "2024123");
        assert_eq!(page.result[1].blue, "7");
    }

    #[test]
    fn test_deserialize_page_without_result() {
        let page: DrawPage = serde_json::from_str(r#"{"state": 1, "message": "busy"}"#).unwrap();
        assert_eq!(page.state, 1);
        assert!(page.result.is_empty());
    }
}
