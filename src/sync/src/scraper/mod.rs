//! Remote draw source for the China Welfare Lottery draw notice endpoint.
//!
//! Provides the paginated HTTP client, request throttling and JSON parsing.

pub mod client;
pub mod parsers;
pub mod rate_limiter;

use async_trait::async_trait;

use crate::config::SourceConfig;
use crate::error::Result;
use crate::types::RawDraw;

pub use client::HttpDrawSource;
pub use rate_limiter::Throttle;

/// A paginated source of raw draws, newest first
#[async_trait]
pub trait DrawSource {
    /// Fetch one page (1-based). An empty page means there is no more data.
    async fn fetch_page(&self, page_no: u32) -> Result<Vec<RawDraw>>;
}

/// Query parameters for one page of draw notices
pub fn draw_notice_query(source: &SourceConfig, page_no: u32) -> Vec<(&'static str, String)> {
    vec![
        ("name", source.lottery.clone()),
        ("pageNo", page_no.to_string()),
        ("pageSize", source.page_size.to_string()),
        ("systemType", source.system_type.clone()),
    ]
}
