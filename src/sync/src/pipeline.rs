//! Incremental fetch-and-merge run.
//!
//! Load the local workbook, page through the source until a known draw code
//! is reached, merge the new draws in and rewrite the workbook.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::scraper::parsers::DrawParser;
use crate::scraper::DrawSource;
use crate::storage::{latest_code, merge_draws, DrawRepository};
use crate::types::{DrawCode, DrawRecord, RawDraw};

/// Draws accepted from one page
#[derive(Debug, Default)]
pub struct ScannedPage {
    pub records: Vec<DrawRecord>,
    /// Entries dropped as malformed
    pub rejected: usize,
}

/// Outcome of scanning one page against the local watermark
#[derive(Debug)]
pub enum PageScan {
    /// Every entry was newer than the watermark, keep paging
    Continue(ScannedPage),
    /// A known draw was reached, stop paging
    Stop(ScannedPage),
}

/// Normalize a page of entries (newest first) until an entry's code is at or
/// below `latest`
///
/// Malformed entries are dropped with a warning; any other error fails the scan.
pub fn scan_page(entries: Vec<RawDraw>, latest: Option<&DrawCode>) -> Result<PageScan> {
    let mut page = ScannedPage::default();

    for entry in entries {
        let code = DrawCode::new(entry.code.as_str());
        if latest.is_some_and(|latest| &code <= latest) {
            debug!("Reached known draw {}", code);
            return Ok(PageScan::Stop(page));
        }

        match DrawParser::parse(&entry) {
            Ok(record) => page.records.push(record),
            Err(e) if e.is_recoverable() => {
                warn!("Dropping entry: {}", e);
                page.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(PageScan::Continue(page))
}

/// Draws fetched in one run
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Newest first, as delivered
    pub records: Vec<DrawRecord>,
    pub rejected: usize,
    pub pages: u32,
}

/// Page through `source` until a known draw or an empty page
pub async fn fetch_new_draws<S>(source: &S, latest: Option<&DrawCode>) -> Result<FetchOutcome>
where
    S: DrawSource + ?Sized,
{
    let mut outcome = FetchOutcome::default();
    let mut page_no = 1;

    loop {
        let entries = source.fetch_page(page_no).await?;
        outcome.pages = page_no;
        if entries.is_empty() {
            debug!("Page {} is empty, no more data", page_no);
            break;
        }

        let (page, stop) = match scan_page(entries, latest)? {
            PageScan::Continue(page) => (page, false),
            PageScan::Stop(page) => (page, true),
        };
        info!("Page {}: {} new draws", page_no, page.records.len());
        outcome.records.extend(page.records);
        outcome.rejected += page.rejected;

        if stop {
            break;
        }
        page_no += 1;
    }

    Ok(outcome)
}

/// Result of a completed run
#[derive(Debug)]
pub struct SyncReport {
    pub path: PathBuf,
    /// Newly added draws, newest first
    pub added: Vec<DrawRecord>,
    /// Latest code before the run
    pub previous_latest: Option<DrawCode>,
    /// Rows in the workbook after the run
    pub total: usize,
    /// The workbook did not exist before the run
    pub created: bool,
    pub rejected: usize,
}

impl SyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.added.is_empty()
    }

    /// Newest added code
    pub fn newest(&self) -> Option<&DrawCode> {
        latest_code(&self.added)
    }
}

/// Run one sync against `source`
///
/// Nothing is written when no new draws were fetched.
pub async fn run<S>(source: &S, config: &AppConfig) -> Result<SyncReport>
where
    S: DrawSource + ?Sized,
{
    let repo = DrawRepository::new(config.output.resolve_path()?, config.output.sheet_name.as_str());
    run_with_repository(source, &repo).await
}

pub async fn run_with_repository<S>(source: &S, repo: &DrawRepository) -> Result<SyncReport>
where
    S: DrawSource + ?Sized,
{
    let created = !repo.exists();
    let existing = repo.load()?;
    let previous_latest = latest_code(&existing).cloned();
    match previous_latest {
        Some(ref code) => info!("Local workbook has {} draws, latest {}", existing.len(), code),
        None => info!("No local draws at {}", repo.path().display()),
    }

    let fetched = fetch_new_draws(source, previous_latest.as_ref()).await?;
    debug!("Fetched {} pages", fetched.pages);
    if fetched.rejected > 0 {
        warn!("{} malformed entries dropped", fetched.rejected);
    }

    let mut report = SyncReport {
        path: repo.path().to_path_buf(),
        added: Vec::new(),
        previous_latest,
        total: existing.len(),
        created: false,
        rejected: fetched.rejected,
    };

    if fetched.records.is_empty() {
        info!("Nothing to update");
        return Ok(report);
    }

    let merged = merge_draws(fetched.records.clone(), existing);
    repo.save(&merged)?;
    info!("Saved {} draws to {}", merged.len(), repo.path().display());

    report.added = fetched.records;
    report.total = merged.len();
    report.created = created;
    Ok(report)
}
