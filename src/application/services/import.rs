use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::services::DedupeStore;
use crate::domain::wallpapers::{DATE_FORMAT, IngestOutcome, Market, NewWallpaper};

const ARCHIVE_SUFFIX: &str = "_all.json";

/// Archive export envelope: `{code, msg, total, data: [...]}`.
#[derive(Debug, Deserialize)]
struct ArchiveFile {
    #[serde(default)]
    data: Vec<ArchiveEntry>,
}

#[derive(Debug, Deserialize)]
struct ArchiveEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    datetime: String,
    #[serde(default)]
    copyright: String,
    #[serde(default)]
    copyrightlink: String,
    #[serde(default)]
    hsh: String,
    #[serde(default)]
    created_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketImport {
    pub market: String,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub markets: Vec<MarketImport>,
    pub failed_files: Vec<String>,
}

impl ImportReport {
    pub fn inserted(&self) -> usize {
        self.markets.iter().map(|m| m.inserted).sum()
    }
}

/// Import every `<market>_all.json` archive file in `dir`.
///
/// Records go through the dedupe store, so keys already present are skipped
/// and ids are reassigned in import order. Unreadable files and invalid
/// records are logged and skipped.
pub async fn import_directory(store: &DedupeStore, dir: &Path) -> anyhow::Result<ImportReport> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read data directory {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            let market = Market::parse(name.strip_suffix(ARCHIVE_SUFFIX)?)?;
            Some((market, path))
        })
        .collect();
    files.sort_by(|a, b| a.1.cmp(&b.1));

    let mut report = ImportReport::default();

    for (market, path) in files {
        info!(%market, file = %path.display(), "importing archive file");
        match import_file(store, &market, &path).await {
            Ok(summary) => {
                info!(
                    %market,
                    inserted = summary.inserted,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "imported archive file"
                );
                report.markets.push(summary);
            }
            Err(err) => {
                warn!(%market, file = %path.display(), error = %err, "failed to import archive file");
                report.failed_files.push(path.display().to_string());
            }
        }
    }

    Ok(report)
}

async fn import_file(
    store: &DedupeStore,
    market: &Market,
    path: &Path,
) -> anyhow::Result<MarketImport> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let archive: ArchiveFile = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut summary = MarketImport {
        market: market.to_string(),
        ..MarketImport::default()
    };

    for entry in archive.data {
        let title = entry.title.clone();
        let candidate = match into_candidate(entry, market) {
            Ok(candidate) => candidate,
            Err(reason) => {
                warn!(%market, title = %title, %reason, "skipping invalid archive record");
                summary.failed += 1;
                continue;
            }
        };

        match store.save(candidate).await {
            Ok(IngestOutcome::Inserted(_)) => summary.inserted += 1,
            Ok(IngestOutcome::Skipped { .. }) => summary.skipped += 1,
            Err(err) => {
                warn!(%market, title = %title, error = %err, "failed to save archive record");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn into_candidate(entry: ArchiveEntry, market: &Market) -> Result<NewWallpaper, String> {
    let date = parse_archive_date(&entry.datetime)
        .ok_or_else(|| format!("invalid datetime {:?}", entry.datetime))?;
    let created_at = entry
        .created_time
        .as_deref()
        .and_then(parse_archive_date)
        .unwrap_or(date);

    let candidate = NewWallpaper {
        title: entry.title,
        image_url: entry.url,
        date,
        copyright: entry.copyright,
        copyright_link: entry.copyrightlink,
        image_hash: entry.hsh,
        created_at,
        market: market.clone(),
    };
    candidate.validate()?;
    Ok(candidate)
}

/// Accepts `2024-02-19`, `20240219`, or a timestamp starting with a date.
fn parse_archive_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .ok()
        .or_else(|| {
            value
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
        })
}
