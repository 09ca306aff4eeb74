//! Paginated glossary harvester.
//!
//! Walks pages `1..=pages` of the SAP glossary service strictly in order,
//! accumulates every record and writes the result as pretty JSON once the
//! last page is in. Any failed page aborts the run before anything is
//! written.

use crate::glossary::GlossaryEntry;
use lexlink_core::config::HarvestSettings;
use lexlink_core::{AppError, AppResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;

/// Source of glossary pages.
#[async_trait::async_trait]
pub trait GlossaryPageSource: Send + Sync {
    /// Fetch one page (1-based) of at most `page_size` records.
    async fn fetch_page(&self, page: u32, page_size: u32) -> AppResult<Vec<GlossaryEntry>>;
}

#[derive(Debug, Deserialize)]
struct GlossaryResponse {
    data: GlossaryData,
}

#[derive(Debug, Deserialize)]
struct GlossaryData {
    #[serde(default)]
    matches: Vec<GlossaryEntry>,
}

/// HTTP client for `https://help.sap.com/http.svc/glossary`.
pub struct SapGlossaryClient {
    client: reqwest::Client,
    endpoint: String,
    language: String,
}

impl SapGlossaryClient {
    pub fn new(endpoint: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            language: language.into(),
        }
    }

    pub fn from_settings(settings: &HarvestSettings) -> Self {
        Self::new(&settings.endpoint, &settings.language)
    }
}

#[async_trait::async_trait]
impl GlossaryPageSource for SapGlossaryClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> AppResult<Vec<GlossaryEntry>> {
        let page_size = page_size.to_string();
        let page_param = page.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
                ("page", page_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Glossary page {} request failed: {}", page, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Glossary page {} returned {}",
                page,
                response.status()
            )));
        }

        let body: GlossaryResponse = response.json().await.map_err(|e| {
            AppError::Upstream(format!("Glossary page {} has unexpected shape: {}", page, e))
        })?;

        Ok(body.data.matches)
    }
}

/// Harvest run parameters.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub pages: u32,
    pub page_size: u32,
    pub output: PathBuf,
}

impl From<&HarvestSettings> for HarvestOptions {
    fn from(settings: &HarvestSettings) -> Self {
        Self {
            pages: settings.pages,
            page_size: settings.page_size,
            output: settings.output.clone(),
        }
    }
}

/// Summary of a completed harvest.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestStats {
    pub pages: u32,
    pub records: usize,
    pub duration_secs: f64,
}

/// Fetch every page in order and write the accumulated records.
pub async fn harvest(
    source: &dyn GlossaryPageSource,
    options: &HarvestOptions,
) -> AppResult<HarvestStats> {
    let start = Instant::now();
    let mut entries: Vec<GlossaryEntry> = Vec::new();

    tracing::info!(
        "Harvesting {} glossary pages of {} records into {:?}",
        options.pages,
        options.page_size,
        options.output
    );

    for page in 1..=options.pages {
        let records = source.fetch_page(page, options.page_size).await?;
        tracing::info!(page, records = records.len(), "Fetched glossary page");
        entries.extend(records);
    }

    let json = serde_json::to_string_pretty(&entries)?;

    if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&options.output, json).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Harvest completed: {} pages, {} records in {:.2}s",
        options.pages,
        entries.len(),
        duration.as_secs_f64()
    );

    Ok(HarvestStats {
        pages: options.pages,
        records: entries.len(),
        duration_secs: duration.as_secs_f64(),
    })
}
