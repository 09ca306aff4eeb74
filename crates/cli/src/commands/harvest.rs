//! Harvest command handler.
//!
//! Downloads the SAP glossary page by page into a JSON file.

use clap::Args;
use lexlink_core::{config::AppConfig, AppResult};
use lexlink_knowledge::{harvest, HarvestOptions, SapGlossaryClient};
use std::path::PathBuf;

/// Download the SAP glossary
#[derive(Args, Debug)]
pub struct HarvestCommand {
    /// Number of pages to fetch
    #[arg(long)]
    pub pages: Option<u32>,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Output file (overwritten)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Glossary service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Glossary language
    #[arg(long)]
    pub language: Option<String>,
}

impl HarvestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing harvest command");
        tracing::debug!("Harvest options: {:?}", self);

        let mut settings = config.harvest.clone();
        if let Some(pages) = self.pages {
            settings.pages = pages;
        }
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size;
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(language) = &self.language {
            settings.language = language.clone();
        }

        let client = SapGlossaryClient::from_settings(&settings);
        let options = HarvestOptions::from(&settings);
        let stats = harvest(&client, &options).await?;

        println!(
            "Harvested {} records from {} pages into {} ({:.2}s)",
            stats.records,
            stats.pages,
            options.output.display(),
            stats.duration_secs
        );

        Ok(())
    }
}
