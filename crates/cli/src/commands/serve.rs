//! Serve command handler.
//!
//! Starts the HTTP API.

use clap::Args;
use lexlink_core::{config::AppConfig, AppResult};
use lexlink_prompt::{list_prompts, load_prompt};
use lexlink_server::AppState;

/// Run the HTTP API server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let mut config = config.clone();
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        config.validate()?;

        // Broken prompt overrides fail startup
        let prompts_dir = config.rag.prompts_dir.as_deref();
        for id in list_prompts(prompts_dir)? {
            load_prompt(prompts_dir, &id)?;
            tracing::debug!("Prompt ready: {}", id);
        }

        tracing::debug!("Corpus: {:?}", config.rag.corpus_path);
        tracing::debug!("Glossary: {:?}", config.linking.glossary_path);

        let state = AppState::from_config(config)?;
        lexlink_server::serve(state).await
    }
}
