//! CLI runner - executes discovery or sync

use crate::auth::Authenticator;
use crate::catalog::Catalog;
use crate::cli::commands::Cli;
use crate::config::TapConfig;
use crate::engine::{SyncEngine, SyncStats};
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::{MessageSink, SingerWriter};
use crate::schema::SchemaRegistry;
use crate::streams::StreamDescriptor;
use std::io::Write;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run in the mode the flags select, writing to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_to(stdout.lock()).await
    }

    /// Run in the mode the flags select, writing to `out`
    ///
    /// Config, schemas and catalog are all loaded and checked before the
    /// first network request.
    pub async fn run_to<W: Write>(&self, mut out: W) -> Result<()> {
        let config = self.load_config()?;
        let registry = SchemaRegistry::builtin()?;

        if self.cli.discover {
            let catalog = Catalog::discover(&registry, &StreamDescriptor::all(&config))?;
            writeln!(out, "{}", catalog.to_json()?)?;
            out.flush()?;
            return Ok(());
        }

        let stats = self.sync(&config, &registry, out).await?;
        info!(
            streams = stats.streams_synced,
            pages = stats.pages_fetched,
            records = stats.records_synced,
            duration_ms = stats.duration_ms,
            "Sync complete"
        );
        Ok(())
    }

    /// Load and validate the config file
    fn load_config(&self) -> Result<TapConfig> {
        let config = TapConfig::from_file(&self.cli.config)?;
        debug!(
            api_url = %config.api_url,
            start_date = %config.start_date,
            page_size = config.page_size,
            "Loaded config"
        );
        Ok(config)
    }

    /// Catalog from `--catalog`, or every stream when none is given
    fn load_catalog(&self, config: &TapConfig, registry: &SchemaRegistry) -> Result<Catalog> {
        match &self.cli.catalog {
            Some(path) => Catalog::from_file(path),
            None => Catalog::discover(registry, &StreamDescriptor::all(config)),
        }
    }

    /// Build the authenticated API client
    fn build_client(config: &TapConfig) -> Result<HttpClient> {
        let token_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let authenticator = Authenticator::with_client(
            &config.token_url,
            config.credentials.clone(),
            token_client,
        );

        let mut builder = HttpClientConfig::builder()
            .base_url(&config.api_url)
            .timeout(config.request_timeout());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent);
        }

        HttpClient::with_auth(builder.build(), authenticator)
    }

    /// Sync the selected streams one after another
    async fn sync<W: Write>(
        &self,
        config: &TapConfig,
        registry: &SchemaRegistry,
        out: W,
    ) -> Result<SyncStats> {
        if self.cli.state.is_some() {
            warn!("State file given; bookmarks are not tracked and every stream is synced in full");
        }

        let catalog = self.load_catalog(config, registry)?;
        let plan = catalog
            .selected_streams()
            .map(|entry| {
                let descriptor = StreamDescriptor::find(config, &entry.tap_stream_id)?;
                let schema = registry.get(&descriptor.name)?;
                Ok((descriptor, schema))
            })
            .collect::<Result<Vec<_>>>()?;

        if plan.is_empty() {
            warn!("No streams selected");
        }

        let mut engine = SyncEngine::new(Self::build_client(config)?);
        let mut writer = SingerWriter::new(out);

        for (descriptor, schema) in &plan {
            let paginator = descriptor.paginator(config.max_pages);
            engine
                .sync_stream(descriptor, schema, paginator.as_ref(), &mut writer)
                .await?;
            writer.flush()?;
        }

        Ok(engine.stats().clone())
    }
}
