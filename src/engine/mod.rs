//! Execution engine module
//!
//! The stream driver: one generic state machine that syncs any
//! `StreamDescriptor`.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drives a stream through its phases
//! - `Phase` - `Start -> Auth -> FetchPage -> Extract -> Emit -> (FetchPage | Done)`
//! - Message types for output (Schema, Record)
//!
//! Every failure is fatal: the driver moves to `Phase::Error`, logs the phase
//! it failed in, records the outcome and returns the error. Pages are fetched
//! strictly one at a time.

mod types;

pub use types::{Message, Phase, StreamOutcome, SyncConfig, SyncStats};

use crate::error::{Error, Result};
use crate::extract::extract;
use crate::http::{HttpClient, JsonResponse, RequestConfig};
use crate::output::MessageSink;
use crate::pagination::{PaginationState, Paginator};
use crate::schema::{validate_fields, JsonSchema};
use crate::streams::StreamDescriptor;
use crate::types::JsonObject;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::time::Instant;
use tracing::{debug, error, info};

/// Sort direction requested from ordered endpoints
pub const SORT_ASC: &str = "asc";

/// Working data carried between phases of one stream
#[derive(Default)]
struct StreamRun {
    pagination: PaginationState,
    response: Option<JsonResponse>,
    fetched_at: Option<DateTime<Utc>>,
    records: Vec<JsonObject>,
    headers: HeaderMap,
    pages: usize,
    emitted: usize,
}

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
    /// Outcome of the most recent `sync_stream` call, failed or not
    last_outcome: Option<StreamOutcome>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
            last_outcome: None,
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Outcome of the most recent stream
    ///
    /// After a failed sync its phase is `Phase::Error`.
    pub fn last_outcome(&self) -> Option<&StreamOutcome> {
        self.last_outcome.as_ref()
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = SyncStats::default();
    }

    /// Sync one stream from `Start` to `Done`
    pub async fn sync_stream(
        &mut self,
        descriptor: &StreamDescriptor,
        schema: &JsonSchema,
        paginator: &dyn Paginator,
        sink: &mut dyn MessageSink,
    ) -> Result<StreamOutcome> {
        let start = Instant::now();
        let mut phase = Phase::Start;
        let mut run = StreamRun::default();

        info!(stream = %descriptor.name, "Starting sync");

        while !phase.is_terminal() {
            match self
                .step(phase, &mut run, descriptor, schema, paginator, sink)
                .await
            {
                Ok(next) => {
                    debug!(stream = %descriptor.name, from = %phase, to = %next, "Phase transition");
                    phase = next;
                }
                Err(e) => {
                    let failed_in = phase;
                    phase = Phase::Error;
                    error!(
                        stream = %descriptor.name,
                        failed_in = %failed_in,
                        phase = %phase,
                        pages = run.pages,
                        records = run.emitted,
                        error = %e,
                        "Stream sync failed"
                    );
                    self.finish(&descriptor.name, phase, &run, start);
                    return Err(e);
                }
            }
        }

        self.stats.add_stream();
        let outcome = self.finish(&descriptor.name, phase, &run, start);

        info!(
            stream = %descriptor.name,
            pages = run.pages,
            records = run.emitted,
            "Completed sync"
        );

        Ok(outcome)
    }

    /// Record the terminal outcome and the time spent on the stream
    fn finish(
        &mut self,
        stream: &str,
        phase: Phase,
        run: &StreamRun,
        start: Instant,
    ) -> StreamOutcome {
        #[allow(clippy::cast_possible_truncation)]
        self.stats.add_duration(start.elapsed().as_millis() as u64);
        let outcome = StreamOutcome {
            stream: stream.to_string(),
            phase,
            pages: run.pages,
            records: run.emitted,
        };
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Run one phase and return the next
    async fn step(
        &mut self,
        phase: Phase,
        run: &mut StreamRun,
        descriptor: &StreamDescriptor,
        schema: &JsonSchema,
        paginator: &dyn Paginator,
        sink: &mut dyn MessageSink,
    ) -> Result<Phase> {
        match phase {
            Phase::Start => {
                sink.emit(Message::schema(
                    &descriptor.name,
                    schema.to_json(),
                    descriptor.primary_keys.clone(),
                    descriptor.replication_key.iter().cloned().collect(),
                ))?;
                Ok(Phase::Auth)
            }
            Phase::Auth => {
                self.client.authenticate().await?;
                Ok(Phase::FetchPage)
            }
            Phase::FetchPage => {
                let request = Self::page_request(descriptor, paginator, &run.pagination);
                let response = self.client.get_json(&descriptor.path, request).await?;
                run.fetched_at = Some(Utc::now());
                run.response = Some(response);
                run.pages += 1;
                self.stats.add_page();
                Ok(Phase::Extract)
            }
            Phase::Extract => {
                let response = run
                    .response
                    .take()
                    .ok_or_else(|| Error::Other("No page to extract from".to_string()))?;
                let rows = extract(&response.body, descriptor.response_key.as_deref())?;
                debug!(stream = %descriptor.name, page = run.pages, rows = rows.len(), "Extracted rows");
                run.records = descriptor.transform.apply(&response.body, rows)?;
                run.headers = response.headers;
                Ok(Phase::Emit)
            }
            Phase::Emit => {
                let time_extracted = if self.config.time_extracted {
                    run.fetched_at
                } else {
                    None
                };
                let count = run.records.len();
                for record in run.records.drain(..) {
                    if self.config.validate_records {
                        validate_fields(schema, &record)
                            .map_err(|message| Error::schema_validation(&descriptor.name, message))?;
                    }
                    sink.emit(Message::record(&descriptor.name, record, time_extracted))?;
                    run.emitted += 1;
                }
                self.stats.add_records(count);

                let next = paginator.process_response(&run.headers, &mut run.pagination)?;
                if next.is_done() {
                    Ok(Phase::Done)
                } else {
                    Ok(Phase::FetchPage)
                }
            }
            Phase::Done | Phase::Error => Ok(phase),
        }
    }

    /// Query for the next page request
    ///
    /// Static stream parameters, then ordering when the stream is paginated and
    /// has a replication key, then the page token.
    fn page_request(
        descriptor: &StreamDescriptor,
        paginator: &dyn Paginator,
        state: &PaginationState,
    ) -> RequestConfig {
        let mut request = RequestConfig::new();
        for (key, value) in &descriptor.query {
            request = request.query(key, value);
        }

        if paginator.paginates() {
            if let Some(key) = &descriptor.replication_key {
                request = request.query("sort", SORT_ASC).query("order_by", key);
            }
        }

        for (key, value) in paginator.initial_params(state) {
            request = request.query(key, value);
        }
        request
    }
}
