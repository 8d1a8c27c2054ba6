//! Query pipeline — debounced suggestion lookup behind the autocomplete widget.
//!
//! ```text
//! input() ──► Debouncer ──(quiet period)──► Fire ──► SuggestionSource::suggest
//!                                                          │
//!          QueryState ◄──────────── Done{seq} ◄────────────┘
//! ```
//!
//! The pipeline is owned by a single task (the UI loop or a test). Timer and
//! lookup tasks never touch [`QueryState`] directly: they post events on the
//! pipeline's channel and the owner applies them in [`QueryPipeline::next_update`]
//! or [`QueryPipeline::drain`].
//!
//! Every keystroke bumps a sequence number. A fired timer only dispatches if
//! its number is still the latest, and a lookup result is only applied if it
//! answers the request currently in flight; anything else is discarded.

use crate::config::Config;
use crate::dataset::DatasetStore;
use crate::debounce::Debouncer;
use crate::error::{DatasetError, SourceError};
use crate::search::{self, MatchOptions};
use crate::types::{Selection, Suggestion};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can answer a diagnosis query.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SourceError>;

    /// Prepare for the first query. Called once when the widget mounts.
    async fn warm(&self) {}
}

/// Local variant: filters the CSV dataset held by a [`DatasetStore`].
#[derive(Debug)]
pub struct CsvSource {
    store: Arc<DatasetStore>,
    opts: MatchOptions,
}

impl CsvSource {
    pub fn new(store: Arc<DatasetStore>, opts: MatchOptions) -> Self {
        Self { store, opts }
    }
}

#[async_trait]
impl SuggestionSource for CsvSource {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SourceError> {
        let dataset = self.store.load().await.map_err(|e| match e {
            DatasetError::Unavailable(reason) => SourceError::DatasetUnavailable(reason),
            other => SourceError::DatasetUnavailable(other.to_string()),
        })?;
        Ok(search::filter_records(dataset.records(), query, &self.opts)
            .into_iter()
            .map(Suggestion::Record)
            .collect())
    }

    async fn warm(&self) {
        // Failure is cached in the store and surfaced on the first query.
        let _ = self.store.load().await;
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where the pipeline is in its lookup cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// Nothing to show: query too short, or a selection was just made.
    #[default]
    Idle,
    /// Quiet period running.
    Waiting,
    /// A lookup is in flight.
    Searching,
    /// Suggestions reflect the last completed lookup (possibly zero matches).
    Ready,
    /// The lookup failed; distinct from "no matches".
    Unavailable(String),
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Idle => write!(f, "idle"),
            SearchStatus::Waiting => write!(f, "typing…"),
            SearchStatus::Searching => write!(f, "searching…"),
            SearchStatus::Ready => write!(f, "ready"),
            SearchStatus::Unavailable(reason) => write!(f, "unavailable: {reason}"),
        }
    }
}

/// Observable state of the autocomplete widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub text: String,
    pub suggestions: Vec<Suggestion>,
    /// Whether the suggestion popup is open.
    pub active: bool,
    pub status: SearchStatus,
}

/// What the input shows after the user commits a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSelect {
    /// Replace the query with the selected display name.
    ShowName,
    /// Empty the query.
    ClearQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub quiet: Duration,
    pub min_query_chars: usize,
    /// Clear suggestions on the keystroke itself when the query is too short,
    /// instead of waiting for the quiet period.
    pub clear_short_immediately: bool,
    pub after_select: AfterSelect,
}

impl PipelineOptions {
    /// CSV-backed widget: 300 ms by default, name stays in the input.
    pub fn local(config: &Config) -> Self {
        Self {
            quiet: config.search.local_debounce(),
            min_query_chars: config.search.min_query_chars,
            clear_short_immediately: false,
            after_select: AfterSelect::ShowName,
        }
    }

    /// Server-backed widget: 500 ms by default, short queries never reach the
    /// backend, input is emptied after a selection.
    pub fn remote(config: &Config) -> Self {
        Self {
            quiet: config.search.remote_debounce(),
            min_query_chars: config.search.min_query_chars,
            clear_short_immediately: true,
            after_select: AfterSelect::ClearQuery,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

enum Event {
    Fire(u64),
    Done {
        seq: u64,
        outcome: Result<Vec<Suggestion>, SourceError>,
    },
}

/// What handling one pipeline event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineUpdate {
    /// The quiet period ended on a short query; suggestions were cleared.
    Cleared,
    /// A lookup was started for `query`.
    Dispatched { seq: u64, query: String },
    /// Lookup results replaced the suggestions.
    Applied { seq: u64, count: usize },
    /// The lookup failed; suggestions were cleared.
    Failed { seq: u64, reason: String },
    /// A result arrived for a request that is no longer the latest.
    Stale { seq: u64 },
    /// A timer fired after newer input had already rescheduled it.
    Superseded { seq: u64 },
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

type SelectCallback = Box<dyn FnMut(&Selection) + Send>;

pub struct QueryPipeline {
    source: Arc<dyn SuggestionSource>,
    opts: PipelineOptions,
    state: QueryState,
    debouncer: Debouncer<Event>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    /// Bumped on every keystroke; tags timers and requests.
    seq: u64,
    awaiting_fire: Option<u64>,
    in_flight: Option<u64>,
    on_select: Option<SelectCallback>,
}

impl QueryPipeline {
    pub fn new(source: Arc<dyn SuggestionSource>, opts: PipelineOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            opts,
            state: QueryState::default(),
            debouncer: Debouncer::new(opts.quiet, tx.clone()),
            tx,
            rx,
            seq: 0,
            awaiting_fire: None,
            in_flight: None,
            on_select: None,
        }
    }

    /// Register the callback invoked with every committed [`Selection`].
    pub fn with_on_select(mut self, f: impl FnMut(&Selection) + Send + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Start warming the source in the background (loads the CSV dataset for
    /// the local variant). Must be called from within a tokio runtime.
    pub fn mount(&self) -> tokio::task::JoinHandle<()> {
        let source = Arc::clone(&self.source);
        tokio::spawn(async move { source.warm().await })
    }

    /// Record a keystroke. Must be called from within a tokio runtime.
    pub fn input(&mut self, text: impl Into<String>) {
        self.seq += 1;
        self.state.text = text.into();

        if self.opts.clear_short_immediately
            && !search::is_searchable(&self.state.text, self.opts.min_query_chars)
        {
            self.debouncer.cancel();
            self.awaiting_fire = None;
            self.in_flight = None;
            self.clear_suggestions();
            self.state.status = SearchStatus::Idle;
            tracing::debug!(query = %self.state.text, "pipeline: short query cleared");
            return;
        }

        self.awaiting_fire = Some(self.seq);
        self.state.status = SearchStatus::Waiting;
        self.debouncer.schedule(Event::Fire(self.seq));
        tracing::debug!(query = %self.state.text, seq = self.seq, "pipeline: input scheduled");
    }

    /// The input gained focus: reopen the popup over existing suggestions.
    pub fn focus(&mut self) {
        self.state.active = true;
    }

    /// The input lost focus: hide the popup.
    pub fn blur(&mut self) {
        self.state.active = false;
    }

    pub fn popup_visible(&self) -> bool {
        self.state.active && !self.state.suggestions.is_empty()
    }

    /// Commit the suggestion at `index`.
    ///
    /// Invokes the selection callback, cancels any pending recomputation and
    /// closes the popup. Returns `None` when `index` is out of range.
    pub fn select(&mut self, index: usize) -> Option<Selection> {
        let selection = self.state.suggestions.get(index)?.to_selection();
        tracing::debug!(name = %selection.name, codes = selection.codes.len(), "pipeline: selected");

        if let Some(callback) = self.on_select.as_mut() {
            callback(&selection);
        }

        self.invalidate();
        self.clear_suggestions();
        self.state.status = SearchStatus::Idle;
        self.state.text = match self.opts.after_select {
            AfterSelect::ShowName => selection.name.clone(),
            AfterSelect::ClearQuery => String::new(),
        };
        Some(selection)
    }

    /// Drop the query, suggestions and any pending work.
    pub fn reset(&mut self) {
        self.invalidate();
        self.clear_suggestions();
        self.state.text.clear();
        self.state.status = SearchStatus::Idle;
    }

    /// True while a quiet period is running or a lookup is in flight.
    pub fn is_busy(&self) -> bool {
        self.awaiting_fire.is_some() || self.in_flight.is_some()
    }

    /// Wait for the next event and apply it.
    pub async fn next_update(&mut self) -> Option<PipelineUpdate> {
        let event = self.rx.recv().await?;
        Some(self.handle(event))
    }

    /// Apply every event that is already queued, without waiting.
    pub fn drain(&mut self) -> Vec<PipelineUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            updates.push(self.handle(event));
        }
        updates
    }

    /// Process events until no timer is pending and no lookup is in flight.
    pub async fn settle(&mut self) -> Vec<PipelineUpdate> {
        let mut updates = Vec::new();
        while self.is_busy() {
            match self.next_update().await {
                Some(update) => updates.push(update),
                None => break,
            }
        }
        updates
    }

    fn handle(&mut self, event: Event) -> PipelineUpdate {
        match event {
            Event::Fire(seq) => self.on_fire(seq),
            Event::Done { seq, outcome } => self.on_done(seq, outcome),
        }
    }

    fn on_fire(&mut self, seq: u64) -> PipelineUpdate {
        if self.awaiting_fire != Some(seq) {
            return PipelineUpdate::Superseded { seq };
        }
        self.awaiting_fire = None;

        let query = self.state.text.clone();
        if !search::is_searchable(&query, self.opts.min_query_chars) {
            self.in_flight = None;
            self.clear_suggestions();
            self.state.status = SearchStatus::Idle;
            return PipelineUpdate::Cleared;
        }

        self.in_flight = Some(seq);
        self.state.status = SearchStatus::Searching;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let q = query.clone();
        tokio::spawn(async move {
            let outcome = source.suggest(&q).await;
            let _ = tx.send(Event::Done { seq, outcome });
        });

        tracing::debug!(query = %query, seq, "pipeline: lookup dispatched");
        PipelineUpdate::Dispatched { seq, query }
    }

    fn on_done(&mut self, seq: u64, outcome: Result<Vec<Suggestion>, SourceError>) -> PipelineUpdate {
        if self.in_flight != Some(seq) {
            tracing::debug!(seq, latest = ?self.in_flight, "pipeline: stale result discarded");
            return PipelineUpdate::Stale { seq };
        }
        self.in_flight = None;

        match outcome {
            Ok(suggestions) => {
                let count = suggestions.len();
                self.state.active = count > 0;
                self.state.suggestions = suggestions;
                self.state.status = if self.awaiting_fire.is_some() {
                    SearchStatus::Waiting
                } else {
                    SearchStatus::Ready
                };
                PipelineUpdate::Applied { seq, count }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "pipeline: search failed");
                let reason = e.to_string();
                self.clear_suggestions();
                self.state.status = SearchStatus::Unavailable(reason.clone());
                PipelineUpdate::Failed { seq, reason }
            }
        }
    }

    fn invalidate(&mut self) {
        self.seq += 1;
        self.debouncer.cancel();
        self.awaiting_fire = None;
        self.in_flight = None;
    }

    fn clear_suggestions(&mut self) {
        self.state.suggestions.clear();
        self.state.active = false;
    }
}

impl std::fmt::Debug for QueryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("opts", &self.opts)
            .field("state", &self.state)
            .field("seq", &self.seq)
            .field("awaiting_fire", &self.awaiting_fire)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
