//! dxterm TUI: the consultation-entry screen hosting the diagnosis
//! autocomplete.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use dxterm_core::{config::Config, types::Patient, QueryPipeline};

/// What the binary hands over after parsing flags and loading config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: Config,
    pub patient: Patient,
}

/// Build the runtime and the query pipeline for the configured search mode,
/// then run the consultation screen until the user quits.
pub fn run(options: RunOptions) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let _guard = runtime.enter();

    let RunOptions { config, patient } = options;
    let theme = theme::Theme::by_name(&config.ui.theme);
    let (source, opts) = dxterm_remote::build_source(&config);
    tracing::info!(mode = ?config.search.mode, quiet_ms = opts.quiet.as_millis() as u64, "tui: starting");

    let pipeline = QueryPipeline::new(source, opts).with_on_select(|selection| {
        tracing::info!(name = %selection.name, codes = selection.codes.len(), "diagnosis selected");
    });
    // Warm the dataset so the first search does not pay for the load.
    let _warm = pipeline.mount();

    App::new(&config, patient, pipeline, theme).run()
}
