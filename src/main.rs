use clap::Parser;
use dxterm_core::config::{Config, SearchMode};
use dxterm_core::types::Patient;
use std::io::Write;

#[derive(Parser)]
#[command(name = "dxterm", about = "Diagnosis terminology lookup and consultation entry")]
struct Cli {
    /// Write debug logs to /tmp/dxterm-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Search through the terminology backend instead of the local CSV.
    #[arg(long)]
    remote: bool,

    /// CSV dataset: a file path or an http:// URL.
    #[arg(long, value_name = "PATH|URL")]
    dataset: Option<String>,

    /// Backend base URL, e.g. http://127.0.0.1:5000/api.
    #[arg(long, value_name = "URL")]
    api: Option<String>,

    #[arg(long, default_value = "")]
    patient_name: String,

    /// ABHA number, submitted as the consultation's patient identifier.
    #[arg(long, default_value = "")]
    abha: String,

    /// Run one lookup, print each match as a JSON line, and exit.
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if self.remote {
            config.search.mode = SearchMode::Remote;
        }
        if let Some(location) = &self.dataset {
            config.dataset.location = location.clone();
        }
        if let Some(base_url) = &self.api {
            config.api.base_url = base_url.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/dxterm-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("dxterm debug log started, tail -f /tmp/dxterm-debug.log");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config: falling back to defaults");
        Config::defaults()
    });
    cli.apply_to(&mut config);

    if let Some(query) = &cli.query {
        let runtime = tokio::runtime::Runtime::new()?;
        let selections = runtime.block_on(dxterm::headless::lookup(&config, query))?;
        let mut out = std::io::stdout().lock();
        dxterm::headless::write_json_lines(&mut out, &selections)?;
        out.flush()?;
        return Ok(());
    }

    dxterm_tui::run(dxterm_tui::RunOptions {
        config,
        patient: Patient { name: cli.patient_name, abha_number: cli.abha },
    })
}
