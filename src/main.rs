use anyhow::{Context, Result};
use enchanting_items::{fetch::Fetcher, pipeline, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configure ───────────────────────────────────────────────
    let config = Config::default();
    info!(
        base = %config.base_url,
        output = %config.output_path.display(),
        branches = config.branches.len(),
        "configured"
    );
    let fetcher = Fetcher::new(&config).context("building HTTP client")?;

    // ─── 3) scrape, filter, merge ───────────────────────────────────
    let summary = pipeline::run(&config, &fetcher)
        .with_context(|| format!("regenerating {}", config.output_path.display()))?;
    info!("wrote {}", summary.output.display());
    Ok(())
}
