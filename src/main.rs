mod cli;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let log_level = std::env::var("KIRA_LOG").unwrap_or_else(|_| "warn".to_string());
    let mut filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli::run::stats_enabled() {
        filter = filter.add_directive("kira_stats=info".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::run::entry()
}
