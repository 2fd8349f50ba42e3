use anyhow::Result;
use orgfolio::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);
    cli.execute()
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "orgfolio=warn",
        1 => "orgfolio=info",
        _ => "orgfolio=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
