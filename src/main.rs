use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use chatclone::connector::adapter::DEFAULT_TIMEOUT_SECS;
use chatclone::domain::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use chatclone::connector::api::DEFAULT_SESSION_TTL_SECS;
use chatclone::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "chatclone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    base_url: String,

    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature, 0.0 to 1.0
    #[arg(long, global = true, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Evict web sessions idle for this many seconds
    #[arg(long, global = true, default_value_t = DEFAULT_SESSION_TTL_SECS)]
    session_ttl_secs: u64,

    /// Answer with an offline mock model instead of calling the API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        base_url: cli.base_url,
        model: cli.model,
        temperature: cli.temperature,
        timeout_secs: cli.timeout_secs,
        session_ttl_secs: cli.session_ttl_secs,
        mock: cli.mock,
    })?;
    debug!("Client config: {:?}", container.client_config());

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
