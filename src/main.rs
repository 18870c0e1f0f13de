use clap::Parser;
use std::sync::Arc;

use hello_site::config::{AppState, Config};
use hello_site::{logger, server};

#[derive(Debug, Parser)]
#[command(name = "hello-site", version, about = "Serve the Hello World page")]
struct Cli {
    /// Configuration file path without extension (e.g. `config` for config.toml)
    #[arg(short, long, env = "HELLO_CONFIG", default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;
    logger::init(&cfg)?;

    // Worker thread count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::bind_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    if !state.templates.is_ready() {
        logger::log_warning(&format!(
            "Template directory '{}' is not readable; views will fail",
            state.templates.dir().display()
        ));
    }

    let signals = Arc::new(server::SignalHandler::default());
    server::start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&addr, &cfg);
    server::serve(listener, state, Arc::clone(&signals.shutdown)).await?;
    Ok(())
}
