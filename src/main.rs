use std::process::ExitCode;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

fn main() -> ExitCode {
    let cfg = match config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[ERROR] Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = match runtime_builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("[ERROR] Failed to build Tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(async_main(cfg)) {
        Ok(()) => {
            logger::log_server_stopped();
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn async_main(cfg: config::Config) -> Result<(), server::StartupError> {
    logger::init(&cfg)?;

    let addr = cfg
        .get_socket_addr()
        .map_err(server::StartupError::InvalidAddr)?;

    // Bind before anything else so a busy port fails fast and clearly
    let listener = server::create_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));

    logger::log_server_start(&addr, &cfg);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::run(listener, state, active_connections, signals).await;

    Ok(())
}
