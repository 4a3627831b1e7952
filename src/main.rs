use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;
mod upload;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
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

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let state = Arc::new(config::AppState::new(cfg));

    // One-time setup, before any connection is accepted
    upload::prepare_upload_dir(&state.upload_dir).map_err(|e| {
        format!(
            "Cannot create upload directory '{}': {e}",
            state.upload_dir.display()
        )
    })?;
    logger::log_upload_dir_ready(&state.upload_dir);

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &state.config);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(listener, state, signals).await?;
    Ok(())
}
