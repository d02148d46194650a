use fileserve::config::Config;
use fileserve::logger;
use fileserve::{FileHandler, FileServer, FilesystemResolver};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging);

    // Worker threads default to the number of CPU cores
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

    let resolver = FilesystemResolver::with_options(&cfg.files.root, cfg.resolve_options());
    let handler = FileHandler::new(resolver)
        .mount(cfg.files.mount.clone())
        .buffer_size(cfg.files.buffer_size)
        .access_log(cfg.logging.access_log);

    let server = FileServer::start(addr, handler, cfg.server_settings())?;
    logger::log_server_start(&server.local_addr(), &cfg);

    tokio::signal::ctrl_c().await?;
    server.stop().await;
    Ok(())
}
