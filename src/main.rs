//! quill: a minimal personal wiki
//!
//! Pages are plain-text files named `<title>.txt`; the three page routes
//! view, edit and save them. Anything else is served from the static
//! content root. TLS is on by default and a `--gencert` run generates the
//! self-signed certificate pair, then exits.

use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

mod config;
mod handler;
mod http;
mod logger;
mod render;
mod routing;
mod server;
mod store;
mod tls;

use config::AppState;
use store::PageStore;

/// Process run mode, scanned from the command line
enum RunMode {
    /// Serve the wiki
    Serve,
    /// Generate `cert.pem`/`key.pem`, then exit without serving
    GenerateCert,
}

fn parse_args() -> Result<RunMode, String> {
    let mut mode = RunMode::Serve;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--gencert" => mode = RunMode::GenerateCert,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(mode)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mode = parse_args()?;
    let cfg = config::Config::load()?;

    if matches!(mode, RunMode::GenerateCert) {
        tls::generate_cert(
            Path::new(&cfg.tls.cert_file),
            Path::new(&cfg.tls.key_file),
            &cfg.tls.hostname,
            &cfg.tls.organization,
        )?;
        println!(
            "Certificate/key generated: {} / {}",
            cfg.tls.cert_file, cfg.tls.key_file
        );
        return Ok(());
    }

    // Template files must exist before the first render
    render::write_default_templates(Path::new(&cfg.wiki.template_dir))?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let templates = render::Templates::load(Path::new(&cfg.wiki.template_dir))?;
    let store = PageStore::new(&cfg.wiki.pages_dir);

    // A missing or unreadable cert/key pair is fatal, like a failing bind
    let tls_acceptor = if cfg.tls.enabled {
        let server_config =
            tls::load_server_config(Path::new(&cfg.tls.cert_file), Path::new(&cfg.tls.key_file))?;
        Some(TlsAcceptor::from(Arc::new(server_config)))
    } else {
        None
    };

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg, templates, store));
    server::run(listener, state, tls_acceptor).await
}
