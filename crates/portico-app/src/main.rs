mod cli;
mod handlers;
mod headless;
mod session;

use portico_common::HandlerKind;
use portico_config::PorticoConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        eprintln!("\n--- Portico crashed ---");
        eprintln!("Thread: {}", thread.name().unwrap_or("<unnamed>"));
        eprintln!("-----------------------\n");

        default_hook(info);
    }));
}

fn load_config(args: &cli::Args) -> PorticoConfig {
    let loaded = match &args.config {
        Some(path) => portico_config::load_config_from(path),
        None => portico_config::load_config(),
    };
    loaded.unwrap_or_else(|e| {
        // Logging is not up yet.
        eprintln!("portico: config load failed, using defaults: {e}");
        PorticoConfig::default()
    })
}

fn main() {
    install_panic_hook();

    let args = cli::parse();
    let config = load_config(&args);

    // Initialize logging
    let log_directive = args
        .log_level
        .as_deref()
        .map(|level| {
            if level.contains('=') {
                level.to_owned()
            } else {
                format!("portico={level}")
            }
        })
        .unwrap_or_else(|| config.logging.level.directive().to_owned());
    let fallback = config.logging.level.directive();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse::<Directive>()
                    .or_else(|_| fallback.parse())
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("Portico v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }

    if args.dump_config {
        println!("{}", portico_config::config_to_json(&config));
        return;
    }

    let mut plan = session::SessionPlan::from_config(&config);
    plan.browsers = args.browsers;
    if let Some(url) = args.url {
        plan.url = url;
    }
    if let Some(kind) = args.render_handler {
        plan.render_handler = HandlerKind::new(kind);
    }

    match session::run(&config, &plan) {
        Ok(report) => {
            tracing::info!(
                "Shutdown complete ({} opened, {} bound, {} closed)",
                report.opened,
                report.bound,
                report.closed
            );
            if report.bind_failures > 0 {
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!("Host error: {e}");
            std::process::exit(1);
        }
    }
}
