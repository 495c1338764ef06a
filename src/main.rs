use clap::Parser;
use pxutil::app::Application;
use pxutil::cli::Args;
use pxutil::config::Config;
use pxutil::display;
use pxutil::logging;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            display::display_error(&e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_tracing(&config.log_settings()) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let app = Application::new(args, config);
    match app.run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            display::display_error(&e);
            std::process::exit(1);
        }
    }
}
