//! Main application entry point.

use clap::Parser;
use inkboard_app::{App, AppConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inkboard", about = "Replay a whiteboard script and export the page")]
struct Cli {
    /// JSON config file. Built-in defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON script of whiteboard commands.
    script: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting InkBoard");

    let config = match &cli.config {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    match App::new(config).run_file(&cli.script) {
        Ok(report) => {
            if let Some(redirect) = report.redirect {
                println!("Redirect: {}", redirect);
            }
            for path in report.exported {
                println!("Exported: {}", path.display());
            }
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
