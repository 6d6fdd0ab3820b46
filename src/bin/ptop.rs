//! Terminal process monitor entry point.
//!
//! Loads the optional YAML config, runs the dashboard, and restores the
//! terminal before printing the farewell line. Set `PTOP_DEBUG=1` to get
//! timing and sampling diagnostics on stderr.

use std::process::ExitCode;

use ptop::{debug, App, Config};

fn main() -> ExitCode {
    debug::init_from_env();

    let config = Config::default_path()
        .map(Config::load_or_default)
        .unwrap_or_default();

    let mut app = App::new(config);
    match app.run() {
        Ok(()) => {
            println!("Monitoring stopped.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ptop: {e}");
            ExitCode::FAILURE
        }
    }
}
