use std::fs;
use std::fs::File;
use std::process;

use clap::Parser;
use datagrid_cli::args::Cli;
use datagrid_cli::paths;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

/// Logs to the rotated cache-dir log file; runs without logging if it cannot be created.
fn init_logging(verbose: bool) {
    paths::rotate_logs();

    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = File::create(&path) else { return };

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = WriteLogger::init(level, Config::default(), file);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = datagrid_cli::run(cli).await {
        log::error!("[cli] {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
