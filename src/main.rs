use anyhow::Context;
use std::process::ExitCode;

use fimage_bootstrap::log::LevelFilter;
use fimage_bootstrap::{load_bootstrap_config, Bootstrap, BootstrapError, LogCollector};

fn main() -> ExitCode {
    let (result, collector) = run();

    match collector {
        // Step failures were already logged (and echoed) by the runner.
        Some(collector) => {
            if let Err(e) = collector.flush_and_wait() {
                eprintln!("[Bootstrap] WARNING: Failed to flush session log: {}", e);
            }
        }
        None => {
            if let Err(e) = &result {
                eprintln!("[Bootstrap] ERROR: {:#}", e);
            }
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<BootstrapError>()
                .map(BootstrapError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run() -> (anyhow::Result<()>, Option<LogCollector>) {
    // =========================================================================
    // CONFIGURATION - BEFORE LOGGING (log_dir and level come from it)
    // =========================================================================
    let root = match std::env::current_dir().context("Failed to determine the source tree root") {
        Ok(root) => root,
        Err(e) => return (Err(e), None),
    };

    let loaded = match load_bootstrap_config(&root).context("Failed to load bootstrap configuration")
    {
        Ok(loaded) => loaded,
        Err(e) => return (Err(e), None),
    };

    // =========================================================================
    // LOGGING INITIALIZATION
    // =========================================================================
    let logging = &loaded.config.logging;
    let max_level = if logging.debug_logging {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let collector = match LogCollector::new(&root.join(&logging.log_dir), max_level)
        .context("Failed to create the session log")
    {
        Ok(collector) => collector,
        Err(e) => return (Err(e), None),
    };

    if let Err(e) = collector.install() {
        eprintln!("[Bootstrap] WARNING: Failed to set LogCollector as global logger: {}", e);
    }

    log::info!(
        "FImage bootstrap {} (session log: {})",
        fimage_bootstrap::VERSION,
        collector.session_path().display()
    );
    match &loaded.source {
        Some(path) => log::info!("Configuration loaded from {}", path.display()),
        None => log::info!("No configuration file found, using built-in defaults"),
    }

    // =========================================================================
    // BOOTSTRAP SEQUENCE
    // =========================================================================
    let mut bootstrap = Bootstrap::new(loaded.config);
    let result = bootstrap.run().map_err(anyhow::Error::from);

    (result, Some(collector))
}
