//! FImage bootstrap runner
//!
//! Prepares a fresh FImage checkout for development: checks the OCaml
//! toolchain version, syncs the git submodules, configures and builds the
//! bundled LLVM, and smoke-tests the tree by building `fimage.top`.
//!
//! The crate is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Command and configuration types with the built-in defaults
//! - **config**: Configuration file discovery, loading, and validation
//! - **system**: Subprocess execution and scoped working directories
//! - **log_collector**: Session log persistence behind the `log` facade
//! - **orchestrator**: The four-step bootstrap sequence

pub mod error;
pub mod models;

pub mod config;

pub mod system;

pub mod log_collector;

pub mod orchestrator;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{BootstrapError, ConfigError, Result};

pub use models::{
    BootstrapConfig, CommandSpec, DependencyConfig, LoggingConfig, SmokeBuildConfig,
    SubmoduleConfig, ToolchainConfig,
};

pub use config::{load_bootstrap_config, LoadedConfig};

pub use system::{CommandRunner, SystemRunner, WorkdirGuard};

pub use orchestrator::{
    build_dependency, check_toolchain_version, format_banner, print_banner, smoke_build,
    sync_submodules, Bootstrap, BootstrapPhase, BootstrapState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
