//! Core data structures for the bootstrap runner.
//!
//! The `DEFAULT_*` constants are the values the bootstrap has always used.
//! They are the defaults of `BootstrapConfig`, so a configuration file only
//! needs to name the fields it overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Toolchain binary queried by the version gate.
pub const DEFAULT_TOOLCHAIN: &str = "ocaml";
/// Flag that makes the toolchain print its version.
pub const DEFAULT_VERSION_FLAG: &str = "-version";
/// Marker that must appear in the toolchain's version output.
pub const DEFAULT_REQUIRED_VERSION: &str = "3.12";

/// Source-control client used for the submodule sync.
pub const DEFAULT_VCS: &str = "git";

pub const DEFAULT_DEPENDENCY_NAME: &str = "llvm";
pub const DEFAULT_DEPENDENCY_DIR: &str = "llvm";
pub const DEFAULT_CONFIGURE_PROGRAM: &str = "./configure";
pub const DEFAULT_CONFIGURE_ARGS: &[&str] = &["--enable-assertions", "--enable-targets=all"];
pub const DEFAULT_BUILD_PROGRAM: &str = "make";
/// Parallelism handed to the dependency's build driver.
pub const DEFAULT_BUILD_JOBS: usize = 12;

pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_BUILD_TOOL: &str = "ocamlbuild";
pub const DEFAULT_BUILD_TARGET: &str = "fimage.top";

pub const DEFAULT_LOG_DIR: &str = "logs";

/// A program plus its arguments, run as one subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Version gate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub program: String,
    pub version_flag: String,
    /// Substring that must occur in the version output.
    pub required_version: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig {
            program: DEFAULT_TOOLCHAIN.to_string(),
            version_flag: DEFAULT_VERSION_FLAG.to_string(),
            required_version: DEFAULT_REQUIRED_VERSION.to_string(),
        }
    }
}

impl ToolchainConfig {
    pub fn version_command(&self) -> CommandSpec {
        CommandSpec::new(&self.program).arg(&self.version_flag)
    }
}

/// Submodule sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmoduleConfig {
    pub program: String,
    /// Also initialize nested submodules.
    pub recursive: bool,
}

impl Default for SubmoduleConfig {
    fn default() -> Self {
        SubmoduleConfig {
            program: DEFAULT_VCS.to_string(),
            recursive: true,
        }
    }
}

impl SubmoduleConfig {
    pub fn sync_command(&self) -> CommandSpec {
        let cmd = CommandSpec::new(&self.program).args(["submodule", "update", "--init"]);
        if self.recursive {
            cmd.arg("--recursive")
        } else {
            cmd
        }
    }
}

/// Dependency configure-and-build settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Label used in banners and logs.
    pub name: String,
    pub directory: PathBuf,
    pub configure_program: String,
    pub configure_args: Vec<String>,
    pub build_program: String,
    /// Parallel jobs for the build driver; 0 selects the host CPU count.
    pub jobs: usize,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        DependencyConfig {
            name: DEFAULT_DEPENDENCY_NAME.to_string(),
            directory: PathBuf::from(DEFAULT_DEPENDENCY_DIR),
            configure_program: DEFAULT_CONFIGURE_PROGRAM.to_string(),
            configure_args: DEFAULT_CONFIGURE_ARGS
                .iter()
                .map(|arg| arg.to_string())
                .collect(),
            build_program: DEFAULT_BUILD_PROGRAM.to_string(),
            jobs: DEFAULT_BUILD_JOBS,
        }
    }
}

impl DependencyConfig {
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }

    pub fn configure_command(&self) -> CommandSpec {
        CommandSpec::new(&self.configure_program).args(&self.configure_args)
    }

    pub fn build_command(&self) -> CommandSpec {
        CommandSpec::new(&self.build_program).arg(format!("-j{}", self.effective_jobs()))
    }
}

/// Smoke build settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeBuildConfig {
    pub directory: PathBuf,
    pub build_tool: String,
    pub target: String,
}

impl Default for SmokeBuildConfig {
    fn default() -> Self {
        SmokeBuildConfig {
            directory: PathBuf::from(DEFAULT_SOURCE_DIR),
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            target: DEFAULT_BUILD_TARGET.to_string(),
        }
    }
}

impl SmokeBuildConfig {
    pub fn build_command(&self) -> CommandSpec {
        CommandSpec::new(&self.build_tool).arg(&self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub debug_logging: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            debug_logging: false,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

/// Complete bootstrap configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub toolchain: ToolchainConfig,
    pub submodules: SubmoduleConfig,
    pub dependency: DependencyConfig,
    pub smoke: SmokeBuildConfig,
    pub logging: LoggingConfig,
}
