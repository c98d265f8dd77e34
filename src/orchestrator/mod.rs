//! Bootstrap orchestration: 4-step pipeline
//! (Version gate -> Submodule sync -> Dependency build -> Smoke build).

pub mod banner;
pub mod phases;
pub mod state;

pub use banner::{format_banner, print_banner, write_banner};
pub use phases::{build_dependency, check_toolchain_version, smoke_build, sync_submodules};
pub use state::{BootstrapPhase, BootstrapState};

use crate::error::{BootstrapError, Result};
use crate::models::BootstrapConfig;
use crate::system::{CommandRunner, SystemRunner};
use std::io::{self, Stdout, Write};

/// Runs the bootstrap steps in order, stopping at the first failure.
///
/// Banners and echoed tool output go to `out` (stdout in production).
pub struct Bootstrap<R: CommandRunner, W: Write = Stdout> {
    config: BootstrapConfig,
    runner: R,
    out: W,
    state: BootstrapState,
}

impl Bootstrap<SystemRunner, Stdout> {
    /// Bootstrap that runs real subprocesses and prints to stdout.
    pub fn new(config: BootstrapConfig) -> Self {
        Bootstrap::with_output(config, SystemRunner::new(), io::stdout())
    }
}

impl<R: CommandRunner, W: Write> Bootstrap<R, W> {
    pub fn with_output(config: BootstrapConfig, runner: R, out: W) -> Self {
        Bootstrap {
            config,
            runner,
            out,
            state: BootstrapState::new(),
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Snapshot of the run so far.
    pub fn state(&self) -> &BootstrapState {
        &self.state
    }

    /// Banner text announcing `phase`.
    pub fn status_message(&self, phase: BootstrapPhase) -> String {
        match phase {
            BootstrapPhase::VersionGate => format!(
                "Testing for OCaml {}.*",
                self.config.toolchain.required_version
            ),
            BootstrapPhase::SubmoduleSync => "Checking out submodules".to_string(),
            BootstrapPhase::DependencyBuild => format!(
                "Configuring {}:\n    {}",
                self.config.dependency.name,
                self.config.dependency.configure_args.join(" ")
            ),
            BootstrapPhase::SmokeBuild => {
                format!("Test: building {}", self.config.smoke.target)
            }
            other => other.as_str().to_string(),
        }
    }

    /// Run every step in order.
    ///
    /// Each step's banner is printed before it starts, so on failure the last
    /// banner names the failing step. A bootstrap can only be run once.
    pub fn run(&mut self) -> Result<()> {
        log::info!(target: "parsed", "Bootstrap starting");

        for phase in BootstrapPhase::STEPS {
            self.state
                .transition_to(phase)
                .map_err(BootstrapError::InvalidTransition)?;

            let message = self.status_message(phase);
            let _ = write_banner(&mut self.out, &message);
            log::info!(target: "parsed", "PHASE: {}", phase.as_str());

            if let Err(e) = self.execute(phase) {
                self.state.record_error(e.to_string());
                log::error!("[Bootstrap] {} failed: {}", phase.as_str(), e);
                return Err(e);
            }
        }

        self.state
            .transition_to(BootstrapPhase::Completed)
            .map_err(BootstrapError::InvalidTransition)?;

        match self.state.elapsed_since_start() {
            Ok(elapsed) => log::info!(
                target: "parsed",
                "Bootstrap completed in {:.1}s",
                elapsed.as_secs_f64()
            ),
            Err(_) => log::info!(target: "parsed", "Bootstrap completed"),
        }
        Ok(())
    }

    fn execute(&mut self, phase: BootstrapPhase) -> Result<()> {
        match phase {
            BootstrapPhase::VersionGate => {
                check_toolchain_version(&self.runner, &self.config.toolchain, &mut self.out)
                    .map(|_| ())
            }
            BootstrapPhase::SubmoduleSync => sync_submodules(&self.runner, &self.config.submodules),
            BootstrapPhase::DependencyBuild => {
                build_dependency(&self.runner, &self.config.dependency)
            }
            BootstrapPhase::SmokeBuild => smoke_build(&self.runner, &self.config.smoke),
            other => Err(BootstrapError::InvalidTransition(format!(
                "{} is not an executable step",
                other.as_str()
            ))),
        }
    }
}
