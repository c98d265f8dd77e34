//! Step 3: Dependency build - configure, then build, inside the dependency tree.

use crate::error::Result;
use crate::models::DependencyConfig;
use crate::system::{CommandRunner, WorkdirGuard};

/// Configure and build the dependency from inside its directory.
///
/// The build driver only starts once configure has succeeded. The previous
/// working directory is restored on every exit path; a partially configured
/// tree is left as-is.
pub fn build_dependency<R: CommandRunner + ?Sized>(
    runner: &R,
    dependency: &DependencyConfig,
) -> Result<()> {
    let _workdir = WorkdirGuard::enter(&dependency.directory)?;

    let configure = dependency.configure_command();
    log::info!(target: "parsed", "Configuring {}: {}", dependency.name, configure);
    runner.run(&configure)?;

    let build = dependency.build_command();
    log::info!(target: "parsed", "Building {}: {}", dependency.name, build);
    runner.run(&build)
}
