//! Step 4: Smoke build of a project target.

use crate::error::Result;
use crate::models::SmokeBuildConfig;
use crate::system::{CommandRunner, WorkdirGuard};

/// Run the project build tool against the smoke target inside the source tree.
pub fn smoke_build<R: CommandRunner + ?Sized>(runner: &R, smoke: &SmokeBuildConfig) -> Result<()> {
    let _workdir = WorkdirGuard::enter(&smoke.directory)?;

    let command = smoke.build_command();
    log::info!("[SmokeBuild] {} in {}", command, smoke.directory.display());
    runner.run(&command)
}
