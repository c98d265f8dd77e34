//! Step 2: Submodule sync.

use crate::error::Result;
use crate::models::SubmoduleConfig;
use crate::system::CommandRunner;

/// Initialize and update the git submodules. Only the exit status matters.
pub fn sync_submodules<R: CommandRunner + ?Sized>(
    runner: &R,
    submodules: &SubmoduleConfig,
) -> Result<()> {
    let command = submodules.sync_command();
    log::info!("[Submodules] {}", command);
    runner.run(&command)
}
