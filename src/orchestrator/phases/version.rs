//! Step 1: Version gate - the toolchain must report the required version.

use crate::error::{BootstrapError, Result};
use crate::models::ToolchainConfig;
use crate::system::CommandRunner;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;

// First dotted version number in a tool's banner, e.g. "3.12.1" or "4.02".
static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)+").expect("Invalid version regex"));

/// True iff `required` occurs anywhere in `output`.
///
/// Containment is the whole policy: "3.12" accepts "3.12.0" and "3.12.1" but
/// rejects "4.02.0" and "3.11.2".
pub fn version_matches(output: &str, required: &str) -> bool {
    output.contains(required)
}

/// Pull the reported version number out of the version output, for messages.
pub fn extract_version(output: &str) -> Option<&str> {
    VERSION_RE.find(output).map(|m| m.as_str())
}

/// Query the toolchain version and fail unless it carries the required marker.
///
/// On success the captured output and `...OK!` are echoed to `out`, and the
/// captured output is returned.
pub fn check_toolchain_version<R: CommandRunner + ?Sized>(
    runner: &R,
    toolchain: &ToolchainConfig,
    out: &mut dyn Write,
) -> Result<String> {
    let command = toolchain.version_command();
    let output = runner.run_capture(&command)?;
    let reported = extract_version(&output).unwrap_or_else(|| output.trim());

    if !version_matches(&output, &toolchain.required_version) {
        log::error!(
            "[VersionGate] {} reported '{}', need '{}'",
            toolchain.program,
            reported,
            toolchain.required_version
        );
        return Err(BootstrapError::VersionMismatch {
            required: toolchain.required_version.clone(),
            found: reported.to_string(),
        });
    }

    let _ = writeln!(out, "{}", output.trim_end());
    let _ = writeln!(out, "...OK!");
    log::info!(
        "[VersionGate] {} {} satisfies '{}'",
        toolchain.program,
        reported,
        toolchain.required_version
    );

    Ok(output)
}
