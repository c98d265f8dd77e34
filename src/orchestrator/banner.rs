//! Status banners printed before each bootstrap step.
//!
//! A banner frames the message between two dash rules as wide as the
//! message's longest line:
//!
//! ```text
//!
//! ------------------------
//! Testing for OCaml 3.12.*
//! ------------------------
//! ```

use std::io::{self, Write};

/// Length in characters of the longest line of `message`.
pub fn max_line_length(message: &str) -> usize {
    message
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// Dash rule matching the longest line of `message`.
pub fn separator(message: &str) -> String {
    "-".repeat(max_line_length(message))
}

/// Exact text written by `print_banner`, including the leading blank line.
pub fn format_banner(message: &str) -> String {
    let bars = separator(message);
    format!("\n{bars}\n{message}\n{bars}\n")
}

/// Write a banner for `message` to `out`.
pub fn write_banner<W: Write + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    out.write_all(format_banner(message).as_bytes())?;
    out.flush()
}

/// Print a banner for `message` to stdout.
pub fn print_banner(message: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Console output is best effort; a closed stdout must not abort the run.
    let _ = write_banner(&mut handle, message);
}
