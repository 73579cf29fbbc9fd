//! Progress bars for the per-case and per-bug loops.
//!
//! Bars draw to stderr and only when stderr is a terminal and `NO_COLOR` is
//! unset; otherwise a hidden bar is returned so callers never branch.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

const TEMPLATE: &str = "{msg} [{bar:40}] {pos}/{len} ({elapsed})";

/// Create a progress bar for `len` items labelled with `message`.
pub fn bar(len: usize, message: &str) -> ProgressBar {
    if !enabled() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(message.to_string());
    pb
}

fn enabled() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}
