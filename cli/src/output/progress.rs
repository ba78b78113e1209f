//! Spinners for remote calls that take a noticeable time (host probes, ping).

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];
const RUNNING: &str = "  {spinner:.cyan} {msg}";
const DONE: &str = "  {prefix} {msg}";

/// Start a ticking spinner showing `msg`.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_message(msg.to_string());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template(RUNNING)
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn finish(pb: &ProgressBar, mark: &'static str, msg: &str) {
    pb.set_style(ProgressStyle::default_spinner().template(DONE).expect("valid template"));
    pb.set_prefix(mark);
    pb.finish_with_message(msg.to_string());
}

/// Replace the spinner with `✓ msg`.
pub fn finish_ok(pb: &ProgressBar, msg: &str) {
    finish(pb, "✓", msg);
}

/// Replace the spinner with `✗ msg`.
pub fn finish_error(pb: &ProgressBar, msg: &str) {
    finish(pb, "✗", msg);
}
