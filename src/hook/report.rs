//! Failure report printed when a hook fails.

use std::io::IsTerminal;

use miette::{GraphicalReportHandler, GraphicalTheme};
use owo_colors::OwoColorize;

use super::HookFailure;

/// Whether the report should be colored: stderr is a terminal and `NO_COLOR`
/// is unset.
pub fn stderr_supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

/// Render the failure report as printed to stderr.
///
/// Layout: a label-prefixed header, the offending command (if a task was
/// involved), the diagnostic with its cause chain and bypass hint, and a
/// closing warning against bypassing.
pub fn render(failure: &HookFailure, color: bool) -> String {
    let label = &failure.label;
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("{label}: You've failed to pass all the hooks.\n"));
    out.push_str(&format!("{label}:\n"));

    if let Some(command) = failure.error.command() {
        out.push_str(&format!("{label}: An error was raised by command\n"));
        if color {
            out.push_str(&format!("{}\n", command.yellow().bold()));
        } else {
            out.push_str(&format!("{command}\n"));
        }
    }

    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let mut diagnostic = String::new();
    match GraphicalReportHandler::new_themed(theme).render_report(&mut diagnostic, failure) {
        Ok(()) => out.push_str(&diagnostic),
        // The handler only fails on fmt errors; fall back to the plain chain.
        Err(_) => out.push_str(&format!("{failure}: {}\n", failure.error)),
    }

    out.push_str(&format!("{label}:\n"));
    out.push_str(&format!(
        "{label}: But this is not advised as your tests are obviously failing.\n"
    ));
    out
}

/// Print the report for `failure` to stderr.
pub fn print(failure: &HookFailure) {
    eprint!("{}", render(failure, stderr_supports_color()));
}
