pub mod commit_msg;
pub mod hook;
pub mod install;
pub mod pre_commit;
pub mod wizard;

/// Everything passed or nothing to do.
pub const EXIT_OK: i32 = 0;
/// A hook failed, or the pre-check could not run.
pub const EXIT_FAILURE: i32 = 1;
/// A commit message was rejected or the wizard failed (`-1` as a byte).
pub const EXIT_REJECTED: i32 = 255;

/// Flatten an error and its sources into one `a: b: c` line.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

/// Print `error` to stderr through the installed miette handler.
pub(crate) fn print_error(error: &dyn std::error::Error) {
    let report = miette::Report::msg(error_chain(error));
    eprintln!("{report:?}");
}
