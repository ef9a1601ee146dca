use std::process::ExitCode;

/// Exit status of a command.
///
/// - `Success` (0): the run completed
/// - `Failure` (1): the run completed but some templates could not be used
/// - `Error` (2): the run was aborted (bad arguments, unreadable catalog, I/O)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Completed with skipped templates.
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
