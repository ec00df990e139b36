//! Observability hook for soft failures during the overlay pass.
//!
//! A malformed environment variable or default literal must not abort a
//! load, so the resolver keeps the field's previous value and describes the
//! problem to an [`IssueReporter`]. The default reporter emits a
//! `tracing` warning; callers can install their own to collect issues or to
//! fail loudly in development builds.

use std::fmt;
use std::sync::Arc;

use crate::coerce::{CoerceError, ScalarKind};

/// Which overlay stage produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IssueSource {
    /// An environment variable was set but could not be converted.
    Environment,
    /// A default literal could not be converted.
    Default,
}

impl fmt::Display for IssueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Environment => "environment",
            Self::Default => "default",
        })
    }
}

/// A value that could not be applied to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayIssue {
    /// Dotted path of the field, such as `database.port`.
    pub path: String,
    /// Stage that supplied the value.
    pub source: IssueSource,
    /// Environment key for [`IssueSource::Environment`]; empty for defaults.
    pub key: String,
    /// Kind of the target field.
    pub kind: ScalarKind,
    /// The rejected text.
    pub raw: String,
    /// Why the value was rejected.
    pub reason: CoerceError,
}

impl fmt::Display for OverlayIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            IssueSource::Environment => write!(
                f,
                "ignoring environment variable {} for {}: {}",
                self.key, self.path, self.reason
            ),
            IssueSource::Default => {
                write!(f, "ignoring default for {}: {}", self.path, self.reason)
            }
        }
    }
}

/// Callback receiving every soft failure.
pub type IssueReporter = Arc<dyn Fn(&OverlayIssue) + Send + Sync>;

/// Reporter that logs each issue at `warn` level.
#[must_use]
pub fn tracing_reporter() -> IssueReporter {
    Arc::new(|issue: &OverlayIssue| {
        tracing::warn!(
            path = %issue.path,
            source = %issue.source,
            key = %issue.key,
            kind = %issue.kind,
            raw = %issue.raw,
            reason = %issue.reason,
            "configuration value ignored"
        );
    })
}

/// Reporter that discards every issue.
#[must_use]
pub fn silent_reporter() -> IssueReporter {
    Arc::new(|_: &OverlayIssue| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::{fixture, rstest};

    #[fixture]
    fn issue() -> OverlayIssue {
        OverlayIssue {
            path: String::from("database.port"),
            source: IssueSource::Environment,
            key: String::from("DB_PORT"),
            kind: ScalarKind::Integer,
            raw: String::from("five"),
            reason: CoerceError::Invalid {
                kind: ScalarKind::Integer,
                raw: String::from("five"),
            },
        }
    }

    #[rstest]
    fn environment_issues_name_the_variable(issue: OverlayIssue) -> Result<()> {
        let text = issue.to_string();
        ensure!(
            text == "ignoring environment variable DB_PORT for database.port: \"five\" is not a valid integer value",
            "unexpected message {text}"
        );
        Ok(())
    }

    #[rstest]
    fn default_issues_omit_the_key(issue: OverlayIssue) -> Result<()> {
        let text = OverlayIssue {
            source: IssueSource::Default,
            key: String::new(),
            ..issue
        }
        .to_string();
        ensure!(text.starts_with("ignoring default for database.port:"), "{text}");
        Ok(())
    }

    #[rstest]
    fn bundled_reporters_accept_issues(issue: OverlayIssue) {
        tracing_reporter()(&issue);
        silent_reporter()(&issue);
    }
}
