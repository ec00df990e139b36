//! Helpers shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use overlay_config::{IssueReporter, OverlayIssue};

/// Run `f` inside a `figment::Jail`, translating errors to `anyhow`.
pub fn with_jail<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut figment::Jail) -> Result<()>,
{
    figment::Jail::try_with(|j| f(j).map_err(|err| figment::Error::from(err.to_string())))
        .map_err(|err| anyhow!(err))
}

/// Collects every reported issue for later inspection.
#[derive(Clone, Default)]
pub struct Collected(Arc<Mutex<Vec<OverlayIssue>>>);

impl Collected {
    pub fn reporter(&self) -> IssueReporter {
        let sink = Arc::clone(&self.0);
        Arc::new(move |issue: &OverlayIssue| {
            if let Ok(mut issues) = sink.lock() {
                issues.push(issue.clone());
            }
        })
    }

    pub fn issues(&self) -> Result<Vec<OverlayIssue>> {
        self.0
            .lock()
            .map(|issues| issues.clone())
            .map_err(|_| anyhow!("issue collector poisoned"))
    }
}
