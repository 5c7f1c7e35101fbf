use log::{error, warn};

use crate::models::criteria::SearchCriteria;
use crate::models::github::Commit;
use crate::services::github::GitHubError;
use crate::services::store::CriteriaStore;

/// Route parameters identifying the repository whose commits are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitsParams {
    pub owner: String,
    pub repo: String,
}

/// Commit screen state. `set_params` runs on every parameter change, not
/// just the first, so navigating straight from one repository's commits to
/// another's re-triggers the fetch.
pub struct CommitsView {
    pub params: Option<CommitsParams>,
    pub commits: Vec<Commit>,
    pub loading: bool,
    seq: u64,
}

impl CommitsView {
    pub fn new() -> Self {
        Self {
            params: None,
            commits: Vec::new(),
            loading: true,
            seq: 0,
        }
    }

    /// Records new route parameters and starts a fresh load, returning the
    /// fetch to run tagged with its sequence number.
    pub fn set_params(&mut self, params: CommitsParams) -> (u64, CommitsParams) {
        self.loading = true;
        self.seq += 1;
        self.params = Some(params.clone());
        (self.seq, params)
    }

    /// Applies a finished commit load. Results from a superseded parameter
    /// change are discarded. Returns whether the result was applied.
    pub fn apply_commits(&mut self, seq: u64, result: Result<Vec<Commit>, GitHubError>) -> bool {
        if seq != self.seq {
            return false;
        }
        self.loading = false;
        match result {
            Ok(commits) => self.commits = commits,
            Err(e) => {
                error!("commit load failed: {}", e);
                self.commits.clear();
            }
        }
        true
    }

    pub fn no_results(&self) -> bool {
        !self.loading && self.commits.is_empty()
    }

    /// Opens the commit in the system browser. Relative or malformed URLs
    /// are ignored.
    pub fn open_commit(&self, commit: &Commit) {
        if !has_web_url(&commit.html_url) {
            return;
        }
        if let Err(e) = open::that(&commit.html_url) {
            warn!("failed to open {}: {}", commit.html_url, e);
        }
    }

    /// Reads the criteria the search view persisted, if any, so navigation
    /// back can carry them along.
    pub fn go_back(&self, store: &CriteriaStore) -> Option<SearchCriteria> {
        store.load()
    }
}

fn has_web_url(url: &str) -> bool {
    url.starts_with("http")
}
