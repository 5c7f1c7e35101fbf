use log::{error, warn};

use crate::models::criteria::{SearchBy, SearchCriteria};
use crate::models::github::Repository;
use crate::services::github::GitHubError;
use crate::services::store::CriteriaStore;
use crate::views::commits::CommitsParams;

/// Client call produced by a valid form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    ByName {
        query: String,
        language: Option<String>,
        min_stars: Option<u32>,
    },
    ByIssueTerm {
        term: String,
    },
}

/// Editable form state. Text fields are kept as raw buffers; `criteria`
/// converts them to their canonical optional form.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub search_by: SearchBy,
    pub query: String,
    pub language: String,
    pub stars: String,
}

impl SearchForm {
    pub fn is_valid(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            search_by: self.search_by,
            query: self.query.clone(),
            language: Some(self.language.clone()).filter(|l| !l.is_empty()),
            stars: self.stars.trim().parse().ok(),
        }
    }

    pub fn apply_criteria(&mut self, criteria: &SearchCriteria) {
        self.search_by = criteria.search_by;
        self.query = criteria.query.clone();
        self.language = criteria.language.clone().unwrap_or_default();
        self.stars = criteria.stars.map(|s| s.to_string()).unwrap_or_default();
    }
}

/// Search screen state: the form, the current result list, and the flags
/// driving the loading / empty / validation displays.
pub struct SearchView {
    pub form: SearchForm,
    pub repos: Vec<Repository>,
    pub loading: bool,
    pub submitted: bool,
    seq: u64,
}

impl SearchView {
    pub fn new() -> Self {
        Self {
            form: SearchForm::default(),
            repos: Vec::new(),
            loading: false,
            submitted: false,
            seq: 0,
        }
    }

    /// Repopulates the form from the persisted criteria slot, if present.
    /// Does not submit.
    pub fn restore(&mut self, store: &CriteriaStore) {
        if let Some(criteria) = store.load() {
            self.form.apply_criteria(&criteria);
        }
    }

    /// Re-initializes the view for a return from the commits screen: default
    /// state with the form repopulated from the carried criteria. The
    /// submission sequence keeps counting, so a search spawned before
    /// navigating away can no longer land here.
    pub fn reopen(&mut self, criteria: Option<&SearchCriteria>) {
        self.form = SearchForm::default();
        self.repos.clear();
        self.loading = false;
        self.submitted = false;
        self.seq += 1;
        if let Some(criteria) = criteria {
            self.form.apply_criteria(criteria);
        }
    }

    /// Validates the form and, when valid, starts a new search: clears the
    /// current results, raises the loading flag and returns the request to
    /// run, tagged with its submission sequence number. Returns `None` when
    /// the query is empty; `submitted` is raised either way so the view can
    /// surface the validation message.
    pub fn submit(&mut self) -> Option<(u64, SearchRequest)> {
        self.submitted = true;
        if !self.form.is_valid() {
            return None;
        }

        self.loading = true;
        self.repos.clear();
        self.seq += 1;

        let request = match self.form.search_by {
            SearchBy::Issue => SearchRequest::ByIssueTerm {
                term: self.form.query.clone(),
            },
            SearchBy::Name => {
                let criteria = self.form.criteria();
                SearchRequest::ByName {
                    query: criteria.query,
                    language: criteria.language,
                    min_stars: criteria.stars.filter(|s| *s > 0),
                }
            }
        };
        Some((self.seq, request))
    }

    /// Applies a finished search tagged with the sequence number from
    /// `submit`. A result from a superseded submission is discarded so a
    /// slow earlier request can never overwrite a newer one. Returns whether
    /// the result was applied.
    pub fn apply_search_result(
        &mut self,
        seq: u64,
        result: Result<Vec<Repository>, GitHubError>,
    ) -> bool {
        if seq != self.seq {
            return false;
        }
        self.loading = false;
        match result {
            Ok(repos) => self.repos = repos,
            // The empty-state display doubles as the failure display.
            Err(e) => error!("repository search failed: {}", e),
        }
        true
    }

    pub fn has_results(&self) -> bool {
        !self.repos.is_empty()
    }

    /// Persists the form's live values and yields the route parameters for
    /// the selected repository's commit view.
    pub fn go_to_commits(&self, store: &CriteriaStore, repo: &Repository) -> CommitsParams {
        if let Err(e) = store.save(&self.form.criteria()) {
            warn!("failed to persist search criteria: {}", e);
        }
        CommitsParams {
            owner: repo.owner.login.clone(),
            repo: repo.name.clone(),
        }
    }

    /// Restores the default form values, deletes the persisted criteria and
    /// clears the result list. A search still in flight is orphaned: the
    /// sequence moves past it, so its completion no longer matches.
    pub fn reset_form(&mut self, store: &CriteriaStore) {
        self.form = SearchForm::default();
        self.repos.clear();
        self.loading = false;
        self.submitted = false;
        self.seq += 1;
        if let Err(e) = store.clear() {
            warn!("failed to clear search criteria: {}", e);
        }
    }
}
