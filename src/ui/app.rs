use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::models::github::{Commit, Repository};
use crate::services::github::{GitHubClient, GitHubError};
use crate::services::store::CriteriaStore;
use crate::views::commits::{CommitsParams, CommitsView};
use crate::views::search::{SearchRequest, SearchView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Search,
    Commits,
}

/// Focus order on the search screen. `Results` is reachable only while the
/// result list is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    SearchBy,
    Query,
    Language,
    Stars,
    Results,
}

/// Completion message sent back from a spawned fetch task.
pub enum Outcome {
    Search {
        seq: u64,
        result: Result<Vec<Repository>, GitHubError>,
    },
    Commits {
        seq: u64,
        result: Result<Vec<Commit>, GitHubError>,
    },
}

pub struct App {
    pub route: Route,
    pub search: SearchView,
    pub commits: CommitsView,
    pub focus: SearchFocus,
    pub repo_index: usize,
    pub commit_index: usize,
    pub should_quit: bool,
    store: CriteriaStore,
    client: Arc<GitHubClient>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
}

impl App {
    pub fn new(
        client: GitHubClient,
        store: CriteriaStore,
        outcome_tx: mpsc::UnboundedSender<Outcome>,
    ) -> Self {
        let mut search = SearchView::new();
        search.restore(&store);

        Self {
            route: Route::Search,
            search,
            commits: CommitsView::new(),
            focus: SearchFocus::Query,
            repo_index: 0,
            commit_index: 0,
            should_quit: false,
            store,
            client: Arc::new(client),
            outcome_tx,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.route {
            Route::Search => self.handle_search_key(key),
            Route::Commits => self.handle_commits_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            self.search.reset_form(&self.store);
            self.focus = SearchFocus::Query;
            self.repo_index = 0;
            return;
        }

        match key.code {
            KeyCode::Tab => self.next_focus(),
            KeyCode::BackTab => self.prev_focus(),
            KeyCode::Enter => {
                if self.focus == SearchFocus::Results {
                    self.select_repo();
                } else if let Some((seq, request)) = self.search.submit() {
                    self.spawn_search(seq, request);
                }
            }
            KeyCode::Esc => {
                if self.focus == SearchFocus::Results {
                    self.focus = SearchFocus::Query;
                } else {
                    self.should_quit = true;
                }
            }
            _ => self.handle_search_field_key(key),
        }
    }

    fn handle_search_field_key(&mut self, key: KeyEvent) {
        match self.focus {
            SearchFocus::SearchBy => {
                if matches!(
                    key.code,
                    KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                ) {
                    self.search.form.search_by = self.search.form.search_by.toggle();
                }
            }
            SearchFocus::Query => edit_text(&mut self.search.form.query, key),
            SearchFocus::Language => edit_text(&mut self.search.form.language, key),
            SearchFocus::Stars => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => self.search.form.stars.push(c),
                KeyCode::Backspace => {
                    self.search.form.stars.pop();
                }
                _ => {}
            },
            SearchFocus::Results => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    if self.repo_index > 0 {
                        self.repo_index -= 1;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if !self.search.repos.is_empty()
                        && self.repo_index < self.search.repos.len() - 1
                    {
                        self.repo_index += 1;
                    }
                }
                _ => {}
            },
        }
    }

    fn handle_commits_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b') => self.go_back_to_search(),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.commit_index > 0 {
                    self.commit_index -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.commits.commits.is_empty()
                    && self.commit_index < self.commits.commits.len() - 1
                {
                    self.commit_index += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char('o') => {
                if let Some(commit) = self.commits.commits.get(self.commit_index) {
                    self.commits.open_commit(commit);
                }
            }
            _ => {}
        }
    }

    /// Applies a fetch completion. Selection is reset only when the view
    /// accepted the result; stale completions leave everything untouched.
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Search { seq, result } => {
                if self.search.apply_search_result(seq, result) {
                    self.repo_index = 0;
                    if self.search.has_results() {
                        self.focus = SearchFocus::Results;
                    }
                }
            }
            Outcome::Commits { seq, result } => {
                if self.commits.apply_commits(seq, result) {
                    self.commit_index = 0;
                }
            }
        }
    }

    fn select_repo(&mut self) {
        if let Some(repo) = self.search.repos.get(self.repo_index) {
            let params = self.search.go_to_commits(&self.store, repo);
            self.open_commits(params);
        }
    }

    /// Navigates to the commits screen, superseding any commit fetch still
    /// in flight. The one commits view lives as long as the app, so sequence
    /// numbers stay comparable across navigations.
    fn open_commits(&mut self, params: CommitsParams) {
        self.commit_index = 0;
        let (seq, params) = self.commits.set_params(params);
        self.spawn_commits(seq, params);
        self.route = Route::Commits;
    }

    /// Returns to the search screen, its form repopulated from the criteria
    /// carried back by the commits view (when present).
    fn go_back_to_search(&mut self) {
        let carried = self.commits.go_back(&self.store);
        self.search.reopen(carried.as_ref());
        self.repo_index = 0;
        self.focus = SearchFocus::Query;
        self.route = Route::Search;
    }

    fn next_focus(&mut self) {
        self.focus = match self.focus {
            SearchFocus::SearchBy => SearchFocus::Query,
            SearchFocus::Query => SearchFocus::Language,
            SearchFocus::Language => SearchFocus::Stars,
            SearchFocus::Stars if self.search.repos.is_empty() => SearchFocus::SearchBy,
            SearchFocus::Stars => SearchFocus::Results,
            SearchFocus::Results => SearchFocus::SearchBy,
        };
    }

    fn prev_focus(&mut self) {
        self.focus = match self.focus {
            SearchFocus::SearchBy if self.search.repos.is_empty() => SearchFocus::Stars,
            SearchFocus::SearchBy => SearchFocus::Results,
            SearchFocus::Query => SearchFocus::SearchBy,
            SearchFocus::Language => SearchFocus::Query,
            SearchFocus::Stars => SearchFocus::Language,
            SearchFocus::Results => SearchFocus::Stars,
        };
    }

    fn spawn_search(&self, seq: u64, request: SearchRequest) {
        let tx = self.outcome_tx.clone();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = match request {
                SearchRequest::ByName {
                    query,
                    language,
                    min_stars,
                } => {
                    client
                        .search_repositories(&query, language.as_deref(), min_stars)
                        .await
                }
                SearchRequest::ByIssueTerm { term } => {
                    client.search_repos_by_issue_term(&term).await
                }
            };
            tx.send(Outcome::Search { seq, result }).ok();
        });
    }

    fn spawn_commits(&self, seq: u64, params: CommitsParams) {
        let tx = self.outcome_tx.clone();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client.list_commits(&params.owner, &params.repo).await;
            tx.send(Outcome::Commits { seq, result }).ok();
        });
    }
}

fn edit_text(buffer: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}
