use anyhow::Result;
use futures::future::try_join_all;
use log::{debug, error};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::github::{Commit, Issue, Repository, SearchResults};
use crate::services::cache::RequestCache;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {status}")]
    Status { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    repo_cache: RequestCache<Vec<Repository>>,
    commit_cache: RequestCache<Vec<Commit>>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, "https://api.github.com")
    }

    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("repolens"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(t) = token.filter(|t| !t.is_empty()) {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", t))?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            repo_cache: RequestCache::new(),
            commit_cache: RequestCache::new(),
        })
    }

    /// Searches repositories by name with optional qualifiers. Cached by the
    /// composite query string, so repeating the same search hits the network
    /// at most once per session.
    pub async fn search_repositories(
        &self,
        query: &str,
        language: Option<&str>,
        min_stars: Option<u32>,
    ) -> Result<Vec<Repository>, GitHubError> {
        let composite = build_search_query(query, language, min_stars);
        self.repo_cache
            .get_or_fetch(&composite, || async {
                let url = format!(
                    "{}/search/repositories?q={}",
                    self.base_url,
                    urlencoding::encode(&composite)
                );
                let results: SearchResults<Repository> = self.get_json(&url).await?;
                Ok(results.items)
            })
            .await
    }

    /// Searches issues by title term, then resolves each hit to its owning
    /// repository. The per-repository fetches run concurrently and the whole
    /// call fails if any one of them fails; on success the list has one entry
    /// per issue, in the order the issues were returned.
    ///
    /// Cached under a keyspace distinct from the name search, so the same
    /// text in both modes never collides.
    pub async fn search_repos_by_issue_term(
        &self,
        term: &str,
    ) -> Result<Vec<Repository>, GitHubError> {
        let key = format!("issue-term:{}", term);
        self.repo_cache
            .get_or_fetch(&key, || async {
                let url = format!(
                    "{}/search/issues?q={}",
                    self.base_url,
                    urlencoding::encode(term)
                );
                let issues: SearchResults<Issue> = self.get_json(&url).await?;

                try_join_all(
                    issues
                        .items
                        .iter()
                        .map(|issue| self.get_json::<Repository>(&issue.repository_url)),
                )
                .await
            })
            .await
    }

    /// Lists the commits of one repository, cached per `<owner>/<repo>`.
    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Commit>, GitHubError> {
        let key = format!("{}/{}", owner, repo);
        self.commit_cache
            .get_or_fetch(&key, || async {
                let url = format!("{}/repos/{}/{}/commits", self.base_url, owner, repo);
                self.get_json(&url).await
            })
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("GitHub API error {}: {}", status, body);
            return Err(GitHubError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

/// Joins the trimmed free-text query with the optional qualifiers, in order.
/// Empty or zero filter values are omitted entirely.
fn build_search_query(query: &str, language: Option<&str>, min_stars: Option<u32>) -> String {
    let mut terms: Vec<String> = Vec::new();

    let trimmed = query.trim();
    if !trimmed.is_empty() {
        terms.push(trimmed.to_string());
    }
    if let Some(language) = language.filter(|l| !l.is_empty()) {
        terms.push(format!("language:{}", language));
    }
    if let Some(stars) = min_stars.filter(|s| *s > 0) {
        terms.push(format!("stars:>={}", stars));
    }

    terms.join(" ")
}
