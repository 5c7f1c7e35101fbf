use mockito::{Matcher, Server};
use serde_json::json;

use repolens::services::github::{GitHubClient, GitHubError};

fn repo_json(id: u64, owner: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "html_url": format!("https://github.com/{}/{}", owner, name),
        "created_at": "2023-01-01T00:00:00Z",
        "stargazers_count": 100,
        "language": "TypeScript",
        "owner": {
            "login": owner,
            "avatar_url": "https://avatars.githubusercontent.com/u/1?v=4",
            "html_url": format!("https://github.com/{}", owner)
        }
    })
}

fn search_body(items: Vec<serde_json::Value>) -> String {
    json!({
        "total_count": items.len(),
        "incomplete_results": false,
        "items": items
    })
    .to_string()
}

fn commit_json(sha: &str) -> serde_json::Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/octocat/hello-world/commit/{}", sha),
        "commit": {
            "author": { "name": "Octocat", "date": "2021-01-01T00:00:00Z" },
            "message": "Initial commit"
        },
        "author": {
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "html_url": "https://github.com/octocat"
        }
    })
}

#[tokio::test]
async fn name_search_sends_the_encoded_composite_query() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "repo1 language:TypeScript stars:>=50".into(),
        ))
        .with_header("content-type", "application/json")
        .with_body(search_body(vec![repo_json(1, "user", "repo1")]))
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let repos = client
        .search_repositories("repo1", Some("TypeScript"), Some(50))
        .await
        .unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "repo1");
    assert_eq!(repos[0].owner.login, "user");
    m.assert_async().await;
}

#[tokio::test]
async fn name_search_trims_the_query_and_drops_empty_filters() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded("q".into(), "angular".into()))
        .with_body(search_body(Vec::new()))
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let repos = client
        .search_repositories("  angular  ", Some(""), Some(0))
        .await
        .unwrap();

    assert!(repos.is_empty());
    m.assert_async().await;
}

#[tokio::test]
async fn identical_name_searches_share_one_request() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded("q".into(), "rust".into()))
        .with_body(search_body(vec![repo_json(1, "a", "rust")]))
        .expect(1)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let first = client.search_repositories("rust", None, None).await.unwrap();
    let second = client.search_repositories("rust", None, None).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0].id, second[0].id);
    m.assert_async().await;
}

#[tokio::test]
async fn concurrent_identical_searches_share_one_request() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded("q".into(), "tokio".into()))
        .with_body(search_body(vec![repo_json(7, "tokio-rs", "tokio")]))
        .expect(1)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let (a, b) = tokio::join!(
        client.search_repositories("tokio", None, None),
        client.search_repositories("tokio", None, None)
    );

    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
    m.assert_async().await;
}

#[tokio::test]
async fn issue_search_resolves_each_issue_to_its_repository() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let issues = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::UrlEncoded("q".into(), "bug".into()))
        .with_body(
            json!({
                "total_count": 2,
                "incomplete_results": false,
                "items": [
                    {
                        "id": 10,
                        "title": "bug in beta",
                        "repository_url": format!("{}/repos/user-b/beta", url)
                    },
                    {
                        "id": 11,
                        "title": "bug in alpha",
                        "repository_url": format!("{}/repos/user-a/alpha", url)
                    }
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let repo_b = server
        .mock("GET", "/repos/user-b/beta")
        .with_body(repo_json(2, "user-b", "beta").to_string())
        .expect(1)
        .create_async()
        .await;
    let repo_a = server
        .mock("GET", "/repos/user-a/alpha")
        .with_body(repo_json(1, "user-a", "alpha").to_string())
        .expect(1)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let repos = client.search_repos_by_issue_term("bug").await.unwrap();

    // One repository per issue, in issue order, 1 + N requests in total.
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "beta");
    assert_eq!(repos[1].name, "alpha");
    issues.assert_async().await;
    repo_b.assert_async().await;
    repo_a.assert_async().await;
}

#[tokio::test]
async fn issue_search_fails_when_any_repository_fetch_fails() {
    let mut server = Server::new_async().await;
    let url = server.url();

    // Mocks only match while their handles are alive.
    let _issues = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::UrlEncoded("q".into(), "bug".into()))
        .with_body(
            json!({
                "total_count": 2,
                "incomplete_results": false,
                "items": [
                    {
                        "id": 10,
                        "title": "bug one",
                        "repository_url": format!("{}/repos/user-a/gone", url)
                    },
                    {
                        "id": 11,
                        "title": "bug two",
                        "repository_url": format!("{}/repos/user-b/here", url)
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let broken = server
        .mock("GET", "/repos/user-a/gone")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let _intact = server
        .mock("GET", "/repos/user-b/here")
        .with_body(repo_json(2, "user-b", "here").to_string())
        .expect_at_most(1)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let result = client.search_repos_by_issue_term("bug").await;

    assert!(matches!(result, Err(GitHubError::Status { .. })));
    broken.assert_async().await;
}

#[tokio::test]
async fn name_and_issue_searches_never_share_cache_keys() {
    let mut server = Server::new_async().await;
    let names = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded("q".into(), "rust".into()))
        .with_body(search_body(vec![repo_json(1, "a", "rust")]))
        .expect(1)
        .create_async()
        .await;
    let issues = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::UrlEncoded("q".into(), "rust".into()))
        .with_body(search_body(Vec::new()))
        .expect(1)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let by_name = client.search_repositories("rust", None, None).await.unwrap();
    let by_issue = client.search_repos_by_issue_term("rust").await.unwrap();

    assert_eq!(by_name.len(), 1);
    assert!(by_issue.is_empty());
    names.assert_async().await;
    issues.assert_async().await;
}

#[tokio::test]
async fn commits_are_fetched_once_per_repository() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/repos/octocat/hello-world/commits")
        .with_body(json!([commit_json("123abc")]).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let commits = client.list_commits("octocat", "hello-world").await.unwrap();
    let again = client.list_commits("octocat", "hello-world").await.unwrap();

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].sha, "123abc");
    assert_eq!(commits[0].commit.author.name, "Octocat");
    assert_eq!(commits[0].commit.message, "Initial commit");
    assert_eq!(again.len(), 1);
    m.assert_async().await;
}

#[tokio::test]
async fn commit_author_account_may_be_absent() {
    let mut server = Server::new_async().await;
    let mut body = commit_json("456def");
    body["author"] = json!(null);
    let _m = server
        .mock("GET", "/repos/octocat/hello-world/commits")
        .with_body(json!([body]).to_string())
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let commits = client.list_commits("octocat", "hello-world").await.unwrap();

    assert!(commits[0].author.is_none());
}

#[tokio::test]
async fn bearer_token_is_attached_when_configured() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/repos/octocat/hello-world/commits")
        .match_header("authorization", "Bearer sekrit")
        .with_body("[]")
        .create_async()
        .await;

    let client =
        GitHubClient::with_base_url(Some("sekrit".to_string()), server.url()).unwrap();
    client.list_commits("octocat", "hello-world").await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn requests_are_unauthenticated_without_a_token() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/repos/octocat/hello-world/commits")
        .match_header("authorization", Matcher::Missing)
        .with_body("[]")
        .create_async()
        .await;

    // An empty credential counts as no credential.
    let client = GitHubClient::with_base_url(Some(String::new()), server.url()).unwrap();
    client.list_commits("octocat", "hello-world").await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn non_success_status_maps_to_a_status_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body("rate limited")
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    let err = client
        .search_repositories("rust", None, None)
        .await
        .unwrap_err();

    match err {
        GitHubError::Status { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn a_failed_search_is_not_memoized() {
    let mut server = Server::new_async().await;
    let failure = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded("q".into(), "flaky".into()))
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, server.url()).unwrap();
    assert!(client.search_repositories("flaky", None, None).await.is_err());
    // A memoized failure would be replayed without a second request.
    assert!(client.search_repositories("flaky", None, None).await.is_err());
    failure.assert_async().await;
}
