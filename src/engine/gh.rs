use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::{
    CheckState, FetchError, MergeStateStatus, MergeableState, PanelKind, PrState, PullRequest,
    Query, QueryFilters, ReviewDecision,
};

use super::interface::{Engine, EngineHandle, Event, Request};

// ---------------------------------------------------------------------------
// GraphQL query string
// ---------------------------------------------------------------------------

const SEARCH_PULL_REQUESTS_QUERY: &str = r"
query SearchPullRequests($q: String!) {
  search(query: $q, type: ISSUE, first: 100) {
    issueCount
    nodes {
      ... on PullRequest {
        title
        url
        author { login }
        repository { nameWithOwner }
        changedFiles
        additions
        deletions
        reviewDecision
        statusCheckRollup { state }
        mergeable
        mergeStateStatus
        isDraft
        state
        totalCommentsCount
        updatedAt
      }
    }
  }
}
";

/// The real backend: runs each search through the GitHub CLI.
pub struct GhEngine {
    program: String,
}

impl Default for GhEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GhEngine {
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    /// Use a different executable in place of `gh`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Engine for GhEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        let handle = EngineHandle::new(tx);
        let _ = std::thread::Builder::new()
            .name("gh-engine".to_owned())
            .spawn(move || {
                let rt = tokio::runtime::Runtime::new().expect("tokio runtime init");
                rt.block_on(self.run_loop(rx));
            });
        handle
    }
}

impl GhEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        while let Some(req) = rx.recv().await {
            match req {
                Request::FetchPrs { query, reply_tx } => {
                    tracing::debug!(
                        "engine: FetchPrs[{}] #{}",
                        query.ticket.kind,
                        query.ticket.seq
                    );
                    let program = self.program.clone();
                    tokio::spawn(async move {
                        let result = fetch_pull_requests(&program, &query).await;
                        match &result {
                            Ok(prs) => tracing::debug!(
                                "engine: sending PrsFetched[{}] count={}",
                                query.ticket.kind,
                                prs.len()
                            ),
                            Err(e) => {
                                tracing::debug!("engine: FetchPrs[{}] error: {e}", query.ticket.kind);
                            }
                        }
                        let _ = reply_tx.send(Event::PrsFetched {
                            ticket: query.ticket,
                            result,
                        });
                    });
                }
                Request::Shutdown => {
                    tracing::debug!("engine: shutting down");
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Search qualifiers for one panel, or `None` when there is nothing to search
/// (the "All" panel with no repositories configured).
pub fn search_string(kind: PanelKind, filters: &QueryFilters) -> Option<String> {
    let mut terms = vec!["is:pr".to_owned()];
    match kind {
        PanelKind::MyPrs => terms.push("author:@me".to_owned()),
        PanelKind::Requested => terms.push("review-requested:@me".to_owned()),
        PanelKind::All => {
            if filters.repositories.is_empty() {
                return None;
            }
            terms.extend(filters.repositories.iter().map(|r| format!("repo:{r}")));
        }
    }
    if !filters.include_drafts {
        terms.push("draft:false".to_owned());
    }
    if !filters.include_closed {
        terms.push("is:open".to_owned());
    }
    Some(terms.join(" "))
}

/// Run the search for `query` with `program` (normally `gh`).
pub async fn fetch_pull_requests(
    program: &str,
    query: &Query,
) -> Result<Vec<PullRequest>, FetchError> {
    let Some(search) = search_string(query.ticket.kind, &query.filters) else {
        return Ok(Vec::new());
    };

    let output = Command::new(program)
        .args(["api", "graphql", "-f"])
        .arg(format!("query={SEARCH_PULL_REQUESTS_QUERY}"))
        .arg("-f")
        .arg(format!("q={search}"))
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        let detail = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_owned()
        } else {
            stderr
        };
        return Err(FetchError::Command {
            status: output.status.to_string(),
            stderr: detail,
        });
    }

    decode_search_response(&output.stdout)
}

// ---------------------------------------------------------------------------
// Response types (mirror the GraphQL response shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphQLResponse<D> {
    data: Option<D>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    search: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    nodes: Vec<Option<RawPullRequest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPullRequest {
    title: String,
    url: String,
    author: Option<RawActor>,
    repository: RawRepository,
    #[serde(default)]
    changed_files: u32,
    #[serde(default)]
    additions: u32,
    #[serde(default)]
    deletions: u32,
    review_decision: Option<ReviewDecision>,
    status_check_rollup: Option<RawCheckRollup>,
    mergeable: Option<MergeableState>,
    merge_state_status: Option<MergeStateStatus>,
    #[serde(default)]
    is_draft: bool,
    state: PrState,
    #[serde(default)]
    total_comments_count: u32,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawActor {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepository {
    name_with_owner: String,
}

#[derive(Debug, Deserialize)]
struct RawCheckRollup {
    state: Option<CheckState>,
}

impl From<RawPullRequest> for PullRequest {
    fn from(raw: RawPullRequest) -> Self {
        Self {
            title: raw.title,
            url: raw.url,
            author: raw.author.map(|a| a.login),
            repository: raw.repository.name_with_owner,
            changed_files: raw.changed_files,
            additions: raw.additions,
            deletions: raw.deletions,
            review_decision: raw.review_decision,
            check_state: raw.status_check_rollup.and_then(|r| r.state),
            mergeable: raw.mergeable,
            merge_state_status: raw.merge_state_status,
            is_draft: raw.is_draft,
            state: raw.state,
            comment_count: raw.total_comments_count,
            updated_at: raw.updated_at,
        }
    }
}

/// Decode the JSON printed by `gh api graphql`, in result order.
pub fn decode_search_response(body: &[u8]) -> Result<Vec<PullRequest>, FetchError> {
    let response: GraphQLResponse<SearchData> = serde_json::from_slice(body)?;
    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::GraphQl(messages.join("; ")));
    }
    let data = response
        .data
        .ok_or_else(|| FetchError::GraphQl("response contained no data".to_owned()))?;
    Ok(data
        .search
        .nodes
        .into_iter()
        .flatten()
        .map(PullRequest::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FetchTicket;

    fn filters(drafts: bool, closed: bool, repos: &[&str]) -> QueryFilters {
        QueryFilters {
            include_drafts: drafts,
            include_closed: closed,
            repositories: repos.iter().map(|r| (*r).to_owned()).collect(),
        }
    }

    #[test]
    fn search_strings_per_panel() {
        let f = filters(false, false, &["o/a", "o/b"]);
        assert_eq!(
            search_string(PanelKind::MyPrs, &f).unwrap(),
            "is:pr author:@me draft:false is:open"
        );
        assert_eq!(
            search_string(PanelKind::Requested, &f).unwrap(),
            "is:pr review-requested:@me draft:false is:open"
        );
        assert_eq!(
            search_string(PanelKind::All, &f).unwrap(),
            "is:pr repo:o/a repo:o/b draft:false is:open"
        );
    }

    #[test]
    fn inclusion_flags_drop_qualifiers() {
        assert_eq!(
            search_string(PanelKind::MyPrs, &filters(true, true, &[])).unwrap(),
            "is:pr author:@me"
        );
        assert_eq!(
            search_string(PanelKind::MyPrs, &filters(true, false, &[])).unwrap(),
            "is:pr author:@me is:open"
        );
    }

    #[test]
    fn all_panel_without_repositories_has_no_search() {
        assert_eq!(search_string(PanelKind::All, &filters(false, false, &[])), None);
    }

    #[test]
    fn all_panel_without_repositories_skips_the_command() {
        let query = Query {
            ticket: FetchTicket {
                kind: PanelKind::All,
                seq: 1,
            },
            filters: QueryFilters::default(),
        };
        let rt = tokio::runtime::Runtime::new().unwrap();
        let prs = rt
            .block_on(fetch_pull_requests("gh-my-no-such-program", &query))
            .unwrap();
        assert!(prs.is_empty());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let query = Query {
            ticket: FetchTicket {
                kind: PanelKind::MyPrs,
                seq: 1,
            },
            filters: QueryFilters::default(),
        };
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(fetch_pull_requests("gh-my-no-such-program", &query))
            .unwrap_err();
        assert!(matches!(err, FetchError::Spawn(_)), "{err:?}");
    }

    #[test]
    fn decodes_search_nodes_in_order() {
        let body = br#"{
          "data": { "search": { "issueCount": 2, "nodes": [
            {
              "title": "Add :rocket: launcher",
              "url": "https://github.com/o/r/pull/7",
              "author": { "login": "octocat" },
              "repository": { "nameWithOwner": "o/r" },
              "changedFiles": 2, "additions": 30, "deletions": 4,
              "reviewDecision": "APPROVED",
              "statusCheckRollup": { "state": "SUCCESS" },
              "mergeable": "MERGEABLE",
              "mergeStateStatus": "BEHIND",
              "isDraft": false,
              "state": "OPEN",
              "totalCommentsCount": 3,
              "updatedAt": "2024-05-01T10:00:00Z"
            },
            {
              "title": "Ghost",
              "url": "https://github.com/o/r/pull/8",
              "author": null,
              "repository": { "nameWithOwner": "o/r" },
              "reviewDecision": null,
              "statusCheckRollup": null,
              "mergeable": "UNKNOWN",
              "mergeStateStatus": "SOMETHING_NEW",
              "isDraft": true,
              "state": "MERGED",
              "updatedAt": null
            }
          ] } }
        }"#;
        let prs = decode_search_response(body).unwrap();
        assert_eq!(prs.len(), 2);

        let first = &prs[0];
        assert_eq!(first.title, "Add :rocket: launcher");
        assert_eq!(first.author.as_deref(), Some("octocat"));
        assert_eq!(first.repository, "o/r");
        assert_eq!((first.changed_files, first.additions, first.deletions), (2, 30, 4));
        assert_eq!(first.review_decision, Some(ReviewDecision::Approved));
        assert_eq!(first.check_state, Some(CheckState::Success));
        assert_eq!(first.merge_state_status, Some(MergeStateStatus::Behind));
        assert_eq!(first.comment_count, 3);
        assert!(first.updated_at.is_some());

        let second = &prs[1];
        assert_eq!(second.author, None);
        assert_eq!(second.check_state, None);
        assert_eq!(second.mergeable, Some(MergeableState::Unknown));
        assert_eq!(second.merge_state_status, Some(MergeStateStatus::Unknown));
        assert_eq!(second.state, PrState::Merged);
        assert!(second.is_draft);
    }

    #[test]
    fn graphql_errors_are_joined() {
        let body = br#"{"data": null, "errors": [{"message": "bad"}, {"message": "worse"}]}"#;
        let err = decode_search_response(body).unwrap_err();
        assert_eq!(err.to_string(), "GraphQL error: bad; worse");
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = decode_search_response(b"not json").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
