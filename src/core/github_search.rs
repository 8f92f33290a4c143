use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::config::FinderConfig;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<RepoItemRaw>,
}

#[derive(Debug, Deserialize)]
struct RepoItemRaw {
    name: String,
    owner: OwnerRaw,
    #[serde(default)]
    stargazers_count: u64,
}

#[derive(Debug, Deserialize)]
struct OwnerRaw {
    login: String,
    avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoItem {
    pub name: String,
    pub owner_login: String,
    pub owner_avatar_url: String,
    pub stars: u64,
}

impl RepoItem {
    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner_login, self.name)
    }

    pub fn owner_url(&self) -> String {
        format!("https://github.com/{}", self.owner_login)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// `None` leaves paging to the API defaults.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub items: Vec<RepoItem>,
    pub total_count: Option<u64>,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SearchPage),
    /// GitHub answered 422: the query cannot be processed.
    Unprocessable,
}

/// Anything that can answer a repository search. The widget never does IO itself.
pub trait SearchBackend: Send + Sync {
    fn search(&self, request: &SearchRequest) -> Result<SearchOutcome>;
}

pub struct GithubSearchClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl GithubSearchClient {
    pub fn new(config: &FinderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: config.api_base.clone(),
            user_agent: config.user_agent.clone(),
        })
    }
}

impl SearchBackend for GithubSearchClient {
    fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        search_github_repos_inner(&self.client, &self.base_url, &self.user_agent, request)
    }
}

pub fn search_url(base_url: &str, request: &SearchRequest) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut url = format!(
        "{}/search/repositories?q={}&sort=stars",
        base_url,
        urlencoding::encode(request.query.trim())
    );
    if let Some(page) = request.page {
        url.push_str(&format!("&page={}", page.max(1)));
    }
    if let Some(per_page) = request.per_page {
        url.push_str(&format!("&per_page={}", per_page.clamp(1, 100)));
    }
    url
}

fn search_github_repos_inner(
    client: &Client,
    base_url: &str,
    user_agent: &str,
    request: &SearchRequest,
) -> Result<SearchOutcome> {
    let url = search_url(base_url, request);
    log::info!("[github_search] GET {}", url);

    let response = client
        .get(url)
        .header("User-Agent", user_agent)
        .header("Accept", "application/vnd.github+json")
        .send()
        .context("GitHub search request failed")?;

    if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
        log::info!(
            "[github_search] query {:?} rejected as unprocessable",
            request.query
        );
        return Ok(SearchOutcome::Unprocessable);
    }

    let response = response
        .error_for_status()
        .context("GitHub search returned error")?;
    let text = response.text().context("read GitHub response")?;
    let result: SearchResponse = serde_json::from_str(&text).context("parse GitHub response")?;

    if result.incomplete_results {
        log::warn!("[github_search] GitHub reported incomplete results");
    }

    Ok(SearchOutcome::Found(SearchPage {
        items: result
            .items
            .into_iter()
            .map(|item| RepoItem {
                name: item.name,
                owner_login: item.owner.login,
                owner_avatar_url: item.owner.avatar_url,
                stars: item.stargazers_count,
            })
            .collect(),
        total_count: result.total_count,
        incomplete: result.incomplete_results,
    }))
}

#[cfg(test)]
#[path = "tests/github_search.rs"]
mod tests;
