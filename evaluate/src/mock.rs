//! 测试用的 `GitHubApi` 实现, 按 endpoint 预置响应并记录所有调用.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use github_handler::{ApiError, GitHubApi, Page, Query, QuotaStatus};
use model::github::{Owner, Repository};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub(crate) enum MockReply {
    Json(Value),
    Pending,
    Status(u16),
}

pub(crate) struct MockApi {
    repo: Option<Repository>,
    quota: QuotaStatus,
    pages: HashMap<String, Vec<Page>>,
    singles: HashMap<String, MockReply>,
    texts: Mutex<VecDeque<Result<String, u16>>>,
    calls: Mutex<Vec<String>>,
}

pub(crate) fn repository(owner: &str, name: &str, created_at: DateTime<Utc>) -> Repository {
    Repository {
        id: 1,
        name: name.to_owned(),
        owner: Owner {
            login: owner.to_owned(),
        },
        html_url: format!("https://github.com/{}/{}", owner, name),
        language: Some("Rust".to_owned()),
        created_at,
    }
}

/// `endpoint?k=v`, 忽略随时间变化的 `since`
fn key(endpoint: &str, query: &Query<'_>) -> String {
    let pairs: Vec<String> = query
        .iter()
        .filter(|(k, _)| *k != "since")
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    if pairs.is_empty() {
        endpoint.to_owned()
    } else {
        format!("{}?{}", endpoint, pairs.join("&"))
    }
}

/// 只有 `rel="last"` 的 Link 头
pub(crate) fn last_link(page: u32) -> Option<String> {
    Some(format!(
        "<https://api.github.com/repositories/1/items?per_page=1&page={}>; rel=\"last\"",
        page
    ))
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            repo: None,
            quota: QuotaStatus {
                remaining: 5000,
                reset_at: None,
            },
            pages: HashMap::new(),
            singles: HashMap::new(),
            texts: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_repo(mut self, repo: Repository) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn with_quota(mut self, quota: QuotaStatus) -> Self {
        self.quota = quota;
        self
    }

    /// 依次追加第 1, 2, ... 页
    pub fn with_page(mut self, key: &str, items: Vec<Value>, link: Option<String>) -> Self {
        self.pages
            .entry(key.to_owned())
            .or_default()
            .push(Page::new(items, link));
        self
    }

    pub fn with_single(mut self, key: &str, reply: MockReply) -> Self {
        self.singles.insert(key.to_owned(), reply);
        self
    }

    pub fn with_text(self, reply: Result<String, u16>) -> Self {
        self.texts.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn status_error(status: u16, url: &str) -> ApiError {
    ApiError::Status {
        status,
        url: url.to_owned(),
        message: "mock failure".to_owned(),
    }
}

#[async_trait]
impl GitHubApi for MockApi {
    async fn resolve_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError> {
        let endpoint = format!("repos/{}/{}", owner, name);
        self.record(endpoint.clone());
        self.repo
            .clone()
            .filter(|r| r.owner.login == owner && r.name == name)
            .ok_or(ApiError::NotFound(endpoint))
    }

    async fn quota_status(&self) -> Result<QuotaStatus, ApiError> {
        self.record("rate_limit".to_owned());
        Ok(self.quota)
    }

    async fn list_paged(
        &self,
        endpoint: &str,
        query: &Query<'_>,
        page: u32,
        per_page: u32,
    ) -> Result<Page, ApiError> {
        let key = key(endpoint, query);
        self.record(format!("{} page={} per_page={}", key, page, per_page));
        if let Some(MockReply::Status(status)) = self.singles.get(&key) {
            return Err(status_error(*status, &key));
        }
        Ok(self
            .pages
            .get(&key)
            .and_then(|pages| pages.get(page as usize - 1))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_single(&self, endpoint: &str, query: &Query<'_>) -> Result<Value, ApiError> {
        let key = key(endpoint, query);
        self.record(key.clone());
        match self.singles.get(&key) {
            Some(MockReply::Json(value)) => Ok(value.clone()),
            Some(MockReply::Pending) => Err(ApiError::Pending(key)),
            Some(MockReply::Status(status)) => Err(status_error(*status, &key)),
            None => Err(ApiError::NotFound(key)),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ApiError> {
        self.record(url.to_owned());
        match self.texts.lock().unwrap().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(status_error(status, url)),
            None => Err(status_error(503, url)),
        }
    }
}
