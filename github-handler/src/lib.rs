//! GitHub REST 访问层.
//!
//! `GitHubApi` 是 evaluate 需要的全部远程能力, `GitHubClient` 是基于 reqwest 的实现.

pub mod client;
pub mod error;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::github::Repository;
use serde::de::DeserializeOwned;

pub use client::GitHubClient;
pub use error::ApiError;

/// 查询参数, 如 `("state", "closed")`
pub type Query<'a> = [(&'a str, String)];

/// 分页接口的单页响应
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<serde_json::Value>,
    /// 原始 `Link` 响应头
    pub link: Option<String>,
}

impl Page {
    pub fn new(items: Vec<serde_json::Value>, link: Option<String>) -> Self {
        Self { items, link }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        self.items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).map_err(ApiError::from))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaStatus {
    pub remaining: u64,
    pub reset_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn resolve_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError>;

    async fn quota_status(&self) -> Result<QuotaStatus, ApiError>;

    /// `endpoint` 相对于 api 根路径, 如 `repos/rust-lang/rust/contributors`
    async fn list_paged(
        &self,
        endpoint: &str,
        query: &Query<'_>,
        page: u32,
        per_page: u32,
    ) -> Result<Page, ApiError>;

    async fn fetch_single(
        &self,
        endpoint: &str,
        query: &Query<'_>,
    ) -> Result<serde_json::Value, ApiError>;

    /// 绝对地址的原始页面, 用于网页抓取
    async fn fetch_text(&self, url: &str) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::github::Contributor;
    use serde_json::json;

    #[test]
    fn test_page_decode() {
        let page = Page::new(
            vec![json!({"login": "a", "id": 1, "contributions": 10})],
            None,
        );
        let contributors: Vec<Contributor> = page.decode().unwrap();
        assert_eq!(contributors[0].contributions, 10);
    }

    #[test]
    fn test_page_decode_error() {
        let page = Page::new(vec![json!({"login": "a"})], None);
        let result = page.decode::<Contributor>();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
