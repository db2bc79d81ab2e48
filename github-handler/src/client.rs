use crate::error::ApiError;
use crate::{GitHubApi, Page, Query, QuotaStatus};
use async_trait::async_trait;
use model::github::{GitHubErrorResponse, RateLimitResponse, Repository};
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("criticality-score/", env!("CARGO_PKG_VERSION"));

/// 基于 reqwest 的 GitHub REST 客户端
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        // join 相对路径时需要以 `/` 结尾
        let api_url = if api_url.ends_with('/') {
            Url::parse(api_url)?
        } else {
            Url::parse(&format!("{}/", api_url))?
        };
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn endpoint(&self, path: &str, query: &Query<'_>) -> Result<Url, ApiError> {
        let mut url = self.api_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_api(&self, url: Url) -> Result<Response, ApiError> {
        debug!("GET {}", url);
        let mut request = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        check_status(url, response).await
    }
}

async fn check_status(url: Url, response: Response) -> Result<Response, ApiError> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::ACCEPTED => Err(ApiError::Pending(url.path().to_owned())),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(url.path().to_owned())),
        status => {
            let message = response
                .json::<GitHubErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            })
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn resolve_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError> {
        let url = self.endpoint(&format!("repos/{}/{}", owner, name), &[])?;
        Ok(self.get_api(url).await?.json::<Repository>().await?)
    }

    async fn quota_status(&self) -> Result<QuotaStatus, ApiError> {
        let url = self.endpoint("rate_limit", &[])?;
        let limits = self.get_api(url).await?.json::<RateLimitResponse>().await?;
        Ok(QuotaStatus {
            remaining: limits.resources.core.remaining,
            reset_at: limits.resources.core.reset_at(),
        })
    }

    async fn list_paged(
        &self,
        endpoint: &str,
        query: &Query<'_>,
        page: u32,
        per_page: u32,
    ) -> Result<Page, ApiError> {
        let mut url = self.endpoint(endpoint, query)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        let response = self.get_api(url).await?;
        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let items = response.json::<Vec<serde_json::Value>>().await?;
        Ok(Page::new(items, link))
    }

    async fn fetch_single(
        &self,
        endpoint: &str,
        query: &Query<'_>,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(endpoint, query)?;
        Ok(self.get_api(url).await?.json::<serde_json::Value>().await?)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ApiError> {
        let url = Url::parse(url)?;
        debug!("GET {}", url);
        let response = self.http.get(url.clone()).send().await?;
        let response = check_status(url, response).await?;
        Ok(response.text().await?)
    }
}
