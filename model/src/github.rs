use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// GitHub 仓库信息结构 (GET /repos/{owner}/{repo})
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub owner: Owner,
    pub html_url: String,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Repository {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Owner {
    pub login: String,
}

// GitHub用户信息结构
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "type", default)]
    pub user_type: String,
}

// 贡献者信息结构, 匿名贡献者没有 login/id
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Contributor {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub login: Option<String>,
    pub contributions: i64,
}

// 解析提交数据
#[derive(Debug, Deserialize, Clone)]
pub struct CommitInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommitDetail {
    pub author: Option<CommitInfo>,
    pub committer: Option<CommitInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommitData {
    pub sha: String,
    pub commit: CommitDetail,
}

impl CommitData {
    /// 提交时间, 优先取 author
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.commit
            .author
            .as_ref()
            .and_then(|a| a.date)
            .or_else(|| self.commit.committer.as_ref().and_then(|c| c.date))
    }
}

// 每周提交统计 (GET /repos/{owner}/{repo}/stats/commit_activity)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WeekActivity {
    pub total: u64,
    #[serde(default)]
    pub week: i64,
    #[serde(default)]
    pub days: Vec<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Release {
    pub id: i64,
    #[serde(default)]
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
}

// GET /rate_limit
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitResources {
    pub core: RateLimit,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// epoch seconds
    pub reset: i64,
}

impl RateLimit {
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset, 0).single()
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}
