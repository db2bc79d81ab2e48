//! 九个指标 pass, 每个都是对 GitHub API 的独立读取.

pub mod age;
pub mod commits;
pub mod contributors;
pub mod dependents;
pub mod issues;
pub mod releases;

use crate::config::ProviderConfig;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use github_handler::GitHubApi;
use model::github::Repository;

/// 一次评分中所有 pass 共享的只读上下文
pub struct PassContext<'a> {
    pub api: &'a dyn GitHubApi,
    pub repo: &'a Repository,
    pub settings: &'a ProviderConfig,
    pub web_url: &'a str,
    /// 本次评分的基准时间
    pub now: DateTime<Utc>,
}

impl PassContext<'_> {
    /// `repos/{owner}/{name}/{suffix}`
    pub fn repo_endpoint(&self, suffix: &str) -> String {
        format!(
            "repos/{}/{}/{}",
            self.repo.owner.login, self.repo.name, suffix
        )
    }

    /// issue 统计窗口起点, ISO 8601
    pub fn issues_since(&self) -> String {
        (self.now - Duration::days(self.settings.issue_lookback_days))
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// 两个时间点之间的月数 (按 30 天一个月), 四舍五入
pub fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let hours = (to - from).num_seconds() as f64 / 3600.0;
    (hours / 24.0 / 30.0).round().max(0.0) as u64
}
