use crate::config::QuotaConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use github_handler::{GitHubApi, QuotaStatus};
use std::time::Duration;
use tracing::{debug, warn};

/// 在并发拉取指标之前检查一次 API 配额, 不足时整个流程等待到配额重置.
#[derive(Debug, Clone)]
pub struct QuotaGuard {
    floor: u64,
    fallback: Duration,
}

impl QuotaGuard {
    pub fn new(config: &QuotaConfig) -> Self {
        Self {
            floor: config.floor,
            fallback: Duration::from_secs(config.fallback_wait_secs),
        }
    }

    /// 需要等待的时长, `None` 表示配额充足
    pub fn wait_duration(&self, status: &QuotaStatus, now: DateTime<Utc>) -> Option<Duration> {
        if status.remaining >= self.floor {
            return None;
        }
        match status.reset_at {
            Some(reset_at) => (reset_at - now).to_std().ok().filter(|d| !d.is_zero()),
            None => Some(self.fallback),
        }
    }

    pub async fn check(&self, api: &dyn GitHubApi) -> Result<()> {
        let status = api.quota_status().await?;
        debug!("github quota remaining: {}", status.remaining);
        if let Some(wait) = self.wait_duration(&status, Utc::now()) {
            warn!(
                "rate limit nearly exhausted ({} left), sleeping for {} seconds before retry",
                status.remaining,
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;
        }
        Ok(())
    }
}
