//! 通过 github 网页搜索估算依赖方数量.
//!
//! 搜索结果页没有公开接口, 解析失败一律记为 0.

use super::PassContext;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

static COMMIT_RESULTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9][0-9,]*)\s+commit results").expect("dependents regex is valid")
});

/// 从搜索结果页提取数量
pub trait CountExtractor: Send + Sync {
    fn extract(&self, page: &str) -> Option<u64>;
}

/// 匹配 `1,234 commit results`
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitResultsExtractor;

impl CountExtractor for CommitResultsExtractor {
    fn extract(&self, page: &str) -> Option<u64> {
        let captures = COMMIT_RESULTS.captures(page)?;
        captures[1].replace(',', "").trim().parse().ok()
    }
}

/// 在 commit message 中搜索 `"owner/name"`
pub fn search_url(web_url: &str, full_name: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("{}/search", web_url.trim_end_matches('/')),
        &[
            ("q", format!("\"{}\"", full_name)),
            ("type", "commits".to_owned()),
        ],
    )
}

pub async fn dependents_count(ctx: &PassContext<'_>, extractor: &dyn CountExtractor) -> u64 {
    let url = match search_url(ctx.web_url, &ctx.repo.full_name()) {
        Ok(url) => url,
        Err(e) => {
            warn!("invalid dependents search url: {}", e);
            return 0;
        }
    };

    let attempts = ctx.settings.dependents_attempts;
    let delay = Duration::from_secs(ctx.settings.dependents_retry_delay_secs);
    let mut content = String::new();
    for attempt in 1..=attempts {
        match ctx.api.fetch_text(url.as_str()).await {
            Ok(body) => {
                content = body;
                break;
            }
            Err(e) => {
                warn!("dependents search attempt {}/{} failed: {}", attempt, attempts, e);
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    let count = extractor.extract(&content);
    debug!("dependents count for {}: {:?}", ctx.repo.full_name(), count);
    count.unwrap_or(0)
}
