use super::PassContext;
use crate::error::Result;
use crate::pagination::{next_page, total_count};
use chrono::Duration;
use model::github::Release;

const RELEASE_PAGE_SIZE: u32 = 100;

/// 回溯窗口内创建的 release 数量.
/// 窗口内没有 release 时按 tag 总数 / 仓库天数 * 窗口天数 估算.
pub async fn recent_releases(ctx: &PassContext<'_>) -> Result<u64> {
    let endpoint = ctx.repo_endpoint("releases");
    let mut releases: Vec<Release> = Vec::new();
    let mut page_number = 1;
    loop {
        let page = ctx
            .api
            .list_paged(&endpoint, &[], page_number, RELEASE_PAGE_SIZE)
            .await?;
        releases.extend(page.decode::<Release>()?);
        match next_page(&page) {
            Some(next) => page_number = next,
            None => break,
        }
    }

    let lookback_days = ctx.settings.release_lookback_days;
    let lookback = Duration::days(lookback_days);
    let recent = releases
        .iter()
        .filter(|r| ctx.now - r.created_at <= lookback)
        .count() as u64;
    if recent > 0 {
        return Ok(recent);
    }

    let days_since_creation = (ctx.now - ctx.repo.created_at).num_days();
    if days_since_creation <= 0 {
        return Ok(0);
    }
    let tags = ctx
        .api
        .list_paged(&ctx.repo_endpoint("tags"), &[], 1, 1)
        .await?;
    Ok(estimate_releases(
        total_count(&tags),
        days_since_creation,
        lookback_days,
    ))
}

pub fn estimate_releases(tag_count: u64, days_since_creation: i64, lookback_days: i64) -> u64 {
    if days_since_creation <= 0 {
        return 0;
    }
    (tag_count as f64 / days_since_creation as f64 * lookback_days as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{last_link, repository, MockApi};
    use crate::pass::tests::{context, settings};
    use chrono::{SecondsFormat, Utc};
    use serde_json::json;

    fn release(days_ago: i64) -> serde_json::Value {
        let created = (Utc::now() - Duration::days(days_ago)).to_rfc3339_opts(SecondsFormat::Secs, true);
        json!({"id": days_ago, "tag_name": format!("v{}", days_ago), "created_at": created})
    }

    fn next_link(page: u32) -> Option<String> {
        Some(format!(
            "<https://api.github.com/repositories/1/releases?per_page=100&page={}>; rel=\"next\"",
            page
        ))
    }

    #[tokio::test]
    async fn test_counts_releases_across_pages() {
        let api = MockApi::new()
            .with_page("repos/o/n/releases", vec![release(10), release(400)], next_link(2))
            .with_page("repos/o/n/releases", vec![release(200), release(800)], None);
        let repo = repository("o", "n", Utc::now() - Duration::days(3000));
        let settings = settings();
        assert_eq!(recent_releases(&context(&api, &repo, &settings)).await.unwrap(), 2);
        assert!(api.calls().iter().all(|c| !c.starts_with("repos/o/n/tags")));
    }

    #[tokio::test]
    async fn test_falls_back_to_tag_estimate() {
        let api = MockApi::new()
            .with_page("repos/o/n/releases", vec![release(500)], None)
            .with_page("repos/o/n/tags", vec![json!({"name": "v1"})], last_link(40));
        let repo = repository("o", "n", Utc::now() - Duration::days(730));
        let settings = settings();
        // 40 / 730 * 365 = 20
        assert_eq!(recent_releases(&context(&api, &repo, &settings)).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_new_repository_without_releases() {
        let api = MockApi::new();
        let repo = repository("o", "n", Utc::now());
        let settings = settings();
        assert_eq!(recent_releases(&context(&api, &repo, &settings)).await.unwrap(), 0);
    }

    #[test]
    fn test_estimate_releases() {
        assert_eq!(estimate_releases(0, 100, 365), 0);
        assert_eq!(estimate_releases(10, 3650, 365), 1);
        assert_eq!(estimate_releases(10, 0, 365), 0);
    }
}
