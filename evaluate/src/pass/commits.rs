use super::PassContext;
use crate::error::Result;
use crate::score::round_to;
use github_handler::ApiError;
use model::github::WeekActivity;

const WEEKS_PER_YEAR: f64 = 52.0;

/// 最近一年的周均提交数, 保留 1 位小数.
/// github 仍在计算统计数据时返回 `MetricComputationPending`.
pub async fn commit_frequency(ctx: &PassContext<'_>) -> Result<f64> {
    let value = ctx
        .api
        .fetch_single(&ctx.repo_endpoint("stats/commit_activity"), &[])
        .await?;
    let weeks: Vec<WeekActivity> = serde_json::from_value(value).map_err(ApiError::from)?;
    let total: u64 = weeks.iter().map(|w| w.total).sum();
    Ok(round_to(total as f64 / WEEKS_PER_YEAR, 1))
}
