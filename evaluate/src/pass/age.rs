use super::{months_between, PassContext};
use crate::error::{Result, ScoreError};
use github_handler::ApiError;
use model::github::CommitData;

/// 创建至今的月数
pub fn created_since(ctx: &PassContext<'_>) -> u64 {
    months_between(ctx.repo.created_at, ctx.now)
}

/// 最近一次提交至今的月数
pub async fn updated_since(ctx: &PassContext<'_>) -> Result<u64> {
    let endpoint = ctx.repo_endpoint("commits");
    let page = ctx.api.list_paged(&endpoint, &[], 1, 1).await?;
    let commits: Vec<CommitData> = page.decode()?;
    let last_commit = commits
        .first()
        .and_then(CommitData::date)
        .ok_or_else(|| ScoreError::ApiResponse(ApiError::NotFound(endpoint)))?;
    Ok(months_between(last_commit, ctx.now))
}
