use super::PassContext;
use crate::error::Result;
use crate::pagination::total_count;
use crate::score::round_to;

/// 窗口内关闭的 issue 数
pub async fn closed_issues(ctx: &PassContext<'_>) -> Result<u64> {
    issue_count(ctx, "closed").await
}

/// 窗口内有更新的 issue 数
pub async fn updated_issues(ctx: &PassContext<'_>) -> Result<u64> {
    issue_count(ctx, "all").await
}

async fn issue_count(ctx: &PassContext<'_>, state: &str) -> Result<u64> {
    let query = [
        ("state", state.to_owned()),
        ("since", ctx.issues_since()),
    ];
    let page = ctx
        .api
        .list_paged(&ctx.repo_endpoint("issues"), &query, 1, 1)
        .await?;
    Ok(total_count(&page))
}

/// 窗口内评论数 / 更新的 issue 数, 保留 1 位小数
pub async fn comment_frequency(ctx: &PassContext<'_>, issue_count: u64) -> Result<f64> {
    if issue_count == 0 {
        return Ok(0.0);
    }
    let page = ctx
        .api
        .list_paged(
            &ctx.repo_endpoint("issues/comments"),
            &[("since", ctx.issues_since())],
            1,
            1,
        )
        .await?;
    Ok(round_to(
        total_count(&page) as f64 / issue_count as f64,
        1,
    ))
}
