use crate::config::EvaluationContext;
use crate::error::{Result, ScoreError};
use crate::identifier::parse_repo_url;
use crate::params::{parse_additional_params, AdditionalParam};
use crate::pass::dependents::{CommitResultsExtractor, CountExtractor};
use crate::pass::{age, commits, contributors, dependents, issues, releases, PassContext};
use crate::quota::QuotaGuard;
use crate::score::ScoreEngine;
use chrono::Utc;
use futures::join;
use github_handler::{ApiError, GitHubApi};
use model::github::Repository;
use model::score::{MetricSet, ScoreRecord};
use std::future::Future;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// 并发 pass 共享的错误槽, 只保留第一个错误
#[derive(Debug, Default)]
struct ErrorSlot(OnceLock<ScoreError>);

impl ErrorSlot {
    fn record(&self, err: ScoreError) {
        if let Err(err) = self.0.set(err) {
            debug!("dropping later pass error: {}", err);
        }
    }

    fn into_inner(self) -> Option<ScoreError> {
        self.0.into_inner()
    }
}

/// 执行单个 pass; 失败时写入错误槽并返回默认值
async fn settle<T, F>(slot: &ErrorSlot, name: &'static str, pass: F) -> T
where
    T: Default + std::fmt::Debug,
    F: Future<Output = Result<T>>,
{
    match pass.await {
        Ok(value) => {
            debug!("{} = {:?}", name, value);
            value
        }
        Err(err) => {
            warn!("{} failed: {}", name, err);
            slot.record(err);
            T::default()
        }
    }
}

pub struct EvaluationManager {
    context: EvaluationContext,
    guard: QuotaGuard,
    engine: ScoreEngine,
    extractor: Box<dyn CountExtractor>,
}

impl EvaluationManager {
    pub fn new(context: EvaluationContext) -> Self {
        Self {
            guard: QuotaGuard::new(&context.quota),
            engine: ScoreEngine::new(context.weights, context.thresholds),
            extractor: Box::new(CommitResultsExtractor),
            context,
        }
    }

    /// 替换依赖方数量的解析方式
    pub fn with_extractor(mut self, extractor: impl CountExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub async fn resolve(&self, api: &dyn GitHubApi, identifier: &str) -> Result<Repository> {
        let id = parse_repo_url(identifier, &self.context.github.host)?;
        api.resolve_repository(&id.owner, &id.name)
            .await
            .map_err(|err| match err {
                ApiError::NotFound(_) => {
                    ScoreError::RepositoryNotFound(format!("{}/{}", id.owner, id.name))
                }
                other => other.into(),
            })
    }

    /// 解析 `value:weight:max_threshold` 参数并检查总权重, 不发起任何请求
    pub fn prepare<S: AsRef<str>>(&self, raw_params: &[S]) -> Result<Vec<AdditionalParam>> {
        let params = parse_additional_params(raw_params)?;
        self.engine.check_params(&params)?;
        Ok(params)
    }

    /// 完整流程: 参数检查 -> 配额检查 -> 解析仓库 -> 采集并打分
    pub async fn score_repository<S: AsRef<str>>(
        &self,
        api: &dyn GitHubApi,
        identifier: &str,
        raw_params: &[S],
    ) -> Result<ScoreRecord> {
        let params = self.prepare(raw_params)?;
        self.guard.check(api).await?;
        let repo = self.resolve(api, identifier).await?;
        self.score(api, &repo, &params).await
    }

    /// 对已解析的仓库打分
    pub async fn compute_score(
        &self,
        api: &dyn GitHubApi,
        repo: &Repository,
        params: &[AdditionalParam],
    ) -> Result<ScoreRecord> {
        self.engine.check_params(params)?;
        self.guard.check(api).await?;
        self.score(api, repo, params).await
    }

    async fn score(
        &self,
        api: &dyn GitHubApi,
        repo: &Repository,
        params: &[AdditionalParam],
    ) -> Result<ScoreRecord> {
        let metrics = self.collect_metrics(api, repo).await?;
        let criticality_score = self.engine.criticality_score(&metrics, params);
        info!(
            "Repository {} evaluation completed - criticality score: {}",
            repo.full_name(),
            criticality_score
        );

        Ok(ScoreRecord {
            name: repo.full_name(),
            url: repo.html_url.clone(),
            language: repo.language.clone().unwrap_or_default(),
            metrics,
            criticality_score,
            scored_on: Utc::now(),
        })
    }

    /// 并发执行全部 pass 并等待全部结束; 任一失败则丢弃所有结果
    pub async fn collect_metrics(&self, api: &dyn GitHubApi, repo: &Repository) -> Result<MetricSet> {
        let ctx = PassContext {
            api,
            repo,
            settings: &self.context.providers,
            web_url: &self.context.github.web_url,
            now: Utc::now(),
        };
        let ctx = &ctx;
        let slot = ErrorSlot::default();

        info!("collecting metrics for {}", repo.full_name());
        let (
            created_since,
            updated_since,
            contributor_count,
            org_count,
            commit_frequency,
            recent_releases_count,
            closed_issues_count,
            (updated_issues_count, comment_frequency),
            dependents_count,
        ) = join!(
            settle(&slot, "created_since", async { Ok::<_, ScoreError>(age::created_since(ctx)) }),
            settle(&slot, "updated_since", age::updated_since(ctx)),
            settle(&slot, "contributor_count", contributors::contributor_count(ctx)),
            settle(&slot, "org_count", contributors::org_count(ctx)),
            settle(&slot, "commit_frequency", commits::commit_frequency(ctx)),
            settle(&slot, "recent_releases_count", releases::recent_releases(ctx)),
            settle(&slot, "closed_issues_count", issues::closed_issues(ctx)),
            async {
                // comment_frequency 依赖 updated_issues_count, 同一单元内顺序执行
                let updated = settle(&slot, "updated_issues_count", issues::updated_issues(ctx)).await;
                let frequency = settle(
                    &slot,
                    "comment_frequency",
                    issues::comment_frequency(ctx, updated),
                )
                .await;
                (updated, frequency)
            },
            settle(&slot, "dependents_count", async {
                Ok::<_, ScoreError>(dependents::dependents_count(ctx, self.extractor.as_ref()).await)
            }),
        );

        // 所有单元结束后才检查错误槽
        if let Some(err) = slot.into_inner() {
            return Err(err);
        }

        Ok(MetricSet {
            created_since,
            updated_since,
            contributor_count,
            org_count,
            commit_frequency,
            recent_releases_count,
            closed_issues_count,
            updated_issues_count,
            comment_frequency,
            dependents_count,
        })
    }
}
