use anyhow::{ensure, Context};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// 未指定 `--config` 时尝试读取的配置文件
pub const DEFAULT_CONFIG_PATH: &str = "evaluate/config";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub web_url: String,
    /// 仓库地址允许的唯一 host
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// 每项指标一个数值, 同时用作权重表和阈值表
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct MetricTable {
    pub created_since: f64,
    pub updated_since: f64,
    pub contributor_count: f64,
    pub org_count: f64,
    pub commit_frequency: f64,
    pub recent_releases_count: f64,
    pub closed_issues_count: f64,
    pub updated_issues_count: f64,
    pub comment_frequency: f64,
    pub dependents_count: f64,
}

impl MetricTable {
    pub const NAMES: [&'static str; 10] = [
        "created_since",
        "updated_since",
        "contributor_count",
        "org_count",
        "commit_frequency",
        "recent_releases_count",
        "closed_issues_count",
        "updated_issues_count",
        "comment_frequency",
        "dependents_count",
    ];

    pub fn default_weights() -> Self {
        Self {
            created_since: 1.0,
            updated_since: -1.0,
            contributor_count: 2.0,
            org_count: 1.0,
            commit_frequency: 1.0,
            recent_releases_count: 0.5,
            closed_issues_count: 0.5,
            updated_issues_count: 0.5,
            comment_frequency: 1.0,
            dependents_count: 2.0,
        }
    }

    pub fn default_thresholds() -> Self {
        Self {
            created_since: 120.0,
            updated_since: 120.0,
            contributor_count: 5000.0,
            org_count: 10.0,
            commit_frequency: 1000.0,
            recent_releases_count: 26.0,
            closed_issues_count: 5000.0,
            updated_issues_count: 5000.0,
            comment_frequency: 15.0,
            dependents_count: 500000.0,
        }
    }

    /// 与 `NAMES` 顺序一致
    pub fn values(&self) -> [f64; 10] {
        [
            self.created_since,
            self.updated_since,
            self.contributor_count,
            self.org_count,
            self.commit_frequency,
            self.recent_releases_count,
            self.closed_issues_count,
            self.updated_issues_count,
            self.comment_frequency,
            self.dependents_count,
        ]
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuotaConfig {
    /// 剩余配额低于该值时暂停
    pub floor: u64,
    /// 拿不到重置时间时的等待秒数
    pub fallback_wait_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub top_contributor_count: usize,
    pub contributor_cap: usize,
    pub placeholder_org_count: u64,
    pub issue_lookback_days: i64,
    pub release_lookback_days: i64,
    pub dependents_attempts: u32,
    pub dependents_retry_delay_secs: u64,
}

/// 评价上下文结构体
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EvaluationContext {
    pub github: GitHubConfig,
    pub weights: MetricTable,
    pub thresholds: MetricTable,
    pub quota: QuotaConfig,
    pub providers: ProviderConfig,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self {
            github: GitHubConfig {
                api_url: "https://api.github.com".to_owned(),
                web_url: "https://github.com".to_owned(),
                host: "github.com".to_owned(),
                token: None,
            },
            weights: MetricTable::default_weights(),
            thresholds: MetricTable::default_thresholds(),
            quota: QuotaConfig {
                floor: 50,
                fallback_wait_secs: 3600,
            },
            providers: ProviderConfig {
                top_contributor_count: 15,
                contributor_cap: 5000,
                placeholder_org_count: 10,
                issue_lookback_days: 90,
                release_lookback_days: 365,
                dependents_attempts: 3,
                dependents_retry_delay_secs: 10,
            },
        }
    }
}

impl EvaluationContext {
    /// 默认值 < 配置文件 < `CRITICALITY__*` 环境变量.
    /// 显式传入的文件必须存在, 默认路径下的文件可以缺失.
    pub fn load_config(config_path: Option<&str>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&EvaluationContext::default())
            .with_context(|| anyhow::anyhow!("Failed to build default config"))?;
        let ctx: Self = Config::builder()
            .add_source(defaults)
            .add_source(
                File::with_name(config_path.unwrap_or(DEFAULT_CONFIG_PATH))
                    .format(FileFormat::Toml)
                    .required(config_path.is_some()),
            )
            .add_source(
                Environment::with_prefix("CRITICALITY")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()
            .with_context(|| anyhow::anyhow!("Failed to load config"))?
            .try_deserialize()
            .with_context(|| anyhow::anyhow!("Failed to deserialize config"))?;
        ctx.validate()?;
        Ok(ctx)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.weights.updated_since < 0.0,
            "weights.updated_since must be negative"
        );
        for (name, weight) in MetricTable::NAMES.iter().zip(self.weights.values()) {
            if *name != "updated_since" {
                ensure!(weight >= 0.0, "weights.{} must not be negative", name);
            }
        }
        for (name, threshold) in MetricTable::NAMES.iter().zip(self.thresholds.values()) {
            ensure!(threshold > 0.0, "thresholds.{} must be positive", name);
        }
        ensure!(
            self.providers.dependents_attempts > 0,
            "providers.dependents_attempts must be at least 1"
        );
        Ok(())
    }
}
