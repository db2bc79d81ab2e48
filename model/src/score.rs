use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// `date` 命令的时间格式, 如 `Mon Jan  2 15:04:05 UTC 2006`
pub const SCORED_ON_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// 单个仓库的九项原始指标
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct MetricSet {
    pub created_since: u64,
    pub updated_since: u64,
    pub contributor_count: u64,
    pub org_count: u64,
    pub commit_frequency: f64,
    pub recent_releases_count: u64,
    pub closed_issues_count: u64,
    pub updated_issues_count: u64,
    pub comment_frequency: f64,
    pub dependents_count: u64,
}

/// 最终评分结果
#[derive(Debug, Serialize, Clone)]
pub struct ScoreRecord {
    pub name: String,
    pub url: String,
    pub language: String,
    #[serde(flatten)]
    pub metrics: MetricSet,
    pub criticality_score: f64,
    #[serde(serialize_with = "serialize_scored_on")]
    pub scored_on: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn scored_on_display(&self) -> String {
        self.scored_on.format(SCORED_ON_FORMAT).to_string()
    }
}

fn serialize_scored_on<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&value.format(SCORED_ON_FORMAT))
}
