use crate::config::MetricTable;
use crate::error::{Result, ScoreError};
use crate::params::AdditionalParam;
use model::score::MetricSet;

/// 对数归一化: `ln(1 + p) / ln(1 + max(p, max_value)) * weight`.
///
/// p = 0 时为 0, p >= max_value 时等于 weight. 分母为 0 (p 与 max_value 都为 0) 时返回 0.
pub fn param_score(value: f64, max_value: f64, weight: f64) -> f64 {
    let denominator = (1.0 + value.max(max_value)).ln();
    if denominator == 0.0 {
        return 0.0;
    }
    (1.0 + value).ln() / denominator * weight
}

/// 四舍五入到 `decimals` 位小数, .5 远离 0
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 与 `MetricTable::NAMES` 顺序一致
pub fn metric_values(metrics: &MetricSet) -> [f64; 10] {
    [
        metrics.created_since as f64,
        metrics.updated_since as f64,
        metrics.contributor_count as f64,
        metrics.org_count as f64,
        metrics.commit_frequency,
        metrics.recent_releases_count as f64,
        metrics.closed_issues_count as f64,
        metrics.updated_issues_count as f64,
        metrics.comment_frequency,
        metrics.dependents_count as f64,
    ]
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine {
    weights: MetricTable,
    thresholds: MetricTable,
}

impl ScoreEngine {
    pub fn new(weights: MetricTable, thresholds: MetricTable) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn total_weight(&self, params: &[AdditionalParam]) -> f64 {
        let fixed: f64 = self.weights.values().iter().sum();
        fixed + params.iter().map(|p| p.weight).sum::<f64>()
    }

    /// 总权重为 0 时无法归一化, 在发起任何请求前拒绝
    pub fn check_params(&self, params: &[AdditionalParam]) -> Result<()> {
        if self.total_weight(params) == 0.0 {
            return Err(ScoreError::InvalidAdditionalParam(
                "additional weights cancel out the total weight".to_owned(),
            ));
        }
        Ok(())
    }

    /// 各指标的加权归一化得分 (未除以总权重)
    pub fn contributions(&self, metrics: &MetricSet) -> [f64; 10] {
        let values = metric_values(metrics);
        let thresholds = self.thresholds.values();
        let weights = self.weights.values();
        std::array::from_fn(|i| param_score(values[i], thresholds[i], weights[i]))
    }

    /// 百分制, 保留 5 位小数. updated_since 权重为负, 理论下界略低于 0.
    pub fn criticality_score(&self, metrics: &MetricSet, params: &[AdditionalParam]) -> f64 {
        let additional: f64 = params
            .iter()
            .map(|p| param_score(p.value, p.max_threshold, p.weight))
            .sum();
        let sum = self
            .contributions(metrics)
            .iter()
            .fold(0.0, |acc, score| acc + score)
            + additional;
        round_to(sum / self.total_weight(params) * 100.0, 5)
    }
}
