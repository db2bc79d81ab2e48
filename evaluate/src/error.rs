use github_handler::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("invalid github url: {0}")]
    InvalidIdentifier(String),

    #[error("repo not found: {0}")]
    RepositoryNotFound(String),

    #[error("github api response error, please try again: {0}")]
    ApiResponse(#[source] ApiError),

    /// github 返回 202, 整个评分需要稍后重试
    #[error("{0}")]
    MetricComputationPending(String),

    #[error("invalid param format: {0}")]
    InvalidAdditionalParam(String),
}

impl From<ApiError> for ScoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Pending(_) => ScoreError::MetricComputationPending(err.to_string()),
            other => ScoreError::ApiResponse(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_maps_to_metric_computation_pending() {
        let err: ScoreError = ApiError::Pending("/repos/a/b/stats/commit_activity".into()).into();
        assert!(matches!(err, ScoreError::MetricComputationPending(_)));
        assert!(err.to_string().contains("please try again later"));
    }

    #[test]
    fn test_other_errors_map_to_api_response() {
        let err: ScoreError = ApiError::Status {
            status: 502,
            url: "https://api.github.com/rate_limit".into(),
            message: String::new(),
        }
        .into();
        assert!(matches!(err, ScoreError::ApiResponse(_)));
    }
}
