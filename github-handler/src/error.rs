use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("github resource not found: {0}")]
    NotFound(String),

    /// HTTP 202: github 仍在后台计算统计数据
    #[error("github is still computing {0}, please try again later")]
    Pending(String),

    #[error("github api returned {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("github api request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode github response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid github url: {0}")]
    Url(#[from] url::ParseError),
}
