use crate::error::{Result, ScoreError};
use url::Url;

/// 仓库标识 `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentifier {
    pub owner: String,
    pub name: String,
}

/// 解析仓库地址, 如 `github.com/rust-lang/rust` 或 `https://github.com/rust-lang/rust`.
/// 没有 scheme 时按 https 处理, host 必须与 `host` 完全一致.
pub fn parse_repo_url(input: &str, host: &str) -> Result<RepoIdentifier> {
    let invalid = || ScoreError::InvalidIdentifier(input.to_owned());

    let raw = if input.contains("://") {
        input.to_owned()
    } else {
        format!("https://{}", input)
    };
    let url = Url::parse(&raw).map_err(|_| invalid())?;
    if url.host_str() != Some(host) {
        return Err(invalid());
    }

    let mut segments = url.path_segments().ok_or_else(invalid)?;
    match (segments.next(), segments.next()) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => Ok(RepoIdentifier {
            owner: owner.to_owned(),
            name: name.to_owned(),
        }),
        _ => Err(invalid()),
    }
}
