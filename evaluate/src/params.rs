use crate::error::{Result, ScoreError};
use std::str::FromStr;

/// 用户自定义指标 `value:weight:max_threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditionalParam {
    pub value: f64,
    pub weight: f64,
    pub max_threshold: f64,
}

impl FromStr for AdditionalParam {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(ScoreError::InvalidAdditionalParam(format!(
                "{:?}: param string should have 3 values (value:weight:max_threshold)",
                s
            )));
        }
        let field = |raw: &str, what: &str| -> Result<f64> {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ScoreError::InvalidAdditionalParam(format!(
                        "{:?}: param {} should be a finite float",
                        s, what
                    ))
                })
        };
        Ok(Self {
            value: field(parts[0], "value")?,
            weight: field(parts[1], "weight")?,
            max_threshold: field(parts[2], "max_threshold")?,
        })
    }
}

/// 任意一个参数格式错误则整体失败
pub fn parse_additional_params<S: AsRef<str>>(raw: &[S]) -> Result<Vec<AdditionalParam>> {
    raw.iter().map(|s| s.as_ref().parse()).collect()
}
