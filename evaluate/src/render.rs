use clap::ValueEnum;
use model::score::ScoreRecord;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Default,
    Csv,
    Json,
}

enum FieldValue {
    Text(String),
    Count(u64),
    Ratio(f64),
    Score(f64),
}

impl FieldValue {
    fn plain(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Count(n) => n.to_string(),
            FieldValue::Ratio(v) | FieldValue::Score(v) => v.to_string(),
        }
    }

    fn csv(&self) -> String {
        match self {
            FieldValue::Ratio(v) => format!("{:.1}", v),
            FieldValue::Score(v) => format!("{:.5}", v),
            other => other.plain(),
        }
    }
}

type Accessor = fn(&ScoreRecord) -> FieldValue;

/// 输出字段及顺序
fn fields() -> [(&'static str, Accessor); 15] {
    [
        ("name", |r| FieldValue::Text(r.name.clone())),
        ("url", |r| FieldValue::Text(r.url.clone())),
        ("language", |r| FieldValue::Text(r.language.clone())),
        ("created_since", |r| FieldValue::Count(r.metrics.created_since)),
        ("updated_since", |r| FieldValue::Count(r.metrics.updated_since)),
        ("contributor_count", |r| FieldValue::Count(r.metrics.contributor_count)),
        ("org_count", |r| FieldValue::Count(r.metrics.org_count)),
        ("commit_frequency", |r| FieldValue::Ratio(r.metrics.commit_frequency)),
        ("recent_releases_count", |r| FieldValue::Count(r.metrics.recent_releases_count)),
        ("closed_issues_count", |r| FieldValue::Count(r.metrics.closed_issues_count)),
        ("updated_issues_count", |r| FieldValue::Count(r.metrics.updated_issues_count)),
        ("comment_frequency", |r| FieldValue::Ratio(r.metrics.comment_frequency)),
        ("dependents_count", |r| FieldValue::Count(r.metrics.dependents_count)),
        ("criticality_score", |r| FieldValue::Score(r.criticality_score)),
        ("scored_on", |r| FieldValue::Text(r.scored_on_display())),
    ]
}

pub fn render<W: Write>(record: &ScoreRecord, format: OutputFormat, mut out: W) -> anyhow::Result<()> {
    match format {
        OutputFormat::Default => {
            for (name, value) in fields() {
                writeln!(out, "{}: {}", name, value(record).plain())?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for (name, value) in fields() {
                writer.write_record([name, value(record).csv().as_str()])?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
