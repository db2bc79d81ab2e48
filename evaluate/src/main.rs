use anyhow::{Context, Result};
use clap::Parser;
use evaluate::config::EvaluationContext;
use evaluate::render::{render, OutputFormat};
use evaluate::EvaluationManager;
use github_handler::GitHubClient;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// gives criticality score for an open source project
#[derive(Debug, Parser)]
#[command(name = "criticality_score", version, about)]
struct Args {
    /// repository url, e.g. https://github.com/kubernetes/kubernetes
    #[arg(long)]
    repo: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Default)]
    format: OutputFormat,

    /// additional parameter in form <value>:<weight>:<max_threshold>
    #[arg(long = "param", value_name = "VALUE:WEIGHT:MAX_THRESHOLD")]
    params: Vec<String>,

    /// config file (toml)
    #[arg(long)]
    config: Option<String>,

    #[arg(long, env = "GITHUB_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

fn init_logger() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志记录器
    init_logger();
    let args = Args::parse();

    // 加载配置
    let mut ctx = EvaluationContext::load_config(args.config.as_deref())?;
    if args.token.is_some() {
        ctx.github.token = args.token.clone();
    }
    if ctx.github.token.is_none() {
        warn!("env variable GITHUB_AUTH_TOKEN not provided");
    }

    let client = GitHubClient::new(&ctx.github.api_url, ctx.github.token.clone())
        .context("Failed to build github client")?;
    let manager = EvaluationManager::new(ctx);

    // 参数错误时不发起任何请求, 随后先检查配额再解析仓库
    let record = manager
        .score_repository(&client, &args.repo, args.params.as_slice())
        .await?;

    render(&record, args.format, std::io::stdout().lock())?;
    Ok(())
}
