use std::sync::Arc;

use anyhow::Context;
use exam_editor::{
    config::{get_config, init_config, LogFormat},
    services::remote::HttpBoundary,
    Session, SessionScript,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let path = std::env::args()
        .nth(1)
        .context("usage: exam-editor <session.json>")?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("could not read session script {}", path))?;
    let script = SessionScript::from_json(&raw)?;

    let boundary = HttpBoundary::from_config(config)?;
    info!(base_url = %config.remote_base_url, steps = script.steps.len(), "replaying session");

    let mut session = Session::new(Arc::new(boundary), &script);
    session.run(&script.steps).await;

    println!("{}", serde_json::to_string_pretty(&session.report())?);
    Ok(())
}
