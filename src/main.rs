use anyhow::{Context, Result};
use opportunities::{
    ai::{Completer, OpenAiClient, RoleBrief},
    config::Config,
    fetch::{build_client, export_url, HttpSource, Revalidating},
    logging,
    server::{routes, AppState},
};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};
use warp::Filter;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let config = Config::from_env().context("reading configuration")?;
    logging::init(&config.log_level);
    info!("startup");

    // ─── 2) sheet source ─────────────────────────────────────────────
    let client = build_client(config.fetch_timeout)?;
    let url = export_url(&config.spreadsheet_id, &config.sheet_gid)?;
    info!(
        %url,
        revalidate = ?config.revalidate,
        timeout = ?config.fetch_timeout,
        "opportunities source"
    );
    let source = Revalidating::new(
        HttpSource::new(client, url, config.fetch_retries),
        config.revalidate,
    );

    // ─── 3) language model ───────────────────────────────────────────
    let completer = match &config.openai_api_key {
        Some(key) => {
            info!(model = %config.openai_model, "AI routes enabled");
            Some(Arc::new(OpenAiClient::new(
                build_client(COMPLETION_TIMEOUT)?,
                &config.openai_base_url,
                key,
                &config.openai_model,
            )) as Arc<dyn Completer>)
        }
        None => {
            warn!("OPENAI_API_KEY not set; search uses canned insights and chat is disabled");
            None
        }
    };

    let state = Arc::new(AppState {
        source: Arc::new(source),
        completer,
        brief: RoleBrief::default(),
    });

    // ─── 4) serve ────────────────────────────────────────────────────
    let port = config.port;
    info!("Server starting on port {}", port);
    info!("Health check: http://localhost:{}/health", port);
    info!("Opportunities: GET http://localhost:{}/api/opportunities", port);

    warp::serve(routes(state).with(warp::trace::request()))
        .run(([0, 0, 0, 0], port))
        .await;

    Ok(())
}
