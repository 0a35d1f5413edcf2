use safemom::{AnalysisSession, SearchHistory};
use safemom_demos::common::{demo_image, get_client};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Human-friendly subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,safemom=debug,safemom_http=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let mut session = AnalysisSession::new(get_client()?, SearchHistory::in_memory());

    session.select_image(demo_image("cerave"), None);
    session.identify().await?;
    session.find_ingredients().await?;
    session.analyze().await?;

    tracing::info!(step = ?session.wizard().step(), "walkthrough finished");
    Ok(())
}
