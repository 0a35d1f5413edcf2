use std::sync::Arc;

use safemom::{AnalysisSession, JsonFileStore, SearchHistory};
use safemom_demos::common::{demo_image, get_client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("safemom-demo-{}.json", std::process::id()));
    let history = SearchHistory::new(Arc::new(JsonFileStore::new(path.clone())));
    let mut session = AnalysisSession::new(get_client()?, history);

    // Save more searches than the history keeps.
    for i in 0..12 {
        let name = if i % 2 == 0 { "cerave" } else { "retinol" };
        session.select_image(demo_image(name), None);
        session.identify().await?;
        session.find_ingredients().await?;
        session.analyze().await?;
        session.save()?;
    }

    let saved = session.saved_searches()?;
    println!("{} searches kept in {}", saved.len(), path.display());
    for record in &saved {
        println!("  {}  {}  safe={}", record.timestamp, record.product, record.is_safe);
    }

    // Reopen the newest one as a read-only result.
    if let Some(newest) = saved.first() {
        let wizard = session.open_saved(&newest.id)?;
        println!("reopened {:?} at step {}", wizard.product(), wizard.step().ordinal());
    }

    session.clear_saved()?;
    let _ = std::fs::remove_file(&path);
    Ok(())
}
