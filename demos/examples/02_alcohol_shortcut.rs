use safemom::{AnalysisSession, SearchHistory, Step};
use safemom_demos::common::{demo_image, get_client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = AnalysisSession::new(get_client()?, SearchHistory::in_memory());

    session.select_image(demo_image("wine"), None);
    session.identify().await?;
    let wizard = session.find_ingredients().await?;

    // Alcohol jumps straight to the verdict; the analysis call never happens.
    assert_eq!(wizard.step(), Step::Results);
    if let Some(warning) = wizard.alcohol_warning() {
        println!("Warning: {warning}");
    }
    if let Some(report) = wizard.safety() {
        for harmful in &report.harmful_ingredients {
            println!("{}: {}", harmful.name, harmful.reason);
        }
    }

    match session.analyze().await {
        Err(err) => println!("analyze is unavailable here: {err}"),
        Ok(_) => println!("unexpected: analysis ran"),
    }
    Ok(())
}
