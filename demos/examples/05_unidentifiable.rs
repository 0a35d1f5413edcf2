use safemom::wizard::machine::UNIDENTIFIABLE_MESSAGE;
use safemom::{AnalysisSession, SearchHistory};
use safemom_demos::common::{demo_image, get_client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = AnalysisSession::new(get_client()?, SearchHistory::in_memory());

    session.select_image(demo_image("blurry"), None);
    let wizard = session.identify().await?;
    if wizard.is_unidentifiable() {
        println!("{UNIDENTIFIABLE_MESSAGE}");
    }

    // Both follow-up steps stay disabled until a new image is chosen.
    if let Err(err) = session.find_ingredients().await {
        println!("{err}");
    }

    session.select_image(demo_image("oats"), None);
    let wizard = session.identify().await?;
    println!("second try: {:?}", wizard.product());
    Ok(())
}
