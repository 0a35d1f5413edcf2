use safemom::{AnalysisSession, SearchHistory};
use safemom_demos::common::{demo_image, get_client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Orchestrator (mock backend in CI when SAFEMOM_DEMOS_USE_MOCK is set).
    let client = get_client()?;
    let mut session = AnalysisSession::new(client, SearchHistory::in_memory());

    // 2. Pick a photo and let the backend name the product.
    session.select_image(demo_image("cerave"), None);
    let wizard = session.identify().await?;
    println!("Step {}: identified {:?}", wizard.step().ordinal(), wizard.product());

    // 3. Ingredient lookup.
    let wizard = session.find_ingredients().await?;
    println!("Step {}: {} ingredients", wizard.step().ordinal(), wizard.ingredients().len());
    for ingredient in wizard.ingredients() {
        println!("  - {ingredient}");
    }

    // 4. Safety verdict.
    let wizard = session.analyze().await?;
    if let Some(report) = wizard.safety() {
        println!(
            "Step {}: {}",
            wizard.step().ordinal(),
            if report.is_safe { "safe during pregnancy" } else { "not recommended" }
        );
        for harmful in &report.harmful_ingredients {
            println!("  ! {}: {}", harmful.name, harmful.reason);
        }
    }

    // 5. Keep it for later.
    let record = session.save()?;
    println!("Saved as {} at {}", record.id, record.timestamp);

    Ok(())
}
