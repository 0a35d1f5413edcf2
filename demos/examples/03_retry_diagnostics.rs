use std::time::Duration;

use safemom::SafeMom;
use safemom_demos::common::get_transport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Short backoff so the demo finishes quickly: waits 50ms, then 100ms.
    let client = SafeMom::builder()
        .with_transport(get_transport())
        .max_retries(2)
        .retry_delay(Duration::from_millis(50))
        .timeout(Duration::from_secs(5))
        .build()?;

    // "FAIL" makes the mock backend answer with a framework error page.
    match client.find_ingredients("FAIL").await {
        Ok(delivered) => println!("got {} ingredients", delivered.data.ingredients.len()),
        Err(err) => {
            println!("request failed: {err}");
            if let Some(diagnostics) = &err.diagnostics {
                println!("{}", serde_json::to_string_pretty(diagnostics)?);
            }
        }
    }
    Ok(())
}
