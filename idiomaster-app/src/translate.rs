use anyhow::Result;
use idiomaster_core::{simulate_translation, Catalog};
use std::time::Duration;

pub async fn run_translation(catalog: &Catalog, text: &str, delay_ms: u64) -> Result<()> {
    // Simulated backend latency.
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    let mut rng = rand::thread_rng();
    let result = simulate_translation(text, catalog, &mut rng)?;
    println!("original:   {}", result.original_text);
    println!("translated: {}", result.translated_text);
    println!(
        "try this idiom: {} (confidence {:.0}%)",
        result.matching_idiom,
        result.confidence * 100.0
    );
    Ok(())
}
