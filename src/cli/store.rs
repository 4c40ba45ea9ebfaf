use anyhow::Result;

use engram::config::EngramConfig;
use engram::service::{MemoryService, StoreRequest};

/// Store a memory from the terminal.
#[allow(clippy::too_many_arguments)]
pub async fn store(
    config: &EngramConfig,
    text: &str,
    record_type: &str,
    source: &str,
    tags: &[String],
    confidence: Option<f64>,
    title: Option<&str>,
) -> Result<()> {
    let service = MemoryService::connect(config.clone())?;

    let record = service
        .store(StoreRequest {
            record_type: record_type.to_string(),
            content: serde_json::json!({ "text": text }),
            source: source.to_string(),
            text: text.to_string(),
            tags: tags.to_vec(),
            confidence,
            title: title.map(str::to_string),
        })
        .await?;

    println!("Stored memory {}", record.id);
    println!("  title: {}", record.title);
    println!("  type:  {}", record.record_type);
    if !record.tags.is_empty() {
        println!("  tags:  {}", record.tags.join(", "));
    }
    Ok(())
}
