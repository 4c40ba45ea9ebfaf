use anyhow::Result;

use engram::config::EngramConfig;
use engram::service::MemoryService;

/// Run a semantic search from the terminal.
pub async fn search(
    config: &EngramConfig,
    query: &str,
    limit: Option<usize>,
    tags: &[String],
    min_similarity: Option<f64>,
) -> Result<()> {
    let service = MemoryService::connect(config.clone())?;

    let filter_tags = if tags.is_empty() {
        None
    } else {
        Some(tags.to_vec())
    };

    let hits = service
        .search(query.to_string(), limit, filter_tags, min_similarity)
        .await?;

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        let similarity = hit.memory.similarity.unwrap_or(0.0);
        println!(
            "  {}. [{}] {} (similarity: {:.3}, confidence: {:.2})",
            i + 1,
            hit.memory.record_type,
            hit.memory.title,
            similarity,
            hit.memory.confidence,
        );
        println!("     id: {}", hit.memory.id);

        let preview: String = hit.memory.text.chars().take(120).collect();
        if preview.len() < hit.memory.text.len() {
            println!("     {preview}...");
        } else {
            println!("     {preview}");
        }

        for rel in &hit.relations {
            println!(
                "     ↳ {} [{}] {}",
                rel.relation_type, rel.other.record_type, rel.other.title
            );
        }
        println!();
    }

    Ok(())
}
