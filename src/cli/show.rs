use anyhow::Result;

use engram::config::EngramConfig;
use engram::db;
use engram::memory::{relations, store};

/// Print a single memory with its relationships.
pub fn show(config: &EngramConfig, id: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;

    let Some(record) = store::get_memory(&conn, id)? else {
        println!("No memory with id {id}");
        return Ok(());
    };

    println!("{}", record.title);
    println!("{}", "=".repeat(record.title.chars().count().max(8)));
    println!("  id:         {}", record.id);
    println!("  type:       {}", record.record_type);
    println!("  source:     {}", record.source);
    println!("  confidence: {:.2}", record.confidence);
    if !record.tags.is_empty() {
        println!("  tags:       {}", record.tags.join(", "));
    }
    println!("  created:    {}", record.created_at);
    println!();
    println!("{}", record.text);

    let relations = relations::get_relationships(&conn, id)?;
    if !relations.is_empty() {
        println!();
        println!("Relationships:");
        for rel in &relations {
            println!(
                "  {} → [{}] {} ({})",
                rel.relation_type, rel.other.record_type, rel.other.title, rel.other.id
            );
        }
    }

    Ok(())
}
