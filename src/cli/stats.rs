use anyhow::Result;

use engram::config::EngramConfig;
use engram::db;
use engram::memory::stats;

/// Display memory statistics in the terminal.
pub fn stats(config: &EngramConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;

    let response = stats::memory_stats(&conn, Some(&db_path))?;

    println!("Memory Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total memories:     {}", response.total_memories);
    println!("  Relationships:      {}", response.total_relationships);
    println!();

    if !response.by_type.is_empty() {
        println!("By Type:");
        let mut types: Vec<_> = response.by_type.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1));
        for (t, count) in types {
            println!("  {t:<16} {count}");
        }
        println!();
    }

    println!("Database size:        {} bytes", response.db_size_bytes);
    if let Some(ref oldest) = response.oldest_memory {
        println!("Oldest memory:        {oldest}");
    }
    if let Some(ref newest) = response.newest_memory {
        println!("Newest memory:        {newest}");
    }

    Ok(())
}
