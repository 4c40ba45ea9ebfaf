use anyhow::Result;

use engram::config::EngramConfig;
use engram::db;
use engram::memory::relations;

/// Create a typed relationship between two memories.
pub fn relate(config: &EngramConfig, from_id: &str, to_id: &str, relation_type: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;

    let rel = relations::create_relationship(&conn, from_id, to_id, relation_type)?;
    println!("Created relationship {}", rel.id);
    println!("  {} --[{}]--> {}", rel.from_id, rel.relation_type, rel.to_id);
    Ok(())
}
