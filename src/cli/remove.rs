use anyhow::Result;

use engram::config::EngramConfig;
use engram::db;
use engram::memory::store;

/// Delete a memory by id. Relationships touching it are removed by cascade.
pub fn remove(config: &EngramConfig, id: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;

    if store::delete_memory(&conn, id)? {
        println!("Deleted memory {id}");
    } else {
        println!("No memory with id {id}");
    }
    Ok(())
}
