use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Creates the schema if absent. Safe to run on every startup.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sprints (
            sprint_code     TEXT PRIMARY KEY,
            sprint_title    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS templates (
            id          INTEGER PRIMARY KEY,
            message     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS congratulatory_messages (
            id                      INTEGER PRIMARY KEY,
            username                TEXT NOT NULL,
            sprint_code             TEXT NOT NULL,
            congratulatory_message  TEXT NOT NULL,
            sprint_title            TEXT NOT NULL,
            gif_url                 TEXT NOT NULL,
            timestamp               TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_username
            ON congratulatory_messages(username);

        CREATE INDEX IF NOT EXISTS idx_messages_sprint_code
            ON congratulatory_messages(sprint_code);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('sprints', 'templates', 'congratulatory_messages')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
