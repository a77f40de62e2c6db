use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row};
use tracing::{error, warn};

use cheers_types::models::{CongratulatoryMessage, NewMessage, Sprint, Template};
use cheers_types::{DEFAULT_SPRINT_TITLE, DEFAULT_TEMPLATE_MESSAGE};

use crate::Database;

const MESSAGE_COLUMNS: &str =
    "id, username, sprint_code, congratulatory_message, sprint_title, gif_url, timestamp";

impl Database {
    // -- Sprints --

    /// Fails on a duplicate sprint code.
    pub fn insert_sprint(&self, sprint_code: &str, sprint_title: &str) -> Result<Sprint> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sprints (sprint_code, sprint_title) VALUES (?1, ?2)",
                (sprint_code, sprint_title),
            )?;
            Ok(Sprint {
                sprint_code: sprint_code.to_string(),
                sprint_title: sprint_title.to_string(),
            })
        })
    }

    pub fn get_sprint_by_code(&self, sprint_code: &str) -> Result<Option<Sprint>> {
        self.with_conn(|conn| query_sprint_by_code(conn, sprint_code))
    }

    /// All sprints in insertion order.
    pub fn get_all_sprints(&self) -> Result<Vec<Sprint>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT sprint_code, sprint_title FROM sprints ORDER BY rowid")?;
            let rows = stmt
                .query_map([], sprint_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Rewrites both code and title of the sprint currently keyed by `sprint_code`.
    /// Returns false when no sprint matched.
    pub fn update_sprint(
        &self,
        sprint_code: &str,
        new_sprint_code: &str,
        new_sprint_title: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE sprints SET sprint_title = ?1, sprint_code = ?2 WHERE sprint_code = ?3",
                (new_sprint_title, new_sprint_code, sprint_code),
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_sprint_by_code(&self, sprint_code: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM sprints WHERE sprint_code = ?1", [sprint_code])?;
            Ok(changed > 0)
        })
    }

    /// Returns false when the table was already empty.
    pub fn delete_all_sprints(&self) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM sprints", [])?;
            Ok(changed > 0)
        })
    }

    /// Title for a sprint code, or the default title when the sprint is
    /// missing or the read fails.
    pub fn sprint_title(&self, sprint_code: &str) -> String {
        match self.get_sprint_by_code(sprint_code) {
            Ok(Some(sprint)) => sprint.sprint_title,
            Ok(None) => {
                warn!("No sprint with code '{}', using default title", sprint_code);
                DEFAULT_SPRINT_TITLE.to_string()
            }
            Err(e) => {
                error!("Failed to read title for sprint '{}': {}", sprint_code, e);
                DEFAULT_SPRINT_TITLE.to_string()
            }
        }
    }

    // -- Templates --

    /// Inserts with the caller's id when given, otherwise lets SQLite assign one.
    /// Fails on a duplicate id.
    pub fn insert_template(&self, id: Option<i64>, message: &str) -> Result<Template> {
        self.with_conn(|conn| {
            let id = match id {
                Some(id) => {
                    conn.execute(
                        "INSERT INTO templates (id, message) VALUES (?1, ?2)",
                        rusqlite::params![id, message],
                    )?;
                    id
                }
                None => {
                    conn.execute("INSERT INTO templates (message) VALUES (?1)", [message])?;
                    conn.last_insert_rowid()
                }
            };
            Ok(Template {
                id,
                message: message.to_string(),
            })
        })
    }

    pub fn get_all_templates(&self) -> Result<Vec<Template>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, message FROM templates ORDER BY id")?;
            let rows = stmt
                .query_map([], template_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_template_by_id(&self, id: i64) -> Result<Option<Template>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, message FROM templates WHERE id = ?1",
                [id],
                template_from_row,
            )
            .optional()
        })
    }

    pub fn update_template(&self, id: i64, message: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE templates SET message = ?1 WHERE id = ?2",
                rusqlite::params![message, id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_template(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM templates WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    /// One template message drawn uniformly from the current rows. Each call
    /// is an independent draw. Falls back to the default message when the
    /// table is empty or the read fails.
    pub fn random_template_message(&self) -> String {
        let drawn = self.with_conn(|conn| {
            conn.query_row(
                "SELECT message FROM templates ORDER BY RANDOM() LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()
        });

        match drawn {
            Ok(Some(message)) => message,
            Ok(None) => {
                warn!("No template message found, using default");
                DEFAULT_TEMPLATE_MESSAGE.to_string()
            }
            Err(e) => {
                error!("Failed to draw a random template message: {}", e);
                DEFAULT_TEMPLATE_MESSAGE.to_string()
            }
        }
    }

    // -- Congratulatory messages --

    /// Persists a composed message and returns its assigned id.
    pub fn save_message(&self, message: &NewMessage) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO congratulatory_messages
                    (username, sprint_code, congratulatory_message, sprint_title, gif_url, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    message.username,
                    message.sprint_code,
                    message.congratulatory_message,
                    message.sprint_title,
                    message.gif_url,
                    message.timestamp.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_all_messages(&self) -> Result<Vec<CongratulatoryMessage>> {
        self.with_conn(|conn| query_messages(conn, None))
    }

    pub fn get_messages_by_user(&self, username: &str) -> Result<Vec<CongratulatoryMessage>> {
        self.with_conn(|conn| query_messages(conn, Some(("username", username))))
    }

    pub fn get_messages_by_sprint(&self, sprint_code: &str) -> Result<Vec<CongratulatoryMessage>> {
        self.with_conn(|conn| query_messages(conn, Some(("sprint_code", sprint_code))))
    }
}

fn query_sprint_by_code(conn: &Connection, sprint_code: &str) -> Result<Option<Sprint>> {
    let mut stmt =
        conn.prepare("SELECT sprint_code, sprint_title FROM sprints WHERE sprint_code = ?1")?;

    let row = stmt.query_row([sprint_code], sprint_from_row).optional()?;

    Ok(row)
}

/// `filter` is a trusted column name paired with the value it must equal.
fn query_messages(
    conn: &Connection,
    filter: Option<(&str, &str)>,
) -> Result<Vec<CongratulatoryMessage>> {
    let sql = match filter {
        Some((column, _)) => format!(
            "SELECT {} FROM congratulatory_messages WHERE {} = ?1 ORDER BY id",
            MESSAGE_COLUMNS, column
        ),
        None => format!("SELECT {} FROM congratulatory_messages ORDER BY id", MESSAGE_COLUMNS),
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = match filter {
        Some((_, value)) => stmt
            .query_map([value], message_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?,
        None => stmt
            .query_map([], message_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?,
    };

    Ok(rows)
}

fn sprint_from_row(row: &Row<'_>) -> rusqlite::Result<Sprint> {
    Ok(Sprint {
        sprint_code: row.get(0)?,
        sprint_title: row.get(1)?,
    })
}

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        message: row.get(1)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<CongratulatoryMessage> {
    let raw: String = row.get(6)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(CongratulatoryMessage {
        id: row.get(0)?,
        username: row.get(1)?,
        sprint_code: row.get(2)?,
        congratulatory_message: row.get(3)?,
        sprint_title: row.get(4)?,
        gif_url: row.get(5)?,
        timestamp,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_message(username: &str, sprint_code: &str) -> NewMessage {
        NewMessage {
            username: username.into(),
            sprint_code: sprint_code.into(),
            congratulatory_message: "Great job!".into(),
            sprint_title: "Sprint One".into(),
            gif_url: "http://img/x.gif".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn sprint_crud() {
        let db = db();
        db.insert_sprint("S1", "Sprint One").unwrap();
        db.insert_sprint("S2", "Sprint Two").unwrap();

        let sprint = db.get_sprint_by_code("S1").unwrap().unwrap();
        assert_eq!(sprint.sprint_title, "Sprint One");

        assert!(db.update_sprint("S1", "S1b", "Renamed").unwrap());
        assert!(db.get_sprint_by_code("S1").unwrap().is_none());
        assert_eq!(db.get_sprint_by_code("S1b").unwrap().unwrap().sprint_title, "Renamed");

        assert!(db.delete_sprint_by_code("S2").unwrap());
        assert_eq!(db.get_all_sprints().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_sprint_code_fails() {
        let db = db();
        db.insert_sprint("S1", "Sprint One").unwrap();
        assert!(db.insert_sprint("S1", "Again").is_err());
    }

    #[test]
    fn sprints_keep_insertion_order() {
        let db = db();
        for code in ["C", "A", "B"] {
            db.insert_sprint(code, code).unwrap();
        }
        let codes: Vec<String> = db
            .get_all_sprints()
            .unwrap()
            .into_iter()
            .map(|s| s.sprint_code)
            .collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
    }

    #[test]
    fn missing_rows_are_signals_not_errors() {
        let db = db();
        assert!(!db.delete_sprint_by_code("NOPE").unwrap());
        assert!(!db.update_sprint("NOPE", "NOPE", "x").unwrap());
        assert!(!db.delete_all_sprints().unwrap());
        assert!(db.get_sprint_by_code("NOPE").unwrap().is_none());

        assert!(!db.update_template(42, "x").unwrap());
        assert!(!db.delete_template(42).unwrap());
        assert!(db.get_template_by_id(42).unwrap().is_none());

        assert!(db.get_messages_by_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn delete_all_sprints_reports_rows_removed() {
        let db = db();
        db.insert_sprint("S1", "Sprint One").unwrap();
        assert!(db.delete_all_sprints().unwrap());
        assert!(db.get_all_sprints().unwrap().is_empty());
    }

    #[test]
    fn sprint_title_falls_back_to_default() {
        let db = db();
        assert_eq!(db.sprint_title("NOPE"), DEFAULT_SPRINT_TITLE);
        db.insert_sprint("S1", "Sprint One").unwrap();
        assert_eq!(db.sprint_title("S1"), "Sprint One");
    }

    #[test]
    fn template_ids_assigned_or_supplied() {
        let db = db();
        let assigned = db.insert_template(None, "X").unwrap();
        let fetched = db.get_template_by_id(assigned.id).unwrap().unwrap();
        assert_eq!(fetched.message, "X");

        let supplied = db.insert_template(Some(100), "Y").unwrap();
        assert_eq!(supplied.id, 100);
        assert!(db.insert_template(Some(100), "Z").is_err());

        assert!(db.update_template(100, "Y2").unwrap());
        assert_eq!(db.get_template_by_id(100).unwrap().unwrap().message, "Y2");
        assert!(db.delete_template(100).unwrap());
        assert_eq!(db.get_all_templates().unwrap().len(), 1);
    }

    #[test]
    fn random_template_defaults_when_empty() {
        let db = db();
        assert_eq!(db.random_template_message(), DEFAULT_TEMPLATE_MESSAGE);
    }

    #[test]
    fn random_template_draws_every_row() {
        let db = db();
        db.insert_template(None, "A").unwrap();
        db.insert_template(None, "B").unwrap();

        let seen: HashSet<String> = (0..200).map(|_| db.random_template_message()).collect();
        let expected: HashSet<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn messages_filter_by_user_and_sprint() {
        let db = db();
        let first = db.save_message(&new_message("alice", "S1")).unwrap();
        db.save_message(&new_message("bob", "S1")).unwrap();
        db.save_message(&new_message("alice", "S2")).unwrap();

        assert_eq!(db.get_all_messages().unwrap().len(), 3);

        let alice = db.get_messages_by_user("alice").unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].id, first);
        assert_eq!(alice[0].gif_url, "http://img/x.gif");

        let s1 = db.get_messages_by_sprint("S1").unwrap();
        assert!(s1.iter().all(|m| m.sprint_code == "S1"));
        assert_eq!(s1.len(), 2);
    }

    #[test]
    fn stored_title_survives_sprint_rename() {
        let db = db();
        db.insert_sprint("S1", "Sprint One").unwrap();
        db.save_message(&new_message("alice", "S1")).unwrap();
        db.update_sprint("S1", "S1", "Renamed").unwrap();

        let stored = db.get_messages_by_sprint("S1").unwrap();
        assert_eq!(stored[0].sprint_title, "Sprint One");
    }

    #[test]
    fn timestamp_round_trips_through_storage() {
        let db = db();
        let message = new_message("alice", "S1");
        let written = message.timestamp;
        db.save_message(&message).unwrap();

        let stored = db.get_all_messages().unwrap();
        assert_eq!(stored[0].timestamp, written);
    }
}
