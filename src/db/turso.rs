use crate::db::traits::{DatabaseClient, User};
use crate::types::{AppError, Event, EventRequest, Registration, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params::IntoParams, Builder, Connection, Database, Row};
use tokio::sync::Mutex;

/// libsql-backed store for users, events and registrations.
///
/// Holds a single connection so that an in-memory database keeps its schema
/// and rows for the lifetime of the client.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
    /// Serialises transactions, which would otherwise nest on the shared
    /// connection.
    tx_lock: Mutex<()>,
}

impl TursoClient {
    /// Open an ephemeral in-memory database
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    /// Open (or create) a local SQLite file
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self {
            _db: db,
            conn,
            tx_lock: Mutex::new(()),
        };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// Handle to the client's single shared connection.
    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to enable foreign keys: {}", e)))?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Events table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                location TEXT NOT NULL,
                date_time TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create events table: {}", e)))?;

        // Registrations table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS registrations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(id),
                FOREIGN KEY (user_id) REFERENCES users(id),
                UNIQUE(event_id, user_id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create registrations table: {}", e)))?;

        Ok(())
    }
}

fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

/// Runs an `INSERT ... RETURNING id` and yields the new row id.
async fn insert_returning_id(
    conn: &Connection,
    sql: &str,
    params: impl IntoParams,
) -> std::result::Result<Option<i64>, libsql::Error> {
    let mut rows = conn.query(sql, params).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

fn missing_id(table: &str) -> AppError {
    AppError::Database(format!("Insert into {} returned no id", table))
}

fn event_from_row(row: &Row) -> Result<Event> {
    let date_time: String = row.get(4).map_err(|e| AppError::Database(e.to_string()))?;
    let date_time = DateTime::parse_from_rfc3339(&date_time)
        .map_err(|e| AppError::Database(format!("Invalid stored date_time: {}", e)))?
        .with_timezone(&Utc);

    Ok(Event {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        description: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        location: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        date_time,
        user_id: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
    })
}

#[async_trait]
impl DatabaseClient for TursoClient {
    // User operations
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<i64> {
        let conn = self.connection();

        insert_returning_id(
            &conn,
            "INSERT INTO users (email, password_hash) VALUES (?, ?) RETURNING id",
            (email, password_hash),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::Database(format!("Failed to create user: {}", e))
            }
        })?
        .ok_or_else(|| missing_id("users"))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.connection();

        let mut rows = conn
            .query(
                "SELECT id, email, password_hash FROM users WHERE email = ?",
                [email],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(User {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                email: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    // Event operations
    async fn list_events(&self) -> Result<Vec<Event>> {
        let conn = self.connection();

        let mut rows = conn
            .query(
                "SELECT id, name, description, location, date_time, user_id
                 FROM events ORDER BY id ASC",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query events: {}", e)))?;

        let mut events = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            events.push(event_from_row(&row)?);
        }

        Ok(events)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>> {
        let conn = self.connection();

        let mut rows = conn
            .query(
                "SELECT id, name, description, location, date_time, user_id
                 FROM events WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query event: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(event_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_event(&self, user_id: i64, event: &EventRequest) -> Result<Event> {
        let conn = self.connection();

        let id = insert_returning_id(
            &conn,
            "INSERT INTO events (name, description, location, date_time, user_id)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
            (
                event.name.as_str(),
                event.description.as_str(),
                event.location.as_str(),
                event.date_time.to_rfc3339(),
                user_id,
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create event: {}", e)))?
        .ok_or_else(|| missing_id("events"))?;

        Ok(Event {
            id,
            name: event.name.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date_time: event.date_time,
            user_id,
        })
    }

    async fn update_event(&self, id: i64, event: &EventRequest) -> Result<()> {
        let conn = self.connection();

        conn.execute(
            "UPDATE events SET name = ?, description = ?, location = ?, date_time = ?
             WHERE id = ?",
            (
                event.name.as_str(),
                event.description.as_str(),
                event.location.as_str(),
                event.date_time.to_rfc3339(),
                id,
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to update event: {}", e)))?;

        Ok(())
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        let _guard = self.tx_lock.lock().await;
        let tx = self
            .connection()
            .transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Dropping `tx` on error rolls both statements back.
        tx.execute("DELETE FROM registrations WHERE event_id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete registrations: {}", e)))?;

        tx.execute("DELETE FROM events WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete event: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit event deletion: {}", e)))
    }

    // Registration operations
    async fn register_for_event(&self, event_id: i64, user_id: i64) -> Result<Registration> {
        let conn = self.connection();

        let id = insert_returning_id(
            &conn,
            "INSERT INTO registrations (event_id, user_id) VALUES (?, ?) RETURNING id",
            (event_id, user_id),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Already registered for this event".to_string())
            } else {
                AppError::Database(format!("Failed to register for event: {}", e))
            }
        })?
        .ok_or_else(|| missing_id("registrations"))?;

        Ok(Registration {
            id,
            event_id,
            user_id,
        })
    }

    async fn cancel_registration(&self, event_id: i64, user_id: i64) -> Result<bool> {
        let conn = self.connection();

        let affected = conn
            .execute(
                "DELETE FROM registrations WHERE event_id = ? AND user_id = ?",
                (event_id, user_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to cancel registration: {}", e)))?;

        Ok(affected > 0)
    }
}
