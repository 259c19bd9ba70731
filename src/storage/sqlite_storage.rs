use crate::{
    domain::{ordering, seed, Ticket, TicketId, TicketStatus},
    error::{Result, TriageError},
    storage::{decode_tickets, set_status, Storage, TICKETS_KEY},
};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::{
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::{debug, error};

/// SQLite-backed key-value storage for the ticket list
pub struct SqliteStorage {
    connection: Arc<Mutex<Connection>>,
    // Held across read-modify-write cycles; the connection lock is only held per statement.
    write_lock: tokio::sync::Mutex<()>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `database_path`
    pub fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(database_path)?)
    }

    /// Opens a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let conn = connection
                .lock()
                .map_err(|_| TriageError::Persistence("SQLite connection lock poisoned".to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| TriageError::Persistence(format!("SQLite task failed: {e}")))?
    }

    async fn read_value(&self, key: &'static str) -> Result<Option<String>> {
        self.with_connection(move |conn| {
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn write_value(&self, key: &'static str, value: String) -> Result<()> {
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn write_tickets(&self, tickets: &[Ticket]) -> Result<()> {
        let json = serde_json::to_string(tickets)?;
        self.write_value(TICKETS_KEY, json).await
    }

    async fn load_or_seed(&self) -> Result<Vec<Ticket>> {
        if let Some(json) = self.read_value(TICKETS_KEY).await? {
            match decode_tickets(&json) {
                Ok(tickets) if !tickets.is_empty() => return Ok(tickets),
                Ok(_) => {}
                Err(e) => error!("Error reading stored tickets: {e}"),
            }
        }

        debug!("Seeding SQLite storage with demo tickets");
        let tickets = seed::demo_tickets(Utc::now());
        self.write_tickets(&tickets).await?;
        Ok(tickets)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_tickets(&self) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        self.load_or_seed().await
    }

    async fn update_ticket_status(&self, id: &TicketId, status: TicketStatus) -> Result<Ticket> {
        let _guard = self.write_lock.lock().await;
        let mut tickets = self.load_or_seed().await?;

        let updated = set_status(&mut tickets, id, status)?;
        self.write_tickets(&tickets).await?;
        Ok(updated)
    }

    async fn reorder_tickets(&self, ids: &[TicketId]) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        let tickets = self.load_or_seed().await?;

        let reordered = ordering::reorder_by_ids(&tickets, ids);
        self.write_tickets(&reordered).await?;
        Ok(reordered)
    }

    async fn move_ticket_to_column(
        &self,
        id: &TicketId,
        status: TicketStatus,
        target_index: usize,
    ) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        let tickets = self.load_or_seed().await?;

        let moved = ordering::move_to_column(&tickets, id, status, target_index)?;
        self.write_tickets(&moved).await?;
        Ok(moved)
    }

    async fn refresh_tickets(&self) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        let tickets = seed::demo_tickets(Utc::now());
        self.write_tickets(&tickets).await?;
        Ok(tickets)
    }
}
