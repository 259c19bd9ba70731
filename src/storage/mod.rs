use crate::{
    domain::{Ticket, TicketId, TicketStatus},
    error::{Result, TriageError},
};
use async_trait::async_trait;
use tracing::warn;

pub mod memory_storage;

#[cfg(feature = "file-storage")]
pub mod file_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

#[cfg(feature = "http-storage")]
pub mod http_storage;

pub use memory_storage::MemoryStorage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

#[cfg(feature = "http-storage")]
pub use http_storage::HttpStorage;

/// Key under which the key-value backends keep the ticket list
pub const TICKETS_KEY: &str = "tickets_data";

/// Storage trait for persisting the ordered ticket list
///
/// Every backend returns the full list in board order and seeds the demo
/// dataset the first time it is read while empty.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Loads all tickets in order
    async fn get_tickets(&self) -> Result<Vec<Ticket>>;

    /// Sets the status of one ticket and returns the updated record
    async fn update_ticket_status(&self, id: &TicketId, status: TicketStatus) -> Result<Ticket>;

    /// Persists a new order; ids without a ticket are dropped
    async fn reorder_tickets(&self, ids: &[TicketId]) -> Result<Vec<Ticket>>;

    /// Changes the status of a ticket and places it at `target_index` of the
    /// target column, returning the full resulting list
    async fn move_ticket_to_column(
        &self,
        id: &TicketId,
        status: TicketStatus,
        target_index: usize,
    ) -> Result<Vec<Ticket>>;

    /// Discards all data and reseeds the demo dataset
    async fn refresh_tickets(&self) -> Result<Vec<Ticket>>;
}

/// Decodes a stored ticket list, skipping records that no longer parse.
pub(crate) fn decode_tickets(json: &str) -> Result<Vec<Ticket>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut tickets = Vec::with_capacity(values.len());

    for value in values {
        match serde_json::from_value::<Ticket>(value) {
            Ok(ticket) => tickets.push(ticket),
            Err(e) => warn!("Dropping unreadable stored ticket: {e}"),
        }
    }

    Ok(tickets)
}

/// Replaces the status of `id` in place and returns the new record
pub(crate) fn set_status(
    tickets: &mut [Ticket],
    id: &TicketId,
    status: TicketStatus,
) -> Result<Ticket> {
    let slot = tickets
        .iter_mut()
        .find(|t| &t.id == id)
        .ok_or_else(|| TriageError::TicketNotFound(id.to_string()))?;

    *slot = slot.with_status(status);
    Ok(slot.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_decode_skips_unknown_status() {
        let now = Utc::now().to_rfc3339();
        let json = format!(
            r#"[
            {{"id": "A", "customerName": "a", "issue": "", "aiResponse": "", "status": "escalated", "createdAt": "{now}"}},
            {{"id": "B", "customerName": "b", "issue": "", "aiResponse": "", "status": "archived", "createdAt": "{now}"}}
        ]"#
        );

        let tickets = decode_tickets(&json).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id.as_str(), "A");
    }

    #[test]
    fn test_decode_rejects_non_list() {
        assert!(decode_tickets("{\"tickets\": []}").is_err());
        assert!(decode_tickets("not json").is_err());
    }

    #[test]
    fn test_set_status() {
        let mut tickets = crate::domain::seed::demo_tickets(Utc::now());
        let id = TicketId::new("TKT-002");

        let updated = set_status(&mut tickets, &id, TicketStatus::AiResolved).unwrap();
        assert_eq!(updated.status, TicketStatus::AiResolved);
        assert_eq!(tickets[1].status, TicketStatus::AiResolved);

        let err = set_status(&mut tickets, &TicketId::new("nope"), TicketStatus::AiResolved).unwrap_err();
        assert!(err.is_not_found());
    }
}
