use crate::{
    domain::{group_by_status, ordering, GroupedTickets, Ticket, TicketId},
    drag::{RequestFence, RequestToken},
    error::Result,
    storage::Storage,
};
use std::collections::HashMap;

/// In-memory owner of the ordered ticket sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketStore {
    tickets: Vec<Ticket>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tickets(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    /// Current ordered sequence
    pub fn get_all(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TicketId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Replaces the ticket sharing `ticket.id`, keeping its position.
    ///
    /// Returns false (and changes nothing) when no such ticket exists.
    pub fn replace_one(&mut self, ticket: Ticket) -> bool {
        match self.tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(slot) => {
                *slot = ticket;
                true
            }
            None => false,
        }
    }

    /// Installs a new order.
    ///
    /// With `replacements`, those records become the sequence in the order
    /// of `ids`; ids without a replacement are dropped. Without them, the
    /// existing tickets are reordered.
    pub fn reorder(&mut self, ids: &[TicketId], replacements: Option<Vec<Ticket>>) {
        self.tickets = match replacements {
            Some(replacements) if !replacements.is_empty() => {
                let mut by_id: HashMap<TicketId, Ticket> =
                    replacements.into_iter().map(|t| (t.id.clone(), t)).collect();
                ids.iter().filter_map(|id| by_id.remove(id)).collect()
            }
            _ => ordering::reorder_by_ids(&self.tickets, ids),
        };
    }

    /// Replaces the whole sequence verbatim
    pub fn install(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
    }

    /// Per-status columns of the current sequence
    pub fn columns(&self) -> GroupedTickets {
        group_by_status(&self.tickets)
    }

    /// Installs `tickets` if `fence` still accepts a list tagged `token`.
    ///
    /// Returns whether the sequence was replaced.
    pub fn install_fenced(
        &mut self,
        tickets: Vec<Ticket>,
        fence: &mut RequestFence,
        token: RequestToken,
    ) -> bool {
        if !fence.accept_sequence(token) {
            return false;
        }
        self.tickets = tickets;
        true
    }

    /// Loads the sequence from `storage`, subject to `fence`
    pub async fn load(
        &mut self,
        storage: &dyn Storage,
        fence: &mut RequestFence,
        token: RequestToken,
    ) -> Result<bool> {
        let tickets = storage.get_tickets().await?;
        Ok(self.install_fenced(tickets, fence, token))
    }

    /// Asks `storage` to reseed its data, then installs the result subject
    /// to `fence`
    pub async fn refresh(
        &mut self,
        storage: &dyn Storage,
        fence: &mut RequestFence,
        token: RequestToken,
    ) -> Result<bool> {
        let tickets = storage.refresh_tickets().await?;
        Ok(self.install_fenced(tickets, fence, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TicketStatus;
    use crate::storage::MemoryStorage;
    use chrono::Utc;

    fn ticket(id: &str, status: TicketStatus) -> Ticket {
        Ticket::new(TicketId::new(id), id, "issue", "response", status, Utc::now())
    }

    fn store() -> TicketStore {
        TicketStore::from_tickets(vec![
            ticket("A", TicketStatus::PendingApproval),
            ticket("B", TicketStatus::PendingApproval),
            ticket("C", TicketStatus::Escalated),
        ])
    }

    fn ids(store: &TicketStore) -> Vec<&str> {
        store.get_all().iter().map(|t| t.id.as_str()).collect()
    }

    fn order(ids: &[&str]) -> Vec<TicketId> {
        ids.iter().map(|id| TicketId::new(*id)).collect()
    }

    #[test]
    fn test_replace_one_keeps_position() {
        let mut store = store();
        let updated = store.get(&TicketId::new("B")).unwrap().with_status(TicketStatus::AiResolved);

        assert!(store.replace_one(updated));
        assert_eq!(ids(&store), vec!["A", "B", "C"]);
        assert_eq!(store.get_all()[1].status, TicketStatus::AiResolved);
    }

    #[test]
    fn test_replace_one_missing_is_noop() {
        let mut store = store();
        let before = store.clone();

        assert!(!store.replace_one(ticket("Z", TicketStatus::Escalated)));
        assert_eq!(store, before);
    }

    #[test]
    fn test_reorder_existing() {
        let mut store = store();
        store.reorder(&order(&["C", "A", "B", "Q"]), None);
        assert_eq!(ids(&store), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_reorder_with_replacements() {
        let mut store = store();
        let replacements = vec![
            ticket("B", TicketStatus::PendingApproval),
            ticket("A", TicketStatus::Escalated),
            ticket("C", TicketStatus::Escalated),
        ];

        store.reorder(&order(&["B", "A", "C"]), Some(replacements));

        assert_eq!(ids(&store), vec!["B", "A", "C"]);
        assert_eq!(store.get_all()[1].status, TicketStatus::Escalated);
    }

    #[test]
    fn test_reorder_replacements_drop_missing_ids() {
        let mut store = store();
        store.reorder(
            &order(&["A", "B", "C"]),
            Some(vec![ticket("C", TicketStatus::Escalated), ticket("A", TicketStatus::Escalated)]),
        );
        assert_eq!(ids(&store), vec!["A", "C"]);
    }

    #[test]
    fn test_columns() {
        let store = store();
        let columns = store.columns();
        assert_eq!(columns.get(TicketStatus::PendingApproval).len(), 2);
        assert_eq!(columns.get(TicketStatus::Escalated).len(), 1);
        assert!(columns.get(TicketStatus::AiResolved).is_empty());
    }

    #[tokio::test]
    async fn test_load_and_refresh() {
        let storage = MemoryStorage::with_tickets(store().get_all().to_vec());
        let mut fence = RequestFence::new();
        let mut store = TicketStore::new();

        assert!(store.load(&storage, &mut fence, RequestToken::new(1)).await.unwrap());
        assert_eq!(ids(&store), vec!["A", "B", "C"]);

        assert!(store.refresh(&storage, &mut fence, RequestToken::new(2)).await.unwrap());
        assert_eq!(store.len(), 8);
    }

    #[tokio::test]
    async fn test_stale_load_is_not_installed() {
        let seeded = MemoryStorage::new();
        let small = MemoryStorage::with_tickets(store().get_all().to_vec());
        let mut fence = RequestFence::new();
        let mut store = TicketStore::new();

        assert!(store.refresh(&seeded, &mut fence, RequestToken::new(2)).await.unwrap());
        assert!(!store.load(&small, &mut fence, RequestToken::new(1)).await.unwrap());
        assert_eq!(store.len(), 8);
    }
}
