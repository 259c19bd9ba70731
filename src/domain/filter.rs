use crate::domain::ticket::Ticket;

/// True when `query` would narrow the board (anything but whitespace)
pub fn is_active_query(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Filters tickets by customer name or ticket id
///
/// Matching is a case-insensitive substring test. A blank query returns the
/// input unchanged.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use triage_core::domain::filter::filter_tickets;
/// use triage_core::domain::ticket::{Ticket, TicketId, TicketStatus};
///
/// let tickets = vec![
///     Ticket::new(TicketId::new("TKT-001"), "John Smith", "", "", TicketStatus::AiResolved, Utc::now()),
///     Ticket::new(TicketId::new("TKT-002"), "Sarah Johnson", "", "", TicketStatus::Escalated, Utc::now()),
/// ];
///
/// let visible = filter_tickets(&tickets, "JOHN");
/// assert_eq!(visible.len(), 2);
///
/// let visible = filter_tickets(&tickets, "tkt-002");
/// assert_eq!(visible[0].customer_name, "Sarah Johnson");
/// ```
pub fn filter_tickets(tickets: &[Ticket], query: &str) -> Vec<Ticket> {
    if !is_active_query(query) {
        return tickets.to_vec();
    }

    let query_lower = query.to_lowercase();
    tickets
        .iter()
        .filter(|t| {
            t.customer_name.to_lowercase().contains(&query_lower)
                || t.id.as_str().to_lowercase().contains(&query_lower)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{TicketId, TicketStatus};
    use chrono::Utc;

    fn ticket(id: &str, customer: &str) -> Ticket {
        Ticket::new(
            TicketId::new(id),
            customer,
            "My order hasn't arrived",
            "It ships tomorrow",
            TicketStatus::PendingApproval,
            Utc::now(),
        )
    }

    fn tickets() -> Vec<Ticket> {
        vec![
            ticket("TKT-001", "John Smith"),
            ticket("TKT-002", "Sarah Johnson"),
            ticket("TKT-003", "Michael Chen"),
        ]
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let tickets = tickets();
        assert_eq!(filter_tickets(&tickets, ""), tickets);
        assert_eq!(filter_tickets(&tickets, "   "), tickets);
        assert!(!is_active_query(" \t"));
        assert!(is_active_query(" a"));
    }

    #[test]
    fn test_filter_by_customer_name_case_insensitive() {
        let results = filter_tickets(&tickets(), "CHEN");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id.as_str(), "TKT-003");

        let results = filter_tickets(&tickets(), "john");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_filter_by_id() {
        let results = filter_tickets(&tickets(), "tkt-002");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].customer_name, "Sarah Johnson");
    }

    #[test]
    fn test_filter_ignores_issue_text() {
        assert!(filter_tickets(&tickets(), "order").is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let results = filter_tickets(&tickets(), "tkt");
        let ids: Vec<&str> = results.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["TKT-001", "TKT-002", "TKT-003"]);
    }
}
