use crate::domain::ticket::{Ticket, TicketId, TicketStatus};
use serde::{Deserialize, Serialize};

/// Viewports narrower than this are treated as mobile
pub const DEFAULT_MOBILE_BREAKPOINT_PX: u32 = 768;

/// Configuration for a board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    pub status: TicketStatus,
}

impl Column {
    pub fn new(label: impl Into<String>, status: TicketStatus) -> Self {
        Self {
            label: label.into(),
            status,
        }
    }

    /// Stable identifier used to locate the column in a rendered board
    pub fn test_id(&self) -> String {
        format!("ticket-column-{}", self.status.as_str())
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<Column>,
    pub mobile_breakpoint_px: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Customer Support".to_string(),
            columns: TicketStatus::ALL
                .iter()
                .map(|status| Column::new(status.to_string(), *status))
                .collect(),
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
        }
    }
}

impl BoardConfig {
    /// Gets the column configuration for a status
    pub fn get_column_for_status(&self, status: &TicketStatus) -> Option<&Column> {
        self.columns.iter().find(|col| &col.status == status)
    }

    /// Display label of a column, falling back to the status name
    pub fn label_for(&self, status: &TicketStatus) -> String {
        self.get_column_for_status(status)
            .map(|col| col.label.clone())
            .unwrap_or_else(|| status.to_string())
    }

    pub fn is_mobile_width(&self, width_px: u32) -> bool {
        width_px < self.mobile_breakpoint_px
    }
}

/// The ticket sequence split into its three columns.
///
/// Each column keeps the relative order its tickets have in the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedTickets {
    columns: [Vec<Ticket>; 3],
}

impl GroupedTickets {
    pub fn get(&self, status: TicketStatus) -> &[Ticket] {
        &self.columns[status.column_index()]
    }

    pub fn get_mut(&mut self, status: TicketStatus) -> &mut Vec<Ticket> {
        &mut self.columns[status.column_index()]
    }

    /// Columns in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (TicketStatus, &[Ticket])> {
        TicketStatus::ALL
            .into_iter()
            .map(move |status| (status, self.get(status)))
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenates the columns back into one sequence, in canonical order
    pub fn into_sequence(self) -> Vec<Ticket> {
        self.columns.into_iter().flatten().collect()
    }
}

/// Splits a sequence into per-status columns, preserving relative order
pub fn group_by_status(tickets: &[Ticket]) -> GroupedTickets {
    let mut grouped = GroupedTickets::default();
    for ticket in tickets {
        grouped.get_mut(ticket.status).push(ticket.clone());
    }
    grouped
}

/// A rendered ticket card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: TicketId,
    pub status: TicketStatus,
    pub test_id: String,
    pub draggable: bool,
}

/// A rendered board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub status: TicketStatus,
    pub label: String,
    pub test_id: String,
    pub cards: Vec<CardView>,
}

/// Builds the render model for a grouped sequence
pub fn render_columns(
    config: &BoardConfig,
    grouped: &GroupedTickets,
    draggable: bool,
) -> Vec<ColumnView> {
    grouped
        .iter()
        .map(|(status, tickets)| ColumnView {
            status,
            label: config.label_for(&status),
            test_id: format!("ticket-column-{}", status.as_str()),
            cards: tickets
                .iter()
                .map(|t| CardView {
                    id: t.id.clone(),
                    status: t.status,
                    test_id: format!("ticket-card-{}", t.id),
                    draggable,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ticket(id: &str, status: TicketStatus) -> Ticket {
        Ticket::new(TicketId::new(id), id, "issue", "response", status, Utc::now())
    }

    #[test]
    fn test_default_board_config() {
        let config = BoardConfig::default();
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.label_for(&TicketStatus::PendingApproval), "Pending Approval");
        assert_eq!(config.mobile_breakpoint_px, 768);
        assert!(config.is_mobile_width(767));
        assert!(!config.is_mobile_width(768));
    }

    #[test]
    fn test_grouping_preserves_relative_order() {
        let tickets = vec![
            ticket("E1", TicketStatus::Escalated),
            ticket("R1", TicketStatus::AiResolved),
            ticket("P1", TicketStatus::PendingApproval),
            ticket("R2", TicketStatus::AiResolved),
            ticket("E2", TicketStatus::Escalated),
        ];

        let grouped = group_by_status(&tickets);

        for (status, column) in grouped.iter() {
            let expected: Vec<&Ticket> = tickets.iter().filter(|t| t.status == status).collect();
            let actual: Vec<&Ticket> = column.iter().collect();
            assert_eq!(actual, expected);
        }
        assert_eq!(grouped.len(), 5);
    }

    #[test]
    fn test_into_sequence_is_canonical() {
        let tickets = vec![
            ticket("E1", TicketStatus::Escalated),
            ticket("R1", TicketStatus::AiResolved),
            ticket("P1", TicketStatus::PendingApproval),
        ];

        let sequence = group_by_status(&tickets).into_sequence();
        let ids: Vec<&str> = sequence.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "P1", "E1"]);
    }

    #[test]
    fn test_empty_grouping() {
        let grouped = group_by_status(&[]);
        assert!(grouped.is_empty());
        assert!(grouped.iter().all(|(_, column)| column.is_empty()));
    }

    #[test]
    fn test_render_columns_exposes_attributes() {
        let tickets = vec![
            ticket("TKT-001", TicketStatus::AiResolved),
            ticket("TKT-002", TicketStatus::PendingApproval),
        ];
        let views = render_columns(&BoardConfig::default(), &group_by_status(&tickets), true);

        assert_eq!(views.len(), 3);
        assert_eq!(views[1].test_id, "ticket-column-pending_approval");
        assert_eq!(views[1].cards[0].test_id, "ticket-card-TKT-002");
        assert_eq!(views[1].cards[0].status, TicketStatus::PendingApproval);
        assert!(views[2].cards.is_empty());
        assert_eq!(
            Column::new("Escalated", TicketStatus::Escalated).test_id(),
            "ticket-column-escalated"
        );
    }
}
