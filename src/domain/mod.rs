pub mod board;
pub mod filter;
pub mod ordering;
pub mod seed;
pub mod ticket;

pub use board::{group_by_status, BoardConfig, CardView, Column, ColumnView, GroupedTickets};
pub use filter::{filter_tickets, is_active_query};
pub use ticket::{Ticket, TicketId, TicketStatus};
