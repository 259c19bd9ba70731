//! Demo dataset installed by every backend on first use and on refresh.

use crate::domain::ticket::{Ticket, TicketId, TicketStatus};
use chrono::{DateTime, Duration, Utc};

struct SeedTicket {
    id: &'static str,
    customer_name: &'static str,
    issue: &'static str,
    ai_response: &'static str,
    status: TicketStatus,
    age_minutes: i64,
}

const SEED: [SeedTicket; 8] = [
    SeedTicket {
        id: "TKT-001",
        customer_name: "John Smith",
        issue: "I'm having trouble logging into my account. The password reset link isn't working.",
        ai_response: "I've verified your account status and reset your password. Please check your email for the new temporary password. You'll be prompted to create a new password on your next login.",
        status: TicketStatus::AiResolved,
        age_minutes: 120,
    },
    SeedTicket {
        id: "TKT-002",
        customer_name: "Sarah Johnson",
        issue: "My order #12345 hasn't arrived yet. It was supposed to be delivered yesterday.",
        ai_response: "I've checked your order status. There was a delay in shipping due to weather conditions. Your order is now in transit and should arrive within 2 business days. I've also applied a 10% discount to your next order as compensation.",
        status: TicketStatus::PendingApproval,
        age_minutes: 300,
    },
    SeedTicket {
        id: "TKT-003",
        customer_name: "Michael Chen",
        issue: "I want to cancel my subscription immediately and get a full refund.",
        ai_response: "I understand you'd like to cancel. However, according to our policy, refunds are only available within 30 days of purchase. Your subscription started 45 days ago. Would you like me to process the cancellation, or would you prefer to discuss alternative options?",
        status: TicketStatus::PendingApproval,
        age_minutes: 60,
    },
    SeedTicket {
        id: "TKT-004",
        customer_name: "Emily Davis",
        issue: "There's a bug in the mobile app - it crashes every time I try to upload a photo.",
        ai_response: "I've identified the issue. This is a known bug affecting iOS version 15.0-15.2. Our development team is working on a fix. In the meantime, please try updating to the latest app version or use the web interface.",
        status: TicketStatus::Escalated,
        age_minutes: 180,
    },
    SeedTicket {
        id: "TKT-005",
        customer_name: "Robert Wilson",
        issue: "I need help setting up two-factor authentication for my account.",
        ai_response: "I'll guide you through setting up 2FA. First, go to Settings > Security > Two-Factor Authentication. Click 'Enable' and scan the QR code with your authenticator app. Enter the 6-digit code to complete setup.",
        status: TicketStatus::AiResolved,
        age_minutes: 240,
    },
    SeedTicket {
        id: "TKT-006",
        customer_name: "Lisa Anderson",
        issue: "I was charged twice for the same purchase. Transaction IDs: TXN-789 and TXN-790.",
        ai_response: "I've reviewed both transactions and confirmed the duplicate charge. I've processed a full refund for the second transaction (TXN-790). The refund should appear in your account within 3-5 business days.",
        status: TicketStatus::PendingApproval,
        age_minutes: 360,
    },
    SeedTicket {
        id: "TKT-007",
        customer_name: "David Martinez",
        issue: "The website is extremely slow and keeps timing out. This is affecting my work.",
        ai_response: "I apologize for the inconvenience. Our servers are experiencing higher than usual traffic. I've escalated this to our infrastructure team for immediate investigation. We're working to resolve this as quickly as possible.",
        status: TicketStatus::Escalated,
        age_minutes: 30,
    },
    SeedTicket {
        id: "TKT-008",
        customer_name: "Jennifer Brown",
        issue: "Can you help me change my email address associated with my account?",
        ai_response: "To change your email address, please go to Account Settings > Profile > Email. Enter your new email address and verify it using the confirmation link we'll send. Your old email will remain active until verification is complete.",
        status: TicketStatus::AiResolved,
        age_minutes: 420,
    },
];

/// Builds the demo tickets with creation times relative to `now`
pub fn demo_tickets(now: DateTime<Utc>) -> Vec<Ticket> {
    SEED.iter()
        .map(|seed| {
            Ticket::new(
                TicketId::new(seed.id),
                seed.customer_name,
                seed.issue,
                seed.ai_response,
                seed.status,
                now - Duration::minutes(seed.age_minutes),
            )
        })
        .collect()
}
