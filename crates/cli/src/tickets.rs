//! Ticket lifecycle on top of a pluggable store.

use thiserror::Error;

/// First generated channel id; new ticket channels count up from here.
const CHANNEL_ID_BASE: u64 = 100_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    pub channel_id: String,
    pub category_id: String,
    pub urgent: bool,
    pub status: TicketStatus,
    pub opened_by: Option<String>,
    pub closed_by: Option<String>,
    pub close_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("user already has an open ticket at <#{channel_id}>")]
    ExistingTicket { channel_id: String },
    #[error("no open ticket found for this channel")]
    TicketNotFound,
    #[error("MOD_CATEGORY_ID is not configured")]
    MissingCategory,
}

/// Ticket persistence.
pub trait TicketStore {
    fn find_open_by_user(&self, user_id: &str) -> Option<&Ticket>;
    fn find_open_by_channel(&self, channel_id: &str) -> Option<&Ticket>;
    fn insert(&mut self, ticket: Ticket);
    /// Replace the ticket with the same id. Returns `false` if there is none.
    fn update(&mut self, ticket: Ticket) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTicketStore {
    tickets: Vec<Ticket>,
}

impl TicketStore for MemoryTicketStore {
    fn find_open_by_user(&self, user_id: &str) -> Option<&Ticket> {
        self.tickets
            .iter()
            .find(|t| t.user_id == user_id && t.status == TicketStatus::Open)
    }

    fn find_open_by_channel(&self, channel_id: &str) -> Option<&Ticket> {
        self.tickets
            .iter()
            .find(|t| t.channel_id == channel_id && t.status == TicketStatus::Open)
    }

    fn insert(&mut self, ticket: Ticket) {
        self.tickets.push(ticket);
    }

    fn update(&mut self, ticket: Ticket) -> bool {
        match self.tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(slot) => {
                *slot = ticket;
                true
            }
            None => false,
        }
    }
}

/// What `open` needs to know about the new ticket.
#[derive(Debug, Clone, Default)]
pub struct OpenRequest<'a> {
    pub user_id: &'a str,
    pub category_id: &'a str,
    pub opened_by: Option<&'a str>,
    pub urgent: bool,
}

pub struct TicketService {
    store: Box<dyn TicketStore>,
    opened: u64,
}

impl TicketService {
    pub fn new(store: impl TicketStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            opened: 0,
        }
    }

    /// Open a ticket in a fresh channel. A user has at most one open ticket.
    pub fn open(&mut self, req: OpenRequest<'_>) -> Result<Ticket, TicketError> {
        if let Some(existing) = self.store.find_open_by_user(req.user_id) {
            return Err(TicketError::ExistingTicket {
                channel_id: existing.channel_id.clone(),
            });
        }

        self.opened += 1;
        let ticket = Ticket {
            id: self.opened.to_string(),
            user_id: req.user_id.to_string(),
            channel_id: (CHANNEL_ID_BASE + self.opened).to_string(),
            category_id: req.category_id.to_string(),
            urgent: req.urgent,
            status: TicketStatus::Open,
            opened_by: req.opened_by.map(str::to_string),
            closed_by: None,
            close_reason: None,
        };
        self.store.insert(ticket.clone());
        tracing::info!(ticket = %ticket.id, user = %ticket.user_id, channel = %ticket.channel_id, "opened ticket");
        Ok(ticket)
    }

    /// Close the open ticket bound to `channel_id`.
    pub fn close(
        &mut self,
        channel_id: &str,
        closed_by: &str,
        reason: Option<&str>,
    ) -> Result<Ticket, TicketError> {
        let mut ticket = self
            .store
            .find_open_by_channel(channel_id)
            .cloned()
            .ok_or(TicketError::TicketNotFound)?;

        ticket.status = TicketStatus::Closed;
        ticket.closed_by = Some(closed_by.to_string());
        ticket.close_reason = reason.map(str::to_string);
        if !self.store.update(ticket.clone()) {
            return Err(TicketError::TicketNotFound);
        }
        tracing::info!(ticket = %ticket.id, moderator = %closed_by, "closed ticket");
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: &str) -> OpenRequest<'_> {
        OpenRequest {
            user_id,
            category_id: "555",
            ..Default::default()
        }
    }

    #[test]
    fn open_allocates_ids_and_channels() {
        let mut svc = TicketService::new(MemoryTicketStore::default());
        let a = svc.open(request("1")).unwrap();
        let b = svc.open(request("2")).unwrap();
        assert_eq!(a.id, "1");
        assert_eq!(a.channel_id, "100000000000000001");
        assert_eq!(b.channel_id, "100000000000000002");
        assert_eq!(a.status, TicketStatus::Open);
    }

    #[test]
    fn one_open_ticket_per_user() {
        let mut svc = TicketService::new(MemoryTicketStore::default());
        let first = svc.open(request("1")).unwrap();
        let err = svc.open(request("1")).unwrap_err();
        assert_eq!(
            err,
            TicketError::ExistingTicket {
                channel_id: first.channel_id
            }
        );
    }

    #[test]
    fn close_then_reopen() {
        let mut svc = TicketService::new(MemoryTicketStore::default());
        let t = svc.open(request("1")).unwrap();
        let closed = svc.close(&t.channel_id, "9", Some("done")).unwrap();
        assert_eq!(closed.status, TicketStatus::Closed);
        assert_eq!(closed.close_reason.as_deref(), Some("done"));

        assert_eq!(
            svc.close(&t.channel_id, "9", None).unwrap_err(),
            TicketError::TicketNotFound
        );
        svc.open(request("1")).unwrap();
    }
}
