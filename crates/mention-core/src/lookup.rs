//! Ordering for asynchronous directory lookups.
//!
//! When the directory answers asynchronously (e.g. a remote search), responses can arrive out
//! of order. Each issued lookup gets a monotonically increasing [`LookupTicket`]; only the
//! response for the most recently issued ticket is accepted, older ones are discarded.

/// Sequence number of one issued lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupTicket(u64);

impl LookupTicket {
    /// Raw sequence number.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// A lookup the host must run against its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    /// Ticket to hand back with the response.
    pub ticket: LookupTicket,
    /// Query to search for.
    pub query: String,
}

/// Issues tickets and recognizes the latest one.
#[derive(Debug, Clone, Default)]
pub struct LookupSequencer {
    issued: u64,
}

impl LookupSequencer {
    /// Create a sequencer with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, superseding all earlier ones.
    pub fn issue(&mut self) -> LookupTicket {
        self.issued += 1;
        LookupTicket(self.issued)
    }

    /// Invalidate every outstanding ticket without issuing a new lookup.
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }

    /// Returns `true` if `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        ticket.0 == self.issued
    }
}
