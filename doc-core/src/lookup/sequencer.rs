//! Guards against out-of-order lookup responses.
//!
//! Every request takes a [`LookupTicket`] from a [`LookupSequencer`]. Only
//! the most recently issued ticket is current; a response carrying an older
//! ticket arrived after the user moved on and must be dropped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LookupTicket(u64);

impl LookupTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct LookupSequencer {
    latest: u64,
}

impl LookupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&mut self) -> LookupTicket {
        self.latest += 1;
        LookupTicket(self.latest)
    }

    /// Makes every outstanding ticket stale without starting a request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(
        &self,
        ticket: LookupTicket,
    ) -> bool {
        ticket.0 == self.latest
    }
}
