use chrono::{DateTime, Utc};

use crate::record::AdminRecord;

/// Sequence number handed out by [`ListStore::begin_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// In-memory mirror of the last successful list fetch.
///
/// Fetches are sequenced: only the most recently issued ticket may replace
/// the records or clear `loading`, so a slow response that lands after a
/// newer one is discarded.
#[derive(Debug, Clone)]
pub struct ListStore<R: AdminRecord> {
    records: Vec<R>,
    latest_ticket: u64,
    loading: bool,
    fetched_at: Option<DateTime<Utc>>,
}

impl<R: AdminRecord> Default for ListStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            latest_ticket: 0,
            loading: false,
            fetched_at: None,
        }
    }
}

impl<R: AdminRecord> ListStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.loading = true;
        FetchTicket(self.latest_ticket)
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    /// Replaces the collection verbatim. Returns `false` (and changes
    /// nothing) when a newer fetch has been issued since `ticket`.
    pub fn commit(&mut self, ticket: FetchTicket, records: Vec<R>) -> bool {
        if !self.is_latest(ticket) {
            return false;
        }
        self.records = records;
        self.loading = false;
        self.fetched_at = Some(Utc::now());
        true
    }

    /// Settles a failed fetch, keeping the current records. Returns whether
    /// `ticket` was still the latest.
    pub fn fail(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_latest(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    /// Replaces the entry for `id` in place. Returns `false` when no entry
    /// has that id or `record` carries a different one.
    /// A successful patch supersedes any fetch still in flight.
    pub fn patch(&mut self, id: R::Id, record: R) -> bool {
        if record.id() != id {
            return false;
        }
        let Some(slot) = self.records.iter_mut().find(|existing| existing.id() == id) else {
            return false;
        };
        *slot = record;
        self.supersede_pending();
        true
    }

    /// Drops the entry for `id`, superseding any fetch still in flight.
    pub fn remove(&mut self, id: R::Id) -> Option<R> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        let removed = self.records.remove(index);
        self.supersede_pending();
        Some(removed)
    }

    fn supersede_pending(&mut self) {
        if self.loading {
            self.latest_ticket += 1;
            self.loading = false;
        }
    }
}

#[cfg(test)]
#[path = "tests/list_store_tests.rs"]
mod tests;
