use tracing::info;

use crate::error::{Error, Result};
use crate::model::{TimeslotEntry, VisitorSession};
use crate::repository::RecordStore;
use crate::service::aggregation::AggregationEngine;
use crate::time::{slot_window, Clock};

pub const DEFAULT_SLOT_MINUTES: u32 = 15;

/// Builds one day's visitor session for one attraction, then commits it to the
/// store and the counter indices.
pub struct VisitorSessionRecorder<'a, S: RecordStore, C: Clock> {
    store: &'a S,
    clock: C,
    slot_minutes: u32,
    attraction: Option<String>,
    timeslots: Vec<TimeslotEntry>,
}

impl<'a, S: RecordStore, C: Clock> VisitorSessionRecorder<'a, S, C> {
    pub fn new(store: &'a S, clock: C) -> Self {
        Self {
            store,
            clock,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            attraction: None,
            timeslots: Vec::new(),
        }
    }

    pub fn with_slot_minutes(mut self, minutes: u32) -> Self {
        self.slot_minutes = minutes;
        self
    }

    pub fn select_attraction(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid("Attraction name is empty"));
        }
        self.attraction = Some(name.to_string());
        Ok(())
    }

    pub fn attraction(&self) -> Option<&str> {
        self.attraction.as_deref()
    }

    pub fn timeslots(&self) -> &[TimeslotEntry] {
        &self.timeslots
    }

    /// Opens a timeslot at the current time with the configured label window.
    pub fn add_timeslot(&mut self, count: i64) -> Result<&TimeslotEntry> {
        if self.attraction.is_none() {
            return Err(Error::invalid("Select an attraction first"));
        }
        if count <= 0 {
            return Err(Error::invalid("Visitor count must be a positive number"));
        }
        let count = count as u64;
        if self.running_total().checked_add(count).is_none() {
            return Err(Error::invalid("Visitor count exceeds the session total range"));
        }

        let (start_time, end_time) = slot_window(self.clock.now(), self.slot_minutes);
        self.timeslots.push(TimeslotEntry {
            start_time,
            end_time,
            count,
        });
        Ok(&self.timeslots[self.timeslots.len() - 1])
    }

    pub fn remove_timeslot(&mut self, index: usize) -> Result<TimeslotEntry> {
        if index >= self.timeslots.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.timeslots.len(),
            });
        }
        Ok(self.timeslots.remove(index))
    }

    /// `add_timeslot` keeps this sum within `u64`.
    pub fn running_total(&self) -> u64 {
        self.timeslots.iter().map(|t| t.count).sum()
    }

    /// Clears the draft, attraction included.
    pub fn reset(&mut self) {
        self.attraction = None;
        self.timeslots.clear();
    }

    /// Persists the session dated today and folds its total into the counters,
    /// all in one store commit.
    ///
    /// The draft is only cleared on success. After any error nothing was written
    /// and the draft is left as it was, so committing again is safe.
    pub fn commit(&mut self) -> Result<VisitorSession> {
        let attraction = match &self.attraction {
            Some(a) => a.clone(),
            None => return Err(Error::invalid("Select an attraction first")),
        };
        if self.timeslots.is_empty() {
            return Err(Error::invalid("Add at least one timeslot before saving"));
        }

        let session = VisitorSession::new(attraction, self.clock.today(), self.timeslots.clone())?;
        AggregationEngine::new(self.store).record_session(&session)?;

        info!(
            session = %session.id,
            attraction = %session.attraction,
            total = session.total_visitors,
            "visitor session committed"
        );
        self.reset();
        Ok(session)
    }
}
