//! Session selection store
//!
//! Holds the flights the user has picked during a session. The store is an
//! ordinary value: create it when the session starts, hand `&mut` access to
//! whatever handles user events, and drop it when the session ends.

use crate::Flight;
use serde::Serialize;
use tracing::debug;

/// What a [`SelectionStore::toggle`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The flight had no usable id
    Ignored,
}

/// Ordered, duplicate-free set of selected flights keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionStore {
    flights: Vec<Flight>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the flight if its id is not selected yet, otherwise remove it.
    ///
    /// Toggling the same flight twice leaves the store unchanged.
    pub fn toggle(&mut self, flight: Flight) -> ToggleOutcome {
        let Some(id) = flight.selection_id() else {
            debug!("Ignoring selection toggle for flight without id");
            return ToggleOutcome::Ignored;
        };

        let outcome = match self.position(id) {
            Some(index) => {
                self.flights.remove(index);
                ToggleOutcome::Removed
            }
            None => {
                self.flights.push(flight);
                ToggleOutcome::Added
            }
        };
        debug!(outcome = ?outcome, selected = self.flights.len(), "Selection toggled");
        outcome
    }

    pub fn clear(&mut self) {
        debug!(cleared = self.flights.len(), "Selection cleared");
        self.flights.clear();
    }

    /// Selected flights in the order they were added
    pub fn all(&self) -> &[Flight] {
        &self.flights
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.position(id.trim()).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Flight> {
        self.position(id.trim()).map(|index| &self.flights[index])
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.flights
            .iter()
            .position(|f| f.selection_id() == Some(id))
    }
}
