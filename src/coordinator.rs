// src/coordinator.rs
//! Binds the current spreadsheet identifier to at most one live fetch.
//!
//! The coordinator never performs I/O itself. Every transition returns an
//! [`Effect`] and the host (the iced app, or a test) is responsible for running
//! the fetch a [`FetchTicket`] describes and feeding the outcome back through
//! [`Event::FetchResolved`]. A resolution is only applied when its ticket is the
//! current one, so results may arrive in any order.

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::data_types::{SpreadsheetId, TabularPayload};
use crate::error::FetchError;

/// One fetch association: an identifier plus the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: SpreadsheetId,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Fetching(SpreadsheetId),
    Loaded(SpreadsheetId),
    Errored(SpreadsheetId, FetchError),
}

#[derive(Debug, Clone)]
pub enum Event {
    IdentifierChanged(SpreadsheetId),
    FetchResolved(FetchTicket, Result<TabularPayload, FetchError>),
    Retry,
    Refresh,
}

/// What the host has to do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Fetch(FetchTicket),
    /// The snapshot was replaced.
    Render,
    /// The current fetch failed; the snapshot is unchanged.
    ShowError,
    /// The result belonged to a superseded association and was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct FetchCoordinator {
    phase: Phase,
    current: Option<FetchTicket>,
    next_generation: u64,
    payload: TabularPayload,
    loaded_from: Option<SpreadsheetId>,
    last_updated: Option<DateTime<Local>>,
}

impl Default for FetchCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchCoordinator {
    pub fn new() -> Self {
        FetchCoordinator {
            phase: Phase::Idle,
            current: None,
            next_generation: 0,
            payload: TabularPayload::empty(),
            loaded_from: None,
            last_updated: None,
        }
    }

    pub fn handle(&mut self, event: Event) -> Effect {
        match event {
            Event::IdentifierChanged(id) => self.change_identifier(id),
            Event::FetchResolved(ticket, result) => self.resolve(ticket, result),
            Event::Retry => match &self.phase {
                Phase::Errored(id, _) => {
                    let id = id.clone();
                    self.issue(id)
                }
                _ => Effect::None,
            },
            Event::Refresh => match &self.phase {
                Phase::Loaded(id) | Phase::Errored(id, _) => {
                    let id = id.clone();
                    self.issue(id)
                }
                _ => Effect::None,
            },
        }
    }

    /// Returns the ticket to fetch, or `None` when `id` is already current.
    pub fn on_identifier_change(&mut self, id: SpreadsheetId) -> Option<FetchTicket> {
        into_ticket(self.handle(Event::IdentifierChanged(id)))
    }

    pub fn on_fetch_resolved(
        &mut self,
        ticket: FetchTicket,
        result: Result<TabularPayload, FetchError>,
    ) -> Effect {
        self.handle(Event::FetchResolved(ticket, result))
    }

    /// Re-fetches the current identifier after a failure.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        into_ticket(self.handle(Event::Retry))
    }

    /// Re-fetches the current identifier unless a fetch is already in flight.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        into_ticket(self.handle(Event::Refresh))
    }

    fn change_identifier(&mut self, id: SpreadsheetId) -> Effect {
        if self.current_id() == Some(&id) {
            debug!("spreadsheet {} is already current, not refetching", id);
            return Effect::None;
        }
        self.issue(id)
    }

    // Issuing a new ticket is what makes every older one stale.
    fn issue(&mut self, id: SpreadsheetId) -> Effect {
        let ticket = FetchTicket {
            id: id.clone(),
            generation: self.next_generation,
        };
        self.next_generation += 1;
        debug!("issuing fetch {} for spreadsheet {}", ticket.generation, id);
        self.current = Some(ticket.clone());
        self.phase = Phase::Fetching(id);
        Effect::Fetch(ticket)
    }

    fn resolve(&mut self, ticket: FetchTicket, result: Result<TabularPayload, FetchError>) -> Effect {
        if self.current.as_ref() != Some(&ticket) || !matches!(self.phase, Phase::Fetching(_)) {
            debug!(
                "discarding stale result {} for spreadsheet {}",
                ticket.generation, ticket.id
            );
            return Effect::Discarded;
        }

        match result {
            Ok(payload) => {
                info!(
                    "spreadsheet {} loaded: {} rows x {} columns",
                    ticket.id,
                    payload.row_count(),
                    payload.column_count()
                );
                self.payload = payload;
                self.loaded_from = Some(ticket.id.clone());
                self.last_updated = Some(Local::now());
                self.phase = Phase::Loaded(ticket.id);
                Effect::Render
            }
            Err(err) => {
                warn!("spreadsheet {} failed to load: {}", ticket.id, err);
                self.phase = Phase::Errored(ticket.id, err);
                Effect::ShowError
            }
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn current_id(&self) -> Option<&SpreadsheetId> {
        self.current.as_ref().map(|ticket| &ticket.id)
    }

    pub fn current_ticket(&self) -> Option<&FetchTicket> {
        self.current.as_ref()
    }

    /// The snapshot on screen. May belong to an earlier identifier while a
    /// fetch is pending or after a failure; see [`Self::loaded_from`].
    pub fn payload(&self) -> &TabularPayload {
        &self.payload
    }

    pub fn loaded_from(&self) -> Option<&SpreadsheetId> {
        self.loaded_from.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.phase {
            Phase::Errored(_, err) => Some(err),
            _ => None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, Phase::Fetching(_))
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }
}

fn into_ticket(effect: Effect) -> Option<FetchTicket> {
    match effect {
        Effect::Fetch(ticket) => Some(ticket),
        _ => None,
    }
}
