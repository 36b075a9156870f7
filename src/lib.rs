// src/lib.rs
//! Read-only spreadsheet grid viewer.
//!
//! [`coordinator::FetchCoordinator`] keeps the displayed data bound to the
//! latest spreadsheet identifier, [`cloud_handler::CloudHandler`] fetches
//! payloads over HTTP and [`grid::render`] projects a payload into a
//! header-decorated grid.

pub mod cloud_handler;
pub mod config;
pub mod coordinator;
pub mod data_types;
pub mod error;
pub mod grid;

pub use cloud_handler::CloudHandler;
pub use coordinator::{Effect, Event, FetchCoordinator, FetchTicket, Phase};
pub use data_types::{CellValue, SpreadsheetId, TabularPayload};
pub use error::{FetchError, PayloadError};
pub use grid::GridView;
