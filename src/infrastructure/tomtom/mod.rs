//! TomTom Traffic API implementation

mod provider;

pub use provider::{TomTomProvider, INCIDENT_FIELDS};
