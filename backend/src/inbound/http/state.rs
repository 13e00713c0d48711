//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{RequestCommand, RequestQuery, TechniciansQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub requests: Arc<dyn RequestCommand>,
    pub requests_query: Arc<dyn RequestQuery>,
    pub technicians: Arc<dyn TechniciansQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use helpdesk::domain::ports::{
    ///     FixtureRequestCommand, FixtureRequestQuery, FixtureTechniciansQuery,
    /// };
    /// use helpdesk::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureRequestCommand),
    ///     Arc::new(FixtureRequestQuery),
    ///     Arc::new(FixtureTechniciansQuery),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(
        requests: Arc<dyn RequestCommand>,
        requests_query: Arc<dyn RequestQuery>,
        technicians: Arc<dyn TechniciansQuery>,
    ) -> Self {
        Self {
            requests,
            requests_query,
            technicians,
        }
    }
}
