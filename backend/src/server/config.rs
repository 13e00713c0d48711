//! HTTP server configuration object.

use std::net::SocketAddr;

use helpdesk::outbound::persistence::DbPool;

/// Everything the server needs once startup has finished.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self { bind_addr, db_pool }
    }
}
