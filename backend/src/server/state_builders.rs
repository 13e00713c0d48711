//! Builders wiring domain services over repository adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use helpdesk::domain::ports::{HelpRequestRepository, TechnicianRepository};
use helpdesk::domain::{RequestWorkflowService, TechnicianDirectoryService};
use helpdesk::inbound::http::state::HttpState;
use helpdesk::outbound::persistence::{
    DbPool, DieselHelpRequestRepository, DieselTechnicianRepository,
};

/// Wire the workflow and directory services over any repository pair.
pub(crate) fn build_http_state<R, T>(
    requests: Arc<R>,
    technicians: Arc<T>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    R: HelpRequestRepository + 'static,
    T: TechnicianRepository + 'static,
{
    let workflow = Arc::new(RequestWorkflowService::new(
        requests,
        Arc::clone(&technicians),
        clock,
    ));
    let directory = Arc::new(TechnicianDirectoryService::new(technicians));
    HttpState::new(workflow.clone(), workflow, directory)
}

/// Production state backed by PostgreSQL and the system clock.
pub(crate) fn build_diesel_http_state(pool: &DbPool) -> HttpState {
    build_http_state(
        Arc::new(DieselHelpRequestRepository::new(pool.clone())),
        Arc::new(DieselTechnicianRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    )
}
