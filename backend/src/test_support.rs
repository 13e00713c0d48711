//! In-memory adapters for integration tests.
//!
//! Compiled for unit tests and behind the `test-support` feature so suites in
//! `tests/` can drive the full service without PostgreSQL.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;

use crate::domain::ports::{
    HelpRequestRepository, HelpRequestRepositoryError, TechnicianRepository,
    TechnicianRepositoryError,
};
use crate::domain::{
    Assignment, HelpRequest, NewHelpRequest, RequestId, RequestStatus, Technician, TechnicianId,
    TechnicianName, TechnicianValidationError,
};

#[derive(Debug, Default)]
struct StoreState {
    requests: Vec<HelpRequest>,
    technicians: Vec<Technician>,
    next_request_id: i64,
    next_technician_id: i64,
}

/// Shared in-memory store implementing both repository ports with the same
/// ordering and `ON DELETE SET NULL` semantics as the PostgreSQL adapters.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                next_request_id: 1,
                next_technician_id: 1,
                ..StoreState::default()
            })),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a technician row unconditionally, duplicates included.
    pub fn add_technician(&self, name: &str) -> Result<Technician, TechnicianValidationError> {
        let name = TechnicianName::new(name)?;
        let mut state = self.lock();
        let technician = new_technician(&mut state, name, self.clock.utc())?;
        state.technicians.push(technician.clone());
        Ok(technician)
    }

    /// Delete a technician row as `DELETE FROM technicians` would.
    pub fn delete_technician(&self, id: TechnicianId) {
        let mut state = self.lock();
        state.technicians.retain(|t| t.id() != id);
        state.requests = std::mem::take(&mut state.requests)
            .into_iter()
            .map(|request| clear_reference(request, id))
            .collect();
    }

    pub fn technician_count(&self) -> usize {
        self.lock().technicians.len()
    }
}

fn new_technician(
    state: &mut StoreState,
    name: TechnicianName,
    created_at: DateTime<Utc>,
) -> Result<Technician, TechnicianValidationError> {
    let id = TechnicianId::new(state.next_technician_id)?;
    state.next_technician_id += 1;
    Ok(Technician::new(id, name, created_at))
}

fn clear_reference(request: HelpRequest, id: TechnicianId) -> HelpRequest {
    match request.assignment() {
        Some(assignment) if assignment.technician_id() == id => request.without_technician(),
        _ => request,
    }
}

fn newest_first(requests: &mut [HelpRequest]) {
    requests.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
}

fn update_request<F>(state: &mut StoreState, id: RequestId, change: F) -> Option<HelpRequest>
where
    F: FnOnce(HelpRequest) -> HelpRequest,
{
    let slot = state.requests.iter_mut().find(|request| request.id() == id)?;
    let updated = change(slot.clone());
    *slot = updated.clone();
    Some(updated)
}

#[async_trait]
impl HelpRequestRepository for InMemoryStore {
    async fn insert(
        &self,
        request: &NewHelpRequest,
    ) -> Result<HelpRequest, HelpRequestRepositoryError> {
        let mut state = self.lock();
        let id = RequestId::new(state.next_request_id)
            .map_err(|err| HelpRequestRepositoryError::query(err.to_string()))?;
        state.next_request_id += 1;
        let stored = HelpRequest::registered(id, request.clone());
        state.requests.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        let mut requests = self.lock().requests.clone();
        newest_first(&mut requests);
        Ok(requests)
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        Ok(self.lock().requests.iter().find(|r| r.id() == id).cloned())
    }

    async fn list_by_technician(
        &self,
        technician_id: TechnicianId,
    ) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        let mut requests: Vec<HelpRequest> = self
            .lock()
            .requests
            .iter()
            .filter(|r| r.assignment().map(Assignment::technician_id) == Some(technician_id))
            .cloned()
            .collect();
        newest_first(&mut requests);
        Ok(requests)
    }

    async fn assign(
        &self,
        id: RequestId,
        assignment: &Assignment,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let mut state = self.lock();
        let exists = state
            .technicians
            .iter()
            .any(|t| t.id() == assignment.technician_id());
        if !exists {
            return Err(HelpRequestRepositoryError::query(
                "referenced row does not exist",
            ));
        }
        Ok(update_request(&mut state, id, |request| {
            request.assign(assignment.clone())
        }))
    }

    async fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let mut state = self.lock();
        Ok(update_request(&mut state, id, |request| {
            request.with_status(status)
        }))
    }
}

#[async_trait]
impl TechnicianRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Technician>, TechnicianRepositoryError> {
        let mut technicians = self.lock().technicians.clone();
        technicians.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(technicians)
    }

    async fn find_by_name(
        &self,
        name: &TechnicianName,
    ) -> Result<Option<Technician>, TechnicianRepositoryError> {
        Ok(self
            .lock()
            .technicians
            .iter()
            .filter(|t| t.name() == name)
            .max_by_key(|t| (t.created_at(), t.id()))
            .cloned())
    }

    async fn insert_missing(
        &self,
        names: &[TechnicianName],
    ) -> Result<usize, TechnicianRepositoryError> {
        let mut state = self.lock();
        let now = self.clock.utc();
        let mut inserted = 0;
        for name in names {
            if state.technicians.iter().any(|t| t.name() == name) {
                continue;
            }
            let technician = new_technician(&mut state, name.clone(), now)
                .map_err(|err| TechnicianRepositoryError::query(err.to_string()))?;
            state.technicians.push(technician);
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn merge_duplicate(
        &self,
        duplicate: TechnicianId,
        survivor: TechnicianId,
    ) -> Result<(), TechnicianRepositoryError> {
        let mut state = self.lock();
        let survivor_name = state
            .technicians
            .iter()
            .find(|t| t.id() == survivor)
            .map(|t| t.name().clone())
            .ok_or_else(|| TechnicianRepositoryError::query("survivor does not exist"))?;
        state.requests = std::mem::take(&mut state.requests)
            .into_iter()
            .map(|request| match request.assignment() {
                Some(assignment) if assignment.technician_id() == duplicate => {
                    let status = request.status();
                    request
                        .assign(Assignment::new(survivor, survivor_name.clone()))
                        .with_status(status)
                }
                _ => request,
            })
            .collect();
        state.technicians.retain(|t| t.id() != duplicate);
        Ok(())
    }
}

/// Clock whose current instant tests move by hand.
#[derive(Debug, Clone)]
pub struct MutableClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MutableClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
