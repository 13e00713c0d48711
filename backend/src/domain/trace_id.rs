//! Correlation id for help desk calls.
//!
//! Every HTTP call and every geofence watcher task runs with a [`TraceId`] in
//! tokio task-local storage. Error constructors pick it up so the `traceId`
//! in an error body matches the `trace-id` response header and the log lines.
//!
//! Task-locals do not follow `tokio::spawn`; spawned work must enter its own
//! scope through [`TraceId::scope`] or [`TraceId::scope_new`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header carrying the id in both directions.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    pub(crate) static TRACE_ID: TraceId;
}

/// UUID correlating one call (or one watcher task) across logs and errors.
///
/// # Examples
/// ```
/// use helpdesk::TraceId;
///
/// let id: TraceId = "5f0c6a4e-2d1b-4c3e-9a7f-1b2c3d4e5f60".parse().expect("uuid");
/// assert_eq!(id.to_string(), "5f0c6a4e-2d1b-4c3e-9a7f-1b2c3d4e5f60");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(pub(crate) Uuid);

impl TraceId {
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Reuse a caller-supplied header value when it is a UUID, otherwise mint
    /// a fresh id.
    #[must_use]
    pub fn from_header_or_new(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Id of the enclosing scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id: TraceId = "00000000-0000-0000-0000-000000000000".parse().expect("uuid");
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run `fut` under a freshly generated id; used for background tasks.
    pub async fn scope_new<Fut>(fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        Self::scope(Self::generate(), fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn scope_exposes_the_id_only_inside() {
        let id = TraceId::generate();

        let inside = TraceId::scope(id, async { TraceId::current() }).await;

        assert_eq!(inside, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn spawned_tasks_need_their_own_scope() {
        let id = TraceId::generate();

        let (inherited, fresh) = TraceId::scope(id, async {
            let inherited = tokio::spawn(async { TraceId::current() })
                .await
                .expect("task joins");
            let fresh = tokio::spawn(TraceId::scope_new(async { TraceId::current() }))
                .await
                .expect("task joins");
            (inherited, fresh)
        })
        .await;

        assert!(inherited.is_none());
        assert!(fresh.is_some_and(|other| other != id));
    }

    #[rstest]
    #[case(Some("5f0c6a4e-2d1b-4c3e-9a7f-1b2c3d4e5f60"), true)]
    #[case(Some(" 5f0c6a4e-2d1b-4c3e-9a7f-1b2c3d4e5f60 "), true)]
    #[case(Some("request-42"), false)]
    #[case(None, false)]
    fn header_values_are_reused_when_valid(#[case] raw: Option<&str>, #[case] reused: bool) {
        let id = TraceId::from_header_or_new(raw);

        assert_eq!(
            id.to_string() == "5f0c6a4e-2d1b-4c3e-9a7f-1b2c3d4e5f60",
            reused
        );
    }
}
