//! Request correlation identifier.
//!
//! The identifier for the request being served lives in a Tokio task-local,
//! so error constructors and log statements can read it without threading it
//! through every call. Spawned tasks do not inherit it; wrap their futures in
//! [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header carrying the trace identifier on requests and responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// UUID correlating the log lines and error envelopes of one request.
///
/// ```
/// use bookshelf::TraceId;
///
/// let reused = TraceId::resolve(Some(" 2f1e0c9a-6d4b-4f7e-9a53-0c4f5b7d8e21 "));
/// assert_eq!(reused.to_string(), "2f1e0c9a-6d4b-4f7e-9a53-0c4f5b7d8e21");
///
/// let fresh = TraceId::resolve(Some("not-a-uuid"));
/// assert_ne!(fresh, reused);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random (v4) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Reuse a caller-supplied identifier when it parses as a UUID
    /// (surrounding whitespace ignored), otherwise generate one.
    #[must_use]
    pub fn resolve(inbound: Option<&str>) -> Self {
        inbound
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
