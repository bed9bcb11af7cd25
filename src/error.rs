use thiserror::Error;

use crate::session::SessionState;

/// Failure modes of the positioning layer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("no position fix available")]
    Unavailable,
    #[error("timed out waiting for a position fix")]
    Timeout,
}

/// Recoverable, operator-facing failures of the measurement engine.
///
/// Every condition stays distinct so the caller can show a specific message
/// and offer a retry. A failing operation leaves the session unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("cannot {op} while the session is {state}")]
    InvalidStateTransition {
        op: &'static str,
        state: SessionState,
    },
    #[error("coordinate out of range: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("no waypoints recorded")]
    EmptySession,
    #[error("need at least 3 waypoints to close a boundary, have {have}")]
    InsufficientPoints { have: usize },
    #[error("a fix request is already outstanding")]
    RequestInProgress,
    #[error(transparent)]
    Location(#[from] LocationError),
}
