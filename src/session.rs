use core::fmt;

use crate::error::MeasureError;
use crate::estimator::{self, AreaResult};
use crate::location::TaggedFix;
use crate::point::{GeoExtent, GeoPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Measuring,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Measuring => "measuring",
            SessionState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

/// One operator's boundary walk: the ordered waypoints plus the lifecycle
/// around them.
///
/// Walk order is the source of truth for the polygon. Points are never
/// reordered, sorted, or deduplicated; a corner recorded twice in a row is
/// a data-quality concern for the consumer, not something to drop here.
pub struct MeasurementSession {
    state: SessionState,
    points: Vec<GeoPoint>,
    last_result: Option<AreaResult>,
    epoch: u64,
    next_seq: u64,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementSession {
    pub fn new() -> MeasurementSession {
        MeasurementSession {
            state: SessionState::Idle,
            points: Vec::new(),
            last_result: None,
            epoch: 0,
            next_seq: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn last_result(&self) -> Option<AreaResult> {
        self.last_result
    }

    /// Generation counter, bumped on every reset. Fixes requested under an
    /// older epoch are discarded on arrival.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn extent(&self) -> Option<GeoExtent> {
        GeoExtent::from_points(&self.points)
    }

    pub fn info(&self) {
        log::info!("session: state: {}", self.state);
        log::info!("session: len: {}", self.points.len());
        if let Some(extent) = self.extent() {
            log::info!("session: extent: {}", extent);
        }
        if let Some(result) = &self.last_result {
            log::info!("session: result: {}", result);
        }
    }

    /// Begin a new walk. Only valid while idle.
    pub fn start(&mut self) -> Result<(), MeasureError> {
        if self.state != SessionState::Idle {
            return Err(MeasureError::InvalidStateTransition {
                op: "start",
                state: self.state,
            });
        }
        self.state = SessionState::Measuring;
        log::info!("session: measuring");
        Ok(())
    }

    /// Record the next corner of the walk.
    ///
    /// Valid while measuring or after a close; adding a corner to a closed
    /// walk re-opens it and drops the stored result, which no longer
    /// describes the polygon.
    pub fn add_point(&mut self, lat: f64, lon: f64) -> Result<(), MeasureError> {
        if self.state == SessionState::Idle {
            return Err(MeasureError::InvalidStateTransition {
                op: "add a point",
                state: self.state,
            });
        }
        if !GeoPoint::in_wgs84_bounds(lat, lon) {
            return Err(MeasureError::InvalidCoordinate { lat, lon });
        }
        if self.state == SessionState::Closed {
            self.state = SessionState::Measuring;
            self.last_result = None;
        }
        let point = GeoPoint {
            lat,
            lon,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        log::debug!("session: append {}", point);
        self.points.push(point);
        Ok(())
    }

    /// Undo the most recently recorded corner.
    pub fn remove_last_point(&mut self) -> Result<GeoPoint, MeasureError> {
        match self.points.pop() {
            Some(point) => {
                // The polygon changed; any stored result is stale.
                self.last_result = None;
                if self.state == SessionState::Closed {
                    self.state = SessionState::Measuring;
                }
                log::debug!("session: undo {}", point);
                Ok(point)
            }
            None => Err(MeasureError::EmptySession),
        }
    }

    /// Clear the walk and return to idle. Always succeeds; bumping the
    /// epoch invalidates any fix request still in flight.
    pub fn reset(&mut self) {
        self.points.clear();
        self.last_result = None;
        self.state = SessionState::Idle;
        self.epoch += 1;
        log::info!("session: reset (epoch {})", self.epoch);
    }

    /// Close the boundary over the recorded walk order and store the
    /// estimate. Fails below 3 waypoints and leaves the session untouched;
    /// recomputing a closed walk is allowed and stays closed.
    pub fn compute(&mut self) -> Result<AreaResult, MeasureError> {
        let result = estimator::compute(&self.points)?;
        self.last_result = Some(result);
        self.state = SessionState::Closed;
        log::info!("session: closed, {}", result);
        Ok(result)
    }

    /// Append a fix delivered by the positioning driver, unless the session
    /// was reset while the fix was in flight. Returns false when the fix was
    /// stale and discarded.
    pub fn apply_fix(&mut self, fix: TaggedFix) -> Result<bool, MeasureError> {
        if fix.epoch != self.epoch {
            log::debug!(
                "session: discarding fix from epoch {} (now {})",
                fix.epoch,
                self.epoch
            );
            return Ok(false);
        }
        self.add_point(fix.lat, fix.lon)?;
        Ok(true)
    }
}
