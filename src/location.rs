//! Positioning contract and the one-request-at-a-time acquisition driver.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::error::{LocationError, MeasureError};
use crate::session::MeasurementSession;

/// A single geographic fix from the positioning layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fix {
    pub lat: f64,
    pub lon: f64,
    /// Estimated error radius in meters, when the receiver reports one.
    pub accuracy: Option<f64>,
}

/// A fix stamped with the session epoch current when it was requested.
/// [`MeasurementSession::apply_fix`] discards it if the epochs no longer
/// match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaggedFix {
    pub epoch: u64,
    pub lat: f64,
    pub lon: f64,
    pub accuracy: Option<f64>,
}

/// Contract required from the host's positioning layer: block until one fix
/// is available or fail. No latency bound is assumed, which is why the
/// driver runs requests on a worker thread.
pub trait LocationSource {
    fn request_fix(&self) -> Result<Fix, LocationError>;
}

const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(20);

struct PendingFix {
    epoch: u64,
    rx: Receiver<Result<Fix, LocationError>>,
}

/// Drives fix acquisition against a [`LocationSource`], one request at a
/// time.
///
/// Each request runs on its own worker thread and the result comes back over
/// a channel, stamped with the session epoch taken at request time. A
/// request that outlives the timeout fails with [`LocationError::Timeout`];
/// the worker's late result is dropped with the channel.
pub struct Positioner<S> {
    source: Arc<S>,
    timeout: Duration,
    pending: Option<PendingFix>,
}

impl<S: LocationSource + Send + Sync + 'static> Positioner<S> {
    pub fn new(source: S) -> Positioner<S> {
        Positioner::with_timeout(source, DEFAULT_FIX_TIMEOUT)
    }

    pub fn with_timeout(source: S, timeout: Duration) -> Positioner<S> {
        Positioner {
            source: Arc::new(source),
            timeout,
            pending: None,
        }
    }

    pub fn pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start one fix request for the session's current epoch. A second
    /// request while one is outstanding is rejected.
    pub fn begin(&mut self, session: &MeasurementSession) -> Result<(), MeasureError> {
        if self.pending.is_some() {
            return Err(MeasureError::RequestInProgress);
        }
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let epoch = session.epoch();
        thread::spawn(move || {
            // The receiver may already be gone if the caller timed out;
            // then the late fix is dropped with the channel.
            let _ = tx.send(source.request_fix());
        });
        self.pending = Some(PendingFix { epoch, rx });
        log::debug!("positioner: fix requested (epoch {})", epoch);
        Ok(())
    }

    /// Block for the outstanding fix and append it to the session.
    ///
    /// Ok(true) when a corner was appended; Ok(false) when no request was
    /// outstanding or the fix arrived for an earlier epoch and was
    /// discarded. A timeout clears the outstanding slot so the operator can
    /// retry.
    pub fn wait(&mut self, session: &mut MeasurementSession) -> Result<bool, MeasureError> {
        let pending = match self.pending.take() {
            Some(p) => p,
            None => return Ok(false),
        };
        match pending.rx.recv_timeout(self.timeout) {
            Ok(Ok(fix)) => session.apply_fix(TaggedFix {
                epoch: pending.epoch,
                lat: fix.lat,
                lon: fix.lon,
                accuracy: fix.accuracy,
            }),
            Ok(Err(e)) => Err(MeasureError::Location(e)),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("positioner: no fix within {:?}", self.timeout);
                Err(MeasureError::Location(LocationError::Timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Worker died without sending; report it as no position.
                Err(MeasureError::Location(LocationError::Unavailable))
            }
        }
    }

    /// Non-blocking variant for UI loops: None while the fix is still in
    /// flight, otherwise the same outcomes as [`Positioner::wait`].
    pub fn poll(&mut self, session: &mut MeasurementSession) -> Option<Result<bool, MeasureError>> {
        let pending = self.pending.take()?;
        match pending.rx.try_recv() {
            Ok(Ok(fix)) => Some(session.apply_fix(TaggedFix {
                epoch: pending.epoch,
                lat: fix.lat,
                lon: fix.lon,
                accuracy: fix.accuracy,
            })),
            Ok(Err(e)) => Some(Err(MeasureError::Location(e))),
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                None
            }
            Err(TryRecvError::Disconnected) => {
                Some(Err(MeasureError::Location(LocationError::Unavailable)))
            }
        }
    }
}
