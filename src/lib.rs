//! Field boundary measurement engine.
//!
//! A field operator walks the perimeter of a plot, records a GPS fix at
//! each corner, and gets an estimated enclosed area:
//!
//! - [`session::MeasurementSession`] holds the ordered waypoints and the
//!   idle / measuring / closed lifecycle around them.
//! - [`estimator::compute`] turns the walk into square meters (with acre
//!   and hectare conversions) via a tangent-plane projection and the
//!   shoelace formula.
//! - [`location::Positioner`] drives one-at-a-time fix acquisition against
//!   a [`location::LocationSource`], with a timeout and reset-safe
//!   cancellation through the session epoch.
//! - [`replay`] feeds boundaries recorded as KML, GPX or GeoJSON through a
//!   session, and [`reference`] provides the geo crate's geodesic figure to
//!   compare against.

pub mod error;
pub mod estimator;
pub mod location;
pub mod point;
pub mod projection;
pub mod reference;
pub mod replay;
pub mod session;

pub use error::{LocationError, MeasureError};
pub use estimator::AreaResult;
pub use location::{Fix, LocationSource, Positioner};
pub use point::GeoPoint;
pub use session::{MeasurementSession, SessionState};
