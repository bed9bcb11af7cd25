use core::fmt;
use std::collections::BTreeMap;

use crate::error::MeasureError;
use crate::point::{GeoPoint, PlanePoint};
use crate::projection::TangentPlaneProjection;

pub const SQUARE_METERS_PER_ACRE: f64 = 4046.8564224;
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Enclosed-area estimate for one boundary walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaResult {
    pub square_meters: f64,
}

impl AreaResult {
    pub fn acres(&self) -> f64 {
        self.square_meters / SQUARE_METERS_PER_ACRE
    }

    pub fn hectares(&self) -> f64 {
        self.square_meters / SQUARE_METERS_PER_HECTARE
    }

    /// Unit name to converted value, in deterministic order, for display
    /// layers that render a unit table.
    pub fn derived_units(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("acres", self.acres()),
            ("hectares", self.hectares()),
            ("square_meters", self.square_meters),
        ])
    }
}

impl fmt::Display for AreaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} m2 ({:.3} acres, {:.3} ha)",
            self.square_meters,
            self.acres(),
            self.hectares()
        )
    }
}

/// Estimate the enclosed area of a walked boundary.
///
/// The waypoints are projected onto the tangent plane at the first point and
/// run through the shoelace formula in walk order; the polygon is implicitly
/// closed from the last point back to the first. Winding direction does not
/// affect the magnitude. A self-intersecting walk (a figure-eight) is not
/// detected; its shoelace value is well-defined and returned as recorded,
/// even though it may not match what the operator meant to enclose.
pub fn compute(points: &[GeoPoint]) -> Result<AreaResult, MeasureError> {
    if points.len() < 3 {
        return Err(MeasureError::InsufficientPoints { have: points.len() });
    }
    let proj = TangentPlaneProjection::make(&points[0]);
    let plane: Vec<PlanePoint> = points.iter().map(|p| proj.project(p)).collect();
    let square_meters = shoelace(&plane).abs();
    log::debug!(
        "estimate: {:.1} m2 over {} waypoints",
        square_meters,
        points.len()
    );
    Ok(AreaResult { square_meters })
}

/// Signed planar area, positive for counter-clockwise walk order.
fn shoelace(polygon: &[PlanePoint]) -> f64 {
    let mut sum = 0.0;
    for i in 0..polygon.len() {
        let p1 = &polygon[i];
        let p2 = &polygon[(i + 1) % polygon.len()];
        sum += p1.x * p2.y - p2.x * p1.y;
    }
    0.5 * sum
}

/// Length of the closed boundary in meters, return edge included.
pub fn perimeter_meters(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let proj = TangentPlaneProjection::make(&points[0]);
    let plane: Vec<PlanePoint> = points.iter().map(|p| proj.project(p)).collect();
    let mut sum = 0.0;
    for i in 0..plane.len() {
        let p1 = &plane[i];
        let p2 = &plane[(i + 1) % plane.len()];
        sum += ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt();
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(corners: &[(f64, f64)]) -> Vec<GeoPoint> {
        corners
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| GeoPoint {
                lat,
                lon,
                seq: i as u64,
            })
            .collect()
    }

    // A square of 0.001 deg of arc per side on the equator, about 111 m.
    const SMALL_SQUARE: [(f64, f64); 4] = [
        (0.0, 0.0),
        (0.0, 0.001),
        (0.001, 0.001),
        (0.001, 0.0),
    ];

    #[test]
    fn test_too_few_points() {
        for n in 0..3 {
            let points = walk(&SMALL_SQUARE[..n]);
            assert_eq!(
                compute(&points),
                Err(MeasureError::InsufficientPoints { have: n })
            );
        }
    }

    #[test]
    fn test_small_square_area() {
        let result = compute(&walk(&SMALL_SQUARE)).unwrap();
        let expected = 12_380.0;
        assert!(
            (result.square_meters - expected).abs() / expected < 0.02,
            "got {} m2",
            result.square_meters
        );
        assert!((result.acres() - 3.06).abs() < 0.05, "got {} acres", result.acres());
        assert!((result.hectares() - 1.238).abs() < 0.02);
    }

    #[test]
    fn test_collinear_walk_has_zero_area() {
        let points = walk(&[(0.0, 0.0), (0.0, 0.001), (0.0, 0.002)]);
        assert!(compute(&points).unwrap().square_meters.abs() < 1e-6);
    }

    #[test]
    fn test_noncollinear_walk_has_positive_area() {
        let points = walk(&[(0.0, 0.0), (0.0, 0.001), (0.001, 0.0005)]);
        assert!(compute(&points).unwrap().square_meters > 0.0);
    }

    #[test]
    fn test_winding_direction_does_not_change_magnitude() {
        let forward = compute(&walk(&SMALL_SQUARE)).unwrap().square_meters;
        let mut reversed = SMALL_SQUARE.to_vec();
        reversed.reverse();
        let backward = compute(&walk(&reversed)).unwrap().square_meters;
        // The projection origin moves with the first point, so the two
        // figures agree to the planar approximation, not to the bit.
        assert!((forward - backward).abs() < 0.1);
    }

    #[test]
    fn test_starting_corner_does_not_change_area() {
        let base = compute(&walk(&SMALL_SQUARE)).unwrap().square_meters;
        for shift in 1..SMALL_SQUARE.len() {
            let mut rotated = SMALL_SQUARE.to_vec();
            rotated.rotate_left(shift);
            let area = compute(&walk(&rotated)).unwrap().square_meters;
            assert!(
                (area - base).abs() < 0.1,
                "shift {}: {} vs {}",
                shift,
                area,
                base
            );
        }
    }

    #[test]
    fn test_symmetric_figure_eight_cancels() {
        // Crossed walk order over the small square; the two lobes carry
        // opposite signs and cancel exactly.
        let points = walk(&[(0.0, 0.0), (0.0, 0.001), (0.001, 0.0), (0.001, 0.001)]);
        assert!(compute(&points).unwrap().square_meters < 1.0);
    }

    #[test]
    fn test_unit_conversions() {
        let one_acre = AreaResult {
            square_meters: SQUARE_METERS_PER_ACRE,
        };
        assert!((one_acre.acres() - 1.0).abs() < 1e-12);
        let units = one_acre.derived_units();
        assert_eq!(
            units.keys().copied().collect::<Vec<_>>(),
            vec!["acres", "hectares", "square_meters"]
        );
        assert!((units["hectares"] - 0.40468564224).abs() < 1e-12);
    }

    #[test]
    fn test_perimeter_of_small_square() {
        let perimeter = perimeter_meters(&walk(&SMALL_SQUARE));
        assert!(
            (perimeter - 4.0 * 111.19).abs() < 2.0,
            "got {} m",
            perimeter
        );
    }

    #[test]
    fn test_perimeter_below_two_points() {
        assert_eq!(perimeter_meters(&[]), 0.0);
        assert_eq!(perimeter_meters(&walk(&SMALL_SQUARE[..1])), 0.0);
    }
}
