use geo::algorithm::geodesic_area::GeodesicArea;
use geo::orient::Direction;
use geo::{Area, Coord, Orient, Polygon};

use crate::point::GeoPoint;
use crate::projection::TangentPlaneProjection;

/// Geodesic area of the boundary per the geo crate, in square meters.
/// Independent of the engine's own estimator; used by the CLI comparison
/// output and to sanity-check the planar approximation in tests.
pub fn geodesic_area(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let coords: Vec<Coord<f64>> = points
        .iter()
        .map(|p| Coord { x: p.lon, y: p.lat })
        .collect();

    let mut geo_polygon = Polygon::new(coords.into(), vec![]);
    geo_polygon = geo_polygon.orient(Direction::Default);

    geo_polygon.geodesic_area_unsigned()
}

/// Planar area of the projected boundary per the geo crate.
pub fn planar_area(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let proj = TangentPlaneProjection::make(&points[0]);
    let coords: Vec<Coord<f64>> = points
        .iter()
        .map(|p| {
            let plane = proj.project(p);
            Coord {
                x: plane.x,
                y: plane.y,
            }
        })
        .collect();

    let mut geo_polygon = Polygon::new(coords.into(), vec![]);
    geo_polygon = geo_polygon.orient(Direction::Default);

    geo_polygon.unsigned_area()
}
