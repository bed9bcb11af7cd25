use crate::point::{GeoPoint, PlanePoint};

/// Earth mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Equirectangular projection onto the tangent plane at a fixed origin.
///
/// Meridians are scaled by the cosine of the origin latitude, parallels by
/// the Earth mean radius. The error stays well under a percent for a plot a
/// few kilometers across; the approximation degrades for boundaries spanning
/// hundreds of kilometers and breaks near the poles or across the
/// antimeridian. A walked field boundary never gets there.
pub struct TangentPlaneProjection {
    lat0_rad: f64,
    lon0_rad: f64,
    cos_lat0: f64,
}

impl TangentPlaneProjection {
    pub fn make(origin: &GeoPoint) -> TangentPlaneProjection {
        let lat0_rad = origin.lat.to_radians();
        TangentPlaneProjection {
            lat0_rad,
            lon0_rad: origin.lon.to_radians(),
            cos_lat0: lat0_rad.cos(),
        }
    }

    pub fn project(&self, point: &GeoPoint) -> PlanePoint {
        if !GeoPoint::in_wgs84_bounds(point.lat, point.lon) {
            log::warn!("not in wgs84 bounds: {}", point);
        }
        let x = EARTH_RADIUS_M * (point.lon.to_radians() - self.lon0_rad) * self.cos_lat0;
        let y = EARTH_RADIUS_M * (point.lat.to_radians() - self.lat0_rad);
        PlanePoint { x, y }
    }
}
