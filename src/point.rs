use core::fmt;

/// One recorded GPS fix marking a corner of the walked boundary.
///
/// The sequence id preserves insertion order and gives the point a stable
/// identity for undo; it is assigned by the session and never reused.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub seq: u64,
}

impl GeoPoint {
    pub fn in_wgs84_bounds(lat: f64, lon: f64) -> bool {
        (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "geo(lat: {:.5}, lon: {:.5}, seq: {})",
            self.lat, self.lon, self.seq
        )
    }
}

/// A waypoint projected onto the local tangent plane, in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
}

impl PlanePoint {
    pub fn x_y(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl fmt::Display for PlanePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane(x: {:.2}, y: {:.2})", self.x, self.y)
    }
}

/// Axis-aligned extent of a walked boundary, in degrees.
#[derive(Clone, Debug)]
pub struct GeoExtent {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoExtent {
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = GeoExtent {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(points.iter().fold(init, |acc, curr| GeoExtent {
            min_lat: acc.min_lat.min(curr.lat),
            max_lat: acc.max_lat.max(curr.lat),
            min_lon: acc.min_lon.min(curr.lon),
            max_lon: acc.max_lon.max(curr.lon),
        }))
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

impl fmt::Display for GeoExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extent(lat: [{:.5}, {:.5}], lon: [{:.5}, {:.5}])",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}
