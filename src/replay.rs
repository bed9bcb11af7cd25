//! Replay input: boundary walks recorded as KML, GPX or GeoJSON.

use thiserror::Error;

/// One recorded walk: (lat, lon) corners in recorded order.
pub type RecordedWalk = Vec<(f64, f64)>;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("no boundary found in {path}")]
    NoBoundary { path: String },
    #[error("unsupported file extension: {path}")]
    UnsupportedFormat { path: String },
}

mod lockml {
    use super::RecordedWalk;
    use kml::Kml;
    use kml::types::Geometry;

    fn find_first_polygon(kml: &Kml) -> Option<geo::Polygon> {
        match kml {
            Kml::KmlDocument(doc) => doc.elements.iter().find_map(find_first_polygon),
            Kml::Document { elements, .. } => elements.iter().find_map(find_first_polygon),
            Kml::Folder(z) => z.elements.iter().find_map(find_first_polygon),
            Kml::Placemark(p) => {
                if let Some(Geometry::Polygon(ls)) = &p.geometry {
                    Some(geo::Polygon::from(ls.clone()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn read(content: &str) -> Result<Vec<RecordedWalk>, String> {
        let kml: Kml = content.parse().map_err(|e| format!("{:?}", e))?;
        // KML can nest placemarks in folders and documents; take the first
        // polygon found.
        let Some(geometry) = find_first_polygon(&kml) else {
            return Ok(Vec::new());
        };
        let walk: RecordedWalk = geometry
            .exterior()
            .0
            .iter()
            .map(|p| (p.y, p.x))
            .collect();
        Ok(vec![walk])
    }
}

mod locgpx {
    use super::RecordedWalk;
    use gpx::Gpx;
    use std::io::Cursor;

    pub fn read(content: &str) -> Result<Vec<RecordedWalk>, String> {
        let gpx: Gpx = gpx::read(Cursor::new(content)).map_err(|e| e.to_string())?;
        // Each track segment is one recorded walk.
        Ok(gpx
            .tracks
            .iter()
            .flat_map(|track| {
                track.segments.iter().map(|segment| {
                    segment
                        .points
                        .iter()
                        .map(|point| (point.point().y(), point.point().x()))
                        .collect()
                })
            })
            .collect())
    }
}

mod locjson {
    use super::RecordedWalk;
    use geojson::{GeoJson, Geometry, Value};

    pub fn read(content: &str) -> Result<Vec<RecordedWalk>, String> {
        let geojson: GeoJson = content.parse().map_err(|e: geojson::Error| e.to_string())?;
        Ok(match geojson {
            GeoJson::FeatureCollection(collection) => collection
                .features
                .iter()
                .filter_map(|feature| feature.geometry.as_ref().and_then(geometry_to_walk))
                .collect(),
            GeoJson::Feature(feature) => feature
                .geometry
                .as_ref()
                .and_then(geometry_to_walk)
                .into_iter()
                .collect(),
            GeoJson::Geometry(geometry) => geometry_to_walk(&geometry).into_iter().collect(),
        })
    }

    fn ring_to_walk(ring: &[Vec<f64>]) -> RecordedWalk {
        ring.iter().map(|p| (p[1], p[0])).collect()
    }

    fn geometry_to_walk(geometry: &Geometry) -> Option<RecordedWalk> {
        match &geometry.value {
            Value::Polygon(coords) => coords.first().map(|ring| ring_to_walk(ring)),
            Value::MultiPolygon(multi_coords) => multi_coords
                .first()
                .and_then(|coords| coords.first())
                .map(|ring| ring_to_walk(ring)),
            _ => None,
        }
    }
}

// Recorded rings close themselves by repeating the first corner; a walked
// session does not, the boundary closes implicitly.
fn open_ring(walk: &mut RecordedWalk) {
    while walk.len() > 1 && walk.last() == walk.first() {
        walk.pop();
    }
}

pub fn read_walks(path: &str) -> Result<Vec<RecordedWalk>, ReplayError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_string(),
        source,
    })?;
    let parsed = if path.ends_with("kml") {
        lockml::read(&content)
    } else if path.ends_with("gpx") {
        locgpx::read(&content)
    } else if path.ends_with("geojson") || path.ends_with("json") {
        locjson::read(&content)
    } else {
        return Err(ReplayError::UnsupportedFormat {
            path: path.to_string(),
        });
    };
    let mut walks = parsed.map_err(|message| ReplayError::Parse {
        path: path.to_string(),
        message,
    })?;
    walks.retain(|walk| !walk.is_empty());
    if walks.is_empty() {
        return Err(ReplayError::NoBoundary {
            path: path.to_string(),
        });
    }
    for walk in &mut walks {
        open_ring(walk);
    }
    log::debug!("replay: {} walk(s) from {}", walks.len(), path);
    Ok(walks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>
              9.0,47.0,0 9.002,47.0,0 9.001,47.002,0 9.0,47.0,0
            </coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#;

    const GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="field-area" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="47.0" lon="9.0"></trkpt>
      <trkpt lat="47.0" lon="9.002"></trkpt>
      <trkpt lat="47.002" lon="9.001"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    const GEOJSON: &str = r#"{
  "type": "Feature",
  "properties": {},
  "geometry": {
    "type": "Polygon",
    "coordinates": [[[9.0, 47.0], [9.002, 47.0], [9.001, 47.002], [9.0, 47.0]]]
  }
}"#;

    #[test]
    fn test_kml_walk() {
        let walks = lockml::read(KML).unwrap();
        assert_eq!(walks.len(), 1);
        assert_eq!(walks[0][0], (47.0, 9.0));
        assert_eq!(walks[0][1], (47.0, 9.002));
    }

    #[test]
    fn test_gpx_walk() {
        let walks = locgpx::read(GPX).unwrap();
        assert_eq!(walks.len(), 1);
        assert_eq!(
            walks[0],
            vec![(47.0, 9.0), (47.0, 9.002), (47.002, 9.001)]
        );
    }

    #[test]
    fn test_geojson_walk() {
        let walks = locjson::read(GEOJSON).unwrap();
        assert_eq!(walks.len(), 1);
        assert_eq!(walks[0].len(), 4);
        assert_eq!(walks[0][0], (47.0, 9.0));
    }

    #[test]
    fn test_recorded_ring_is_opened() {
        let mut walk = vec![(47.0, 9.0), (47.0, 9.002), (47.002, 9.001), (47.0, 9.0)];
        open_ring(&mut walk);
        assert_eq!(walk.len(), 3);
        assert_ne!(walk.first(), walk.last());
    }

    #[test]
    fn test_open_ring_keeps_unclosed_walks() {
        let mut walk = vec![(47.0, 9.0), (47.0, 9.002), (47.002, 9.001)];
        open_ring(&mut walk);
        assert_eq!(walk.len(), 3);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_walks("/tmp/boundary.csv").unwrap_err();
        assert!(matches!(err, ReplayError::UnsupportedFormat { .. }));
    }
}
