use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::geometry::{GeometrySource, SegmentGeometry};
use crate::Error;

/// Converts resolved segments to a `GeoJSON` `FeatureCollection`, one
/// line string per segment.
pub fn segments_to_geojson(segments: &[SegmentGeometry]) -> Result<FeatureCollection, Error> {
    let features = segments
        .iter()
        .map(segment_feature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn segments_to_geojson_string(segments: &[SegmentGeometry]) -> Result<String, Error> {
    serde_json::to_string(&segments_to_geojson(segments)?)
        .map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn segment_feature(segment: &SegmentGeometry) -> Result<Feature, Error> {
    let coords: Vec<Coord<f64>> = segment
        .geometry
        .coordinates
        .iter()
        .map(|&[x, y]| Coord { x, y })
        .collect();
    let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

    let source = match segment.geometry.source {
        GeometrySource::Road => "road",
        GeometrySource::StraightLine => "straight_line",
    };
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "segment_index": segment.index,
            "from": segment.start,
            "to": segment.end,
            "source": source,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
