//! GeoJSON-shaped views of the map
//!
//! Features export as `{ type, geometry, properties: { type: <typeName>, ... } }`
//! and edges additionally carry `parentId` and `headlandNum`. Positions are
//! `[lng, lat]` and polygon rings are closed, as GeoJSON expects.

use serde_json::{Map, Value, json};

use crate::document::FieldMap;
use crate::edge::EdgeEntity;
use crate::feature::Feature;
use crate::geometry::{Geometry, LatLng};
use crate::schema::{EDGE, HEADLAND_NUM};

fn positions(points: &[LatLng]) -> Value {
    Value::Array(points.iter().map(|p| json!(p.to_lng_lat())).collect())
}

fn closed_ring(ring: &[LatLng]) -> Value {
    let mut closed = ring.to_vec();
    if let Some(first) = ring.first() {
        closed.push(*first);
    }
    positions(&closed)
}

impl Geometry {
    /// GeoJSON geometry object
    pub fn to_geojson(&self) -> Value {
        match self {
            Geometry::Point(p) => json!({ "type": "Point", "coordinates": p.to_lng_lat() }),
            Geometry::LineString(points) => {
                json!({ "type": "LineString", "coordinates": positions(points) })
            }
            Geometry::Polygon(rings) => {
                let rings: Vec<Value> = rings.iter().map(|r| closed_ring(r)).collect();
                json!({ "type": "Polygon", "coordinates": rings })
            }
        }
    }
}

impl Feature {
    /// GeoJSON feature object
    pub fn to_geojson(&self) -> Value {
        let mut properties = Map::new();
        properties.insert("type".into(), Value::String(self.type_name.clone()));
        for (name, value) in self.properties.iter() {
            properties.insert(name.to_string(), json!(value));
        }

        json!({
            "type": "Feature",
            "id": self.id.to_string(),
            "geometry": self.geometry.to_geojson(),
            "properties": properties,
        })
    }
}

impl EdgeEntity {
    /// GeoJSON feature object
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "id": self.id.to_string(),
            "geometry": {
                "type": "LineString",
                "coordinates": positions(&[self.segment.start, self.segment.end]),
            },
            "properties": {
                "type": EDGE,
                "parentId": self.parent_id.to_string(),
                HEADLAND_NUM: self.headland_num,
            },
        })
    }
}

impl FieldMap {
    /// All features followed by all edges as a GeoJSON feature collection
    pub fn to_feature_collection(&self) -> Value {
        let features: Vec<Value> = self
            .features()
            .iter()
            .map(Feature::to_geojson)
            .chain(self.edges().iter().map(EdgeEntity::to_geojson))
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}
