//! Map coordinates and feature geometry

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geometry-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("A {kind} requires at least {required} vertices to be saved (got {actual})")]
    InsufficientVertices {
        kind: GeometryKind,
        required: usize,
        actual: usize,
    },

    #[error("A Point takes exactly one vertex (got {0})")]
    TooManyVertices(usize),
}

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar view of the coordinate (x = longitude, y = latitude)
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.lng, self.lat)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self::new(v.y, v.x)
    }

    /// Average of two coordinates, treating the map as locally planar
    pub fn midpoint(self, other: LatLng) -> LatLng {
        Self::from_dvec2((self.to_dvec2() + other.to_dvec2()) * 0.5)
    }

    /// GeoJSON position order
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Kind of geometry a feature type is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
        }
    }

    /// Minimum number of vertices a completed shape of this kind needs
    pub fn min_vertices(&self) -> usize {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature geometry
///
/// Polygon rings are stored open: the closing edge from the last vertex back
/// to the first is implicit. The first ring is the outer boundary, any
/// further rings are holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(LatLng),
    LineString(Vec<LatLng>),
    Polygon(Vec<Vec<LatLng>>),
}

impl Geometry {
    /// Build a geometry of the given kind from a finished vertex sequence
    pub fn from_vertices(kind: GeometryKind, vertices: Vec<LatLng>) -> Result<Self, GeometryError> {
        let vertices = match kind {
            GeometryKind::Polygon => open_ring(vertices),
            _ => vertices,
        };

        let required = kind.min_vertices();
        if vertices.len() < required {
            return Err(GeometryError::InsufficientVertices {
                kind,
                required,
                actual: vertices.len(),
            });
        }

        match kind {
            GeometryKind::Point => match vertices.as_slice() {
                [position] => Ok(Geometry::Point(*position)),
                _ => Err(GeometryError::TooManyVertices(vertices.len())),
            },
            GeometryKind::LineString => Ok(Geometry::LineString(vertices)),
            GeometryKind::Polygon => Ok(Geometry::Polygon(vec![vertices])),
        }
    }

    /// Replace the vertices of this geometry, keeping its kind
    ///
    /// Holes of a polygon are kept as they are; only the outer ring changes.
    pub fn reshaped(&self, vertices: Vec<LatLng>) -> Result<Self, GeometryError> {
        let mut reshaped = Self::from_vertices(self.kind(), vertices)?;
        if let (Geometry::Polygon(old_rings), Geometry::Polygon(new_rings)) = (self, &mut reshaped) {
            new_rings.extend(old_rings.iter().skip(1).cloned());
        }
        Ok(reshaped)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Outer boundary ring if this is a polygon
    pub fn outer_ring(&self) -> Option<&[LatLng]> {
        match self {
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice),
            _ => None,
        }
    }

    /// Number of holes in a polygon (zero for other kinds)
    pub fn hole_count(&self) -> usize {
        match self {
            Geometry::Polygon(rings) => rings.len().saturating_sub(1),
            _ => 0,
        }
    }

    /// Vertices the map widget shows for editing
    pub fn vertices(&self) -> Vec<LatLng> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(points) => points.clone(),
            Geometry::Polygon(rings) => rings.first().cloned().unwrap_or_default(),
        }
    }
}

/// Drop a repeated closing vertex so the ring is stored open
fn open_ring(mut ring: Vec<LatLng>) -> Vec<LatLng> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// A straight segment between two coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: LatLng,
    pub end: LatLng,
}

impl Segment {
    pub const fn new(start: LatLng, end: LatLng) -> Self {
        Self { start, end }
    }

    /// Same endpoints in either order, compared exactly
    pub fn same_endpoints(&self, other: &Segment) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }

    pub fn midpoint(&self) -> LatLng {
        self.start.midpoint(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<LatLng> {
        vec![
            LatLng::new(55.50, 10.09),
            LatLng::new(55.51, 10.10),
            LatLng::new(55.50, 10.11),
        ]
    }

    #[test]
    fn test_polygon_from_vertices() {
        let geometry = Geometry::from_vertices(GeometryKind::Polygon, triangle()).unwrap();
        assert_eq!(geometry.kind(), GeometryKind::Polygon);
        assert_eq!(geometry.outer_ring().unwrap().len(), 3);
    }

    #[test]
    fn test_closed_ring_is_opened() {
        let mut ring = triangle();
        ring.push(ring[0]);
        let geometry = Geometry::from_vertices(GeometryKind::Polygon, ring).unwrap();
        assert_eq!(geometry.outer_ring().unwrap(), triangle().as_slice());
    }

    #[test]
    fn test_minimum_vertices() {
        let err = Geometry::from_vertices(GeometryKind::Polygon, triangle()[..2].to_vec());
        assert_eq!(
            err,
            Err(GeometryError::InsufficientVertices {
                kind: GeometryKind::Polygon,
                required: 3,
                actual: 2,
            })
        );

        let err = Geometry::from_vertices(GeometryKind::LineString, triangle()[..1].to_vec());
        assert!(matches!(
            err,
            Err(GeometryError::InsufficientVertices { required: 2, .. })
        ));

        let err = Geometry::from_vertices(GeometryKind::Point, triangle());
        assert_eq!(err, Err(GeometryError::TooManyVertices(3)));
    }

    #[test]
    fn test_reshape_keeps_holes() {
        let hole = vec![
            LatLng::new(55.501, 10.095),
            LatLng::new(55.502, 10.096),
            LatLng::new(55.501, 10.097),
        ];
        let geometry = Geometry::Polygon(vec![triangle(), hole.clone()]);

        let mut moved = triangle();
        moved[2] = LatLng::new(55.49, 10.12);
        let reshaped = geometry.reshaped(moved.clone()).unwrap();

        assert_eq!(reshaped, Geometry::Polygon(vec![moved, hole]));
        assert_eq!(reshaped.hole_count(), 1);
    }

    #[test]
    fn test_segment_equality_is_undirected() {
        let a = LatLng::new(1.0, 2.0);
        let b = LatLng::new(3.0, 4.0);
        let c = LatLng::new(3.0, 4.000_000_1);

        assert!(Segment::new(a, b).same_endpoints(&Segment::new(b, a)));
        assert!(Segment::new(a, b).same_endpoints(&Segment::new(a, b)));
        assert!(!Segment::new(a, b).same_endpoints(&Segment::new(a, c)));
    }

    #[test]
    fn test_midpoint() {
        let mid = Segment::new(LatLng::new(0.0, 0.0), LatLng::new(2.0, 4.0)).midpoint();
        approx::assert_relative_eq!(mid.lat, 1.0);
        approx::assert_relative_eq!(mid.lng, 2.0);
    }
}
