//! Boundary Edges
//!
//! Field blocks and obstacles carry one edge per boundary segment. Each edge
//! holds its own headland count, which the user can change independently of
//! the parent polygon.

mod derive;

pub use derive::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::{GeometryKind, Segment};

/// Edge-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdgeError {
    #[error("Parent feature not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Feature type {0} does not derive edges")]
    NotEdgeParent(String),

    #[error("Edge parent must be a Polygon, got {0}")]
    NotPolygon(GeometryKind),

    #[error("Edge parent ring needs at least 3 vertices (got {0})")]
    RingTooShort(usize),

    #[error("Edge not found: {0}")]
    EdgeNotFound(Uuid),
}

/// A boundary segment derived from a parent polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntity {
    /// Unique identifier
    pub id: Uuid,
    /// Feature this edge was derived from
    pub parent_id: Uuid,
    pub segment: Segment,
    /// Number of headland passes along this edge
    pub headland_num: u32,
}

impl EdgeEntity {
    pub fn new(parent_id: Uuid, segment: Segment, headland_num: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id,
            segment,
            headland_num,
        }
    }
}

/// Live edges of all parents, in creation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeSet {
    edges: Vec<EdgeEntity>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, edge: EdgeEntity) -> Uuid {
        let id = edge.id;
        self.edges.push(edge);
        id
    }

    /// Get an edge by ID
    pub fn get(&self, id: Uuid) -> Option<&EdgeEntity> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> Option<&mut EdgeEntity> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Edges derived from a parent, in boundary order
    pub fn for_parent(&self, parent_id: Uuid) -> impl Iterator<Item = &EdgeEntity> {
        self.edges.iter().filter(move |e| e.parent_id == parent_id)
    }

    /// Remove and return all edges of a parent, keeping their order
    pub(crate) fn take_for_parent(&mut self, parent_id: Uuid) -> Vec<EdgeEntity> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| e.parent_id == parent_id);
        self.edges = kept;
        taken
    }

    /// Iterate over all edges
    pub fn iter(&self) -> impl Iterator<Item = &EdgeEntity> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LatLng;

    fn seg(a: f64, b: f64) -> Segment {
        Segment::new(LatLng::new(a, a), LatLng::new(b, b))
    }

    #[test]
    fn test_take_for_parent_keeps_order() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let mut set = EdgeSet::new();
        let a = set.push(EdgeEntity::new(p1, seg(0.0, 1.0), 2));
        set.push(EdgeEntity::new(p2, seg(5.0, 6.0), 1));
        let c = set.push(EdgeEntity::new(p1, seg(1.0, 2.0), 2));

        let taken = set.take_for_parent(p1);
        assert_eq!(taken.iter().map(|e| e.id).collect::<Vec<_>>(), [a, c]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.for_parent(p1).count(), 0);
        assert_eq!(set.for_parent(p2).count(), 1);
    }

    #[test]
    fn test_lookup() {
        let parent = Uuid::new_v4();
        let mut set = EdgeSet::new();
        let id = set.push(EdgeEntity::new(parent, seg(0.0, 1.0), 3));

        assert_eq!(set.get(id).unwrap().headland_num, 3);
        set.get_mut(id).unwrap().headland_num = 4;
        assert_eq!(set.get(id).unwrap().headland_num, 4);
        assert!(set.get(Uuid::new_v4()).is_none());
    }
}
