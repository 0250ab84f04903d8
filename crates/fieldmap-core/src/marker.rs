//! Edge marker overlay
//!
//! One label marker per edge, placed at the segment midpoint and showing the
//! edge's headland count.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::edge::EdgeEntity;
use crate::geometry::LatLng;

/// Icon geometry of edge markers, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Square icon size
    pub icon_size: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { icon_size: 32.0 }
    }
}

impl MarkerStyle {
    /// Icon anchor, centered on the marker position
    pub fn anchor(&self) -> [f32; 2] {
        [self.icon_size / 2.0, self.icon_size / 2.0]
    }
}

/// Label marker bound to an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeMarker {
    /// Unique identifier
    pub id: Uuid,
    /// Edge this marker labels
    pub edge_id: Uuid,
    /// Segment midpoint
    pub position: LatLng,
    pub label: String,
    pub icon_size: f32,
    pub icon_anchor: [f32; 2],
}

/// Text shown on an edge marker
pub fn headland_label(headland_num: u32) -> String {
    headland_num.to_string()
}

/// Markers of all live edges, keyed by edge ID
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerOverlay {
    markers: HashMap<Uuid, EdgeMarker>,
    style: MarkerStyle,
}

impl MarkerOverlay {
    pub fn new(style: MarkerStyle) -> Self {
        Self {
            markers: HashMap::new(),
            style,
        }
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }

    /// Create the marker for an edge
    ///
    /// An existing marker for the same edge is replaced, so an edge never
    /// has two.
    pub fn attach(&mut self, edge: &EdgeEntity) -> Uuid {
        let marker = EdgeMarker {
            id: Uuid::new_v4(),
            edge_id: edge.id,
            position: edge.segment.midpoint(),
            label: headland_label(edge.headland_num),
            icon_size: self.style.icon_size,
            icon_anchor: self.style.anchor(),
        };
        let id = marker.id;
        if let Some(old) = self.markers.insert(edge.id, marker) {
            tracing::debug!("Replaced marker {} of edge {}", old.id, edge.id);
        }
        id
    }

    /// Remove the marker of an edge
    pub fn detach(&mut self, edge_id: Uuid) -> Option<EdgeMarker> {
        self.markers.remove(&edge_id)
    }

    /// Rebuild an edge's marker so its label matches the edge
    pub fn refresh(&mut self, edge: &EdgeEntity) -> Uuid {
        self.detach(edge.id);
        self.attach(edge)
    }

    /// Get the marker of an edge
    pub fn for_edge(&self, edge_id: Uuid) -> Option<&EdgeMarker> {
        self.markers.get(&edge_id)
    }

    /// Find the edge a marker belongs to (marker click)
    pub fn edge_of(&self, marker_id: Uuid) -> Option<Uuid> {
        self.markers
            .values()
            .find(|m| m.id == marker_id)
            .map(|m| m.edge_id)
    }

    /// Iterate over all markers
    pub fn iter(&self) -> impl Iterator<Item = &EdgeMarker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
