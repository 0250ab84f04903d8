//! Field map document
//!
//! Owns the drawn features, the edges derived from field blocks and
//! obstacles, and the marker overlay labelling those edges. Every mutation
//! that touches a parent polygon goes through here so that the edge set and
//! the overlay never drift apart.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::edge::{EdgeEntity, EdgeError, EdgeSet, plan_edges};
use crate::feature::{Feature, FeatureStore};
use crate::geometry::{Geometry, GeometryKind};
use crate::marker::{MarkerOverlay, MarkerStyle};
use crate::schema::{EDGE, HEADLAND_NUM, Properties, SchemaError, SchemaRegistry};

/// Headland count used when neither the parent nor the edge schema has one
const FALLBACK_HEADLAND: u32 = 1;

/// Document-level errors
#[derive(Debug, Clone, Error)]
pub enum FieldMapError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Edge error: {0}")]
    Edge(#[from] EdgeError),

    #[error("Feature not found: {0}")]
    FeatureNotFound(Uuid),

    #[error("Feature type {type_name} is drawn as {expected}, got {actual}")]
    GeometryMismatch {
        type_name: String,
        expected: GeometryKind,
        actual: GeometryKind,
    },
}

/// Stroke settings shared by all features and edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStyle {
    /// Stroke color for types without a schema color
    pub fallback_color: String,
    pub edge_weight: f32,
    pub edge_opacity: f32,
    pub marker: MarkerStyle,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            fallback_color: "#3388ff".to_string(),
            edge_weight: 5.0,
            edge_opacity: 0.7,
            marker: MarkerStyle::default(),
        }
    }
}

/// Outcome of one edge derivation
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDerivation {
    pub parent_id: Uuid,
    /// New edges, in boundary order
    pub edge_ids: Vec<Uuid>,
    /// Number of previous edges that were removed
    pub removed: usize,
    /// Number of new edges that kept a previous headland count
    pub preserved: usize,
}

/// Object counts per map layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerCounts {
    pub features: usize,
    pub polygons: usize,
    pub edges: usize,
    pub markers: usize,
}

/// The map document
#[derive(Debug, Clone)]
pub struct FieldMap {
    registry: SchemaRegistry,
    features: FeatureStore,
    edges: EdgeSet,
    markers: MarkerOverlay,
    style: MapStyle,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin(), MapStyle::default())
    }
}

impl FieldMap {
    pub fn new(registry: SchemaRegistry, style: MapStyle) -> Self {
        Self {
            registry,
            features: FeatureStore::new(),
            edges: EdgeSet::new(),
            markers: MarkerOverlay::new(style.marker),
            style,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    pub fn markers(&self) -> &MarkerOverlay {
        &self.markers
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    /// Get a feature by ID
    pub fn feature(&self, id: Uuid) -> Option<&Feature> {
        self.features.get(id)
    }

    /// Get an edge by ID
    pub fn edge(&self, id: Uuid) -> Option<&EdgeEntity> {
        self.edges.get(id)
    }

    /// Whether edges are derived from this feature
    pub fn derives_edges(&self, feature: &Feature) -> bool {
        self.registry
            .get(&feature.type_name)
            .is_some_and(|s| s.derives_edges)
    }

    /// Stroke color of a feature type
    pub fn color_of(&self, type_name: &str) -> &str {
        self.registry
            .get(type_name)
            .and_then(|s| s.color.as_deref())
            .unwrap_or(&self.style.fallback_color)
    }

    /// Stroke color of edges
    pub fn edge_color(&self) -> &str {
        self.color_of(EDGE)
    }

    // ============== Feature Management ==============

    /// Add a feature without deriving edges
    pub fn add_feature(
        &mut self,
        type_name: &str,
        geometry: Geometry,
        properties: Properties,
    ) -> Result<Uuid, FieldMapError> {
        let schema = self.registry.schema(type_name)?;
        let expected = schema.geometry_kind()?;
        if expected != geometry.kind() {
            return Err(FieldMapError::GeometryMismatch {
                type_name: type_name.to_string(),
                expected,
                actual: geometry.kind(),
            });
        }

        let id = self.features.insert(Feature::new(type_name, geometry, properties));
        info!("Added {} feature: {}", type_name, id);
        Ok(id)
    }

    /// Replace a feature's geometry without re-deriving its edges
    pub fn set_geometry(&mut self, id: Uuid, geometry: Geometry) -> Result<(), FieldMapError> {
        let feature = self
            .features
            .get_mut(id)
            .ok_or(FieldMapError::FeatureNotFound(id))?;
        if feature.geometry.kind() != geometry.kind() {
            return Err(FieldMapError::GeometryMismatch {
                type_name: feature.type_name.clone(),
                expected: feature.geometry.kind(),
                actual: geometry.kind(),
            });
        }
        feature.geometry = geometry;
        Ok(())
    }

    /// Replace a feature's properties
    pub fn set_properties(&mut self, id: Uuid, properties: Properties) -> Result<(), FieldMapError> {
        let feature = self
            .features
            .get_mut(id)
            .ok_or(FieldMapError::FeatureNotFound(id))?;
        feature.properties = properties;
        Ok(())
    }

    /// Remove a feature together with its edges and their markers
    pub fn remove_feature(&mut self, id: Uuid) -> Option<Feature> {
        let removed_edges = self.remove_edges(id);
        let feature = self.features.remove(id);
        match &feature {
            Some(f) => info!(
                "Removed {} feature {} ({} edges)",
                f.type_name, id, removed_edges
            ),
            None => warn!("Could not find feature {} to remove", id),
        }
        feature
    }

    // ============== Edge Derivation ==============

    /// Recompute the edges of a field block or obstacle
    ///
    /// The parent's previous edges and markers are removed and one edge is
    /// created per segment of its outer ring. A new edge keeps the headland
    /// count of a previous edge on the same segment, otherwise it takes the
    /// parent's `headlandNum`. Holes are ignored.
    ///
    /// The parent is validated before anything is removed; on error the
    /// document is unchanged.
    pub fn derive_edges(&mut self, parent_id: Uuid) -> Result<EdgeDerivation, EdgeError> {
        let parent = self
            .features
            .get(parent_id)
            .ok_or(EdgeError::ParentNotFound(parent_id))?;
        if !self.derives_edges(parent) {
            return Err(EdgeError::NotEdgeParent(parent.type_name.clone()));
        }
        let ring = parent
            .geometry
            .outer_ring()
            .ok_or(EdgeError::NotPolygon(parent.geometry.kind()))?
            .to_vec();
        if ring.len() < 3 {
            return Err(EdgeError::RingTooShort(ring.len()));
        }
        if parent.geometry.hole_count() > 0 {
            debug!(
                "Parent {} has {} holes; only the outer ring gets edges",
                parent_id,
                parent.geometry.hole_count()
            );
        }
        let default_headland = self.default_headland(parent);

        let previous = self.edges.take_for_parent(parent_id);
        for old in &previous {
            self.markers.detach(old.id);
        }

        let planned = plan_edges(&ring, &previous, default_headland);
        let preserved = planned.iter().filter(|p| p.preserved).count();
        let edge_ids = planned
            .into_iter()
            .map(|p| {
                let edge = EdgeEntity::new(parent_id, p.segment, p.headland_num);
                self.markers.attach(&edge);
                self.edges.push(edge)
            })
            .collect::<Vec<_>>();

        info!(
            "Derived {} edges for {} ({} removed, {} preserved)",
            edge_ids.len(),
            parent_id,
            previous.len(),
            preserved
        );

        Ok(EdgeDerivation {
            parent_id,
            edge_ids,
            removed: previous.len(),
            preserved,
        })
    }

    /// Remove all edges of a parent and their markers
    ///
    /// Returns the number of removed edges; zero when the parent has none.
    pub fn remove_edges(&mut self, parent_id: Uuid) -> usize {
        let removed = self.edges.take_for_parent(parent_id);
        for edge in &removed {
            self.markers.detach(edge.id);
        }
        if !removed.is_empty() {
            debug!("Removed {} edges of {}", removed.len(), parent_id);
        }
        removed.len()
    }

    /// Change an edge's headland count and relabel its marker
    pub fn set_headland(&mut self, edge_id: Uuid, headland_num: u32) -> Result<(), EdgeError> {
        let edge = self
            .edges
            .get_mut(edge_id)
            .ok_or(EdgeError::EdgeNotFound(edge_id))?;
        edge.headland_num = headland_num;
        let edge = edge.clone();
        self.markers.refresh(&edge);
        info!("Edge {} headlandNum set to {}", edge_id, headland_num);
        Ok(())
    }

    /// Headland count new edges of `parent` start with
    fn default_headland(&self, parent: &Feature) -> u32 {
        let own = parent
            .properties
            .get(HEADLAND_NUM)
            .and_then(|v| v.as_int())
            .and_then(|v| u32::try_from(v).ok());
        if let Some(value) = own {
            return value;
        }

        warn!(
            "Parent {} has no usable {}; using the edge default",
            parent.id, HEADLAND_NUM
        );
        self.registry
            .get(EDGE)
            .and_then(|s| s.default_value(HEADLAND_NUM))
            .and_then(|v| v.as_int())
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(FALLBACK_HEADLAND)
    }

    /// Object counts per layer
    pub fn counts(&self) -> LayerCounts {
        LayerCounts {
            features: self.features.len(),
            polygons: self.features.iter().filter(|f| f.is_polygon()).count(),
            edges: self.edges.len(),
            markers: self.markers.len(),
        }
    }
}
