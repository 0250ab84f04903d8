//! Drawn features and their store

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Geometry, GeometryKind};
use crate::schema::Properties;

/// A feature drawn on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier, stable for the feature's lifetime
    pub id: Uuid,
    /// Schema type name, e.g. `BaseFieldBlock`
    pub type_name: String,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Feature {
    /// Create a new feature with a fresh ID
    pub fn new(type_name: impl Into<String>, geometry: Geometry, properties: Properties) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_name: type_name.into(),
            geometry,
            properties,
        }
    }

    pub fn is_polygon(&self) -> bool {
        self.geometry.kind() == GeometryKind::Polygon
    }
}

/// All drawn features, keyed by ID
///
/// Insertion order is kept so listings and exports are stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureStore {
    features: HashMap<Uuid, Feature>,
    order: Vec<Uuid>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature, replacing any feature with the same ID
    pub fn insert(&mut self, feature: Feature) -> Uuid {
        let id = feature.id;
        if self.features.insert(id, feature).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Get a feature by ID
    pub fn get(&self, id: Uuid) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Get a mutable feature by ID
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Feature> {
        self.features.get_mut(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.features.contains_key(&id)
    }

    /// Remove a feature
    pub fn remove(&mut self, id: Uuid) -> Option<Feature> {
        let feature = self.features.remove(&id)?;
        self.order.retain(|&f| f != id);
        Some(feature)
    }

    /// Iterate over features in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.order.iter().filter_map(|id| self.features.get(id))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
