//! Edit state

use fieldmap_core::{Feature, Geometry, Properties, PropertyForm};
use uuid::Uuid;

/// Copy of a feature taken when editing starts
#[derive(Debug, Clone, PartialEq)]
pub struct EditSnapshot {
    pub geometry: Geometry,
    pub properties: Properties,
}

impl EditSnapshot {
    pub fn of(feature: &Feature) -> Self {
        Self {
            geometry: feature.geometry.clone(),
            properties: feature.properties.clone(),
        }
    }
}

/// State while an existing feature is edited
#[derive(Debug, Clone)]
pub struct EditState {
    /// Feature being edited
    pub feature_id: Uuid,
    /// Pre-edit geometry and properties, restored on cancel
    pub snapshot: EditSnapshot,
    pub form: PropertyForm,
    /// Whether the geometry changed since editing started
    pub geometry_changed: bool,
}

impl EditState {
    pub fn new(feature: &Feature, form: PropertyForm) -> Self {
        Self {
            feature_id: feature.id,
            snapshot: EditSnapshot::of(feature),
            form,
            geometry_changed: false,
        }
    }
}
