//! Headland editing on derived edges

use fieldmap_core::{AttributeKind, EDGE, FieldError, FormField, HEADLAND_NUM, PropertyForm};
use tracing::warn;
use uuid::Uuid;

use super::EditorSession;
use crate::error::SessionError;

impl EditorSession {
    /// Property form of an edge, holding only its headland count
    pub fn edge_form(&self, edge_id: Uuid) -> Result<PropertyForm, SessionError> {
        let edge = self.map.edge(edge_id).ok_or_else(|| {
            warn!("Edge not found: {}", edge_id);
            SessionError::NotFound(edge_id)
        })?;
        let display_name = self
            .map
            .registry()
            .get(EDGE)
            .map_or("Edge", |s| s.display_name.as_str());

        Ok(PropertyForm {
            title: format!("Editing: {}", display_name),
            fields: vec![FormField {
                name: HEADLAND_NUM.to_string(),
                kind: AttributeKind::Int,
                value: edge.headland_num.to_string(),
                required: true,
            }],
        })
    }

    /// Edge labelled by a marker (marker click)
    pub fn marker_edge(&self, marker_id: Uuid) -> Result<Uuid, SessionError> {
        self.map.markers().edge_of(marker_id).ok_or_else(|| {
            warn!("Marker not found: {}", marker_id);
            SessionError::NotFound(marker_id)
        })
    }

    /// Set an edge's headland count from the text of its form
    ///
    /// Works in every mode; an edge of a feature under edit keeps the new
    /// count through the save if its segment does not move.
    pub fn edit_headland(&mut self, edge_id: Uuid, text: &str) -> Result<(), SessionError> {
        if self.map.edge(edge_id).is_none() {
            warn!("Edge not found: {}", edge_id);
            return Err(SessionError::NotFound(edge_id));
        }

        let value = AttributeKind::Int.parse(HEADLAND_NUM, text)?;
        let headland_num = value
            .as_int()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| FieldError::InvalidValue {
                field: HEADLAND_NUM.to_string(),
                kind: AttributeKind::Int,
                value: text.to_string(),
            })?;

        self.map.set_headland(edge_id, headland_num)?;
        Ok(())
    }
}
