//! Editing and deletion of existing features

use fieldmap_core::{LatLng, PropertyForm};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{CommittedFeature, EditorSession};
use crate::error::{PreconditionError, SessionError};
use crate::state::{EditState, EditorMode};

/// Popup text for features without properties
pub const NO_PROPERTIES: &str = "No properties set.";

/// Result of opening a feature for editing
#[derive(Debug, Clone, PartialEq)]
pub struct EditStarted {
    pub feature_id: Uuid,
    /// Vertices the map widget makes draggable
    pub vertices: Vec<LatLng>,
    pub form: PropertyForm,
    /// Previous edit that was saved to make room for this one
    pub auto_saved: Option<CommittedFeature>,
}

/// Updated vertices of one feature, reported by the map widget
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryEdit {
    pub feature_id: Uuid,
    pub vertices: Vec<LatLng>,
}

/// Result of a batch of geometry edit events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryEditOutcome {
    /// Features whose in-progress edit absorbed the new geometry
    pub live: Vec<Uuid>,
    /// Features saved immediately
    pub committed: Vec<CommittedFeature>,
}

/// Popup summary of a feature
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSummary {
    pub feature_id: Uuid,
    pub title: String,
    /// Property names and values in display order
    pub properties: Vec<(String, String)>,
}

impl FeatureSummary {
    /// Popup body, one line per property
    pub fn lines(&self) -> Vec<String> {
        if self.properties.is_empty() {
            return vec![NO_PROPERTIES.to_string()];
        }
        self.properties
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect()
    }
}

impl EditorSession {
    /// Summary shown when a feature is clicked
    pub fn describe(&self, id: Uuid) -> Result<FeatureSummary, SessionError> {
        let feature = self.map.feature(id).ok_or_else(|| {
            warn!("Feature not found: {}", id);
            SessionError::NotFound(id)
        })?;
        let title = self
            .map
            .registry()
            .get(&feature.type_name)
            .map(|s| s.display_name.clone())
            .unwrap_or_else(|| "Properties".to_string());

        Ok(FeatureSummary {
            feature_id: id,
            title,
            properties: feature
                .properties
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
    }

    // ============== Editing ==============

    /// Open an existing feature for editing
    ///
    /// A different feature that is already being edited is saved first. If
    /// that save fails the earlier edit stays open and its error is returned.
    pub fn begin_edit(&mut self, id: Uuid) -> Result<EditStarted, SessionError> {
        if self.mode.is_creating() {
            warn!("Cannot edit {} during the {} flow", id, self.mode.name());
            return Err(PreconditionError::DrawingInProgress.into());
        }
        if !self.map.features().contains(id) {
            warn!("Feature not found: {}", id);
            return Err(SessionError::NotFound(id));
        }

        let mut auto_saved = None;
        if let Some(state) = self.mode.editing() {
            if state.feature_id == id {
                return Ok(EditStarted {
                    feature_id: id,
                    vertices: self.current_vertices(id),
                    form: state.form.clone(),
                    auto_saved: None,
                });
            }
            info!("Saving edit of {} before editing {}", state.feature_id, id);
            auto_saved = Some(self.save_edits()?);
        }

        let feature = self.map.feature(id).ok_or(SessionError::NotFound(id))?;
        let schema = self.map.registry().schema(&feature.type_name)?;
        let form = schema.property_form(
            format!("Editing: {}", schema.display_name),
            Some(&feature.properties),
        );
        let state = EditState::new(feature, form.clone());
        let vertices = feature.geometry.vertices();

        self.mode = EditorMode::Editing(state);
        info!("Editing {} feature: {}", schema.type_name, id);

        Ok(EditStarted {
            feature_id: id,
            vertices,
            form,
            auto_saved,
        })
    }

    /// Apply geometry edit events from the map widget
    ///
    /// The feature being edited takes the new geometry without deriving
    /// edges; that happens on save. While idle, edits are saved right away.
    /// The whole batch is checked before anything is applied.
    pub fn geometry_edited(
        &mut self,
        edits: Vec<GeometryEdit>,
    ) -> Result<GeometryEditOutcome, SessionError> {
        let mut reshaped = Vec::with_capacity(edits.len());
        for edit in edits {
            match &self.mode {
                EditorMode::Idle => {}
                EditorMode::Editing(state) if state.feature_id == edit.feature_id => {}
                EditorMode::Editing(_) => return Err(PreconditionError::EditInProgress.into()),
                _ => return Err(PreconditionError::DrawingInProgress.into()),
            }
            let feature = self.map.feature(edit.feature_id).ok_or_else(|| {
                warn!("Edited feature not found: {}", edit.feature_id);
                SessionError::NotFound(edit.feature_id)
            })?;
            let geometry = feature.geometry.reshaped(edit.vertices)?;
            reshaped.push((edit.feature_id, geometry));
        }

        let mut outcome = GeometryEditOutcome::default();
        for (id, geometry) in reshaped {
            self.map.set_geometry(id, geometry)?;
            if let Some(state) = self.mode.editing_mut() {
                state.geometry_changed = true;
                debug!("Live geometry update for {}", id);
                outcome.live.push(id);
            } else {
                let edges = self.derive_if_parent(id)?;
                info!("Saved geometry edit of {}", id);
                outcome.committed.push(CommittedFeature {
                    feature_id: id,
                    edges,
                });
            }
        }
        Ok(outcome)
    }

    /// Save the feature being edited
    ///
    /// Edges of field blocks and obstacles are re-derived from the saved
    /// geometry. Validation errors keep the edit open.
    pub fn save_edits(&mut self) -> Result<CommittedFeature, SessionError> {
        let state = self.mode.editing().ok_or_else(|| {
            warn!("No feature is being edited");
            PreconditionError::NotEditing
        })?;
        let id = state.feature_id;
        let feature = self.map.feature(id).ok_or(SessionError::NotFound(id))?;
        let schema = self.map.registry().schema(&feature.type_name)?;
        let properties = schema.validate_form(&state.form).inspect_err(|e| {
            debug!("Edit form of {} rejected: {}", id, e);
        })?;
        let geometry_changed = state.geometry_changed;

        let previous = feature.properties.clone();
        self.map.set_properties(id, properties)?;
        let edges = match self.derive_if_parent(id) {
            Ok(edges) => edges,
            Err(e) => {
                self.map.set_properties(id, previous)?;
                return Err(e);
            }
        };

        self.mode = EditorMode::Idle;
        info!(
            "Saved edits of {} (geometry changed: {})",
            id, geometry_changed
        );
        Ok(CommittedFeature {
            feature_id: id,
            edges,
        })
    }

    /// Abandon the current edit, restoring the feature as it was
    ///
    /// Edges are left alone since the saved geometry did not change. Returns
    /// false when nothing was being edited.
    pub fn cancel_edit(&mut self) -> bool {
        if !self.mode.is_editing() {
            return false;
        }
        let EditorMode::Editing(state) = std::mem::take(&mut self.mode) else {
            return false;
        };
        let id = state.feature_id;
        if let Err(e) = self.map.set_geometry(id, state.snapshot.geometry) {
            warn!("Could not restore geometry of {}: {}", id, e);
        }
        if let Err(e) = self.map.set_properties(id, state.snapshot.properties) {
            warn!("Could not restore properties of {}: {}", id, e);
        }
        info!("Cancelled edit of {}", id);
        true
    }

    // ============== Deletion ==============

    /// Delete a feature after the user confirms
    ///
    /// Returns whether the feature was deleted. Edges and markers of field
    /// blocks and obstacles go with it.
    pub fn delete_feature(
        &mut self,
        id: Uuid,
        confirm: impl FnOnce(&FeatureSummary) -> bool,
    ) -> Result<bool, SessionError> {
        if self.mode.is_creating() {
            warn!("Cannot delete {} during the {} flow", id, self.mode.name());
            return Err(PreconditionError::DrawingInProgress.into());
        }
        let summary = self.describe(id)?;
        if !confirm(&summary) {
            debug!("Deletion of {} declined", id);
            return Ok(false);
        }

        if self.mode.editing().is_some_and(|s| s.feature_id == id) {
            self.cancel_edit();
        }
        Ok(self.map.remove_feature(id).is_some())
    }

    fn current_vertices(&self, id: Uuid) -> Vec<LatLng> {
        self.map
            .feature(id)
            .map(|f| f.geometry.vertices())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;
    use fieldmap_core::{AttributeValue, FIELD_BLOCK, HEADLAND_NUM, OBSTACLE, ROAD};

    fn obstacle(session: &mut EditorSession, headland: &str) -> Uuid {
        session.start_drawing(OBSTACLE).unwrap();
        session.complete_geometry(triangle()).unwrap();
        session.set_field(HEADLAND_NUM, headland).unwrap();
        session.set_field("safetyDistance", "1.5").unwrap();
        session.submit_properties().unwrap().feature_id
    }

    fn road(session: &mut EditorSession) -> Uuid {
        session.start_drawing(ROAD).unwrap();
        match session.complete_geometry(vec![V1, V2]).unwrap() {
            crate::session::GeometryCompleted::Committed(c) => c.feature_id,
            other => panic!("unexpected {:?}", other),
        }
    }

    fn headlands(session: &EditorSession, parent: Uuid) -> Vec<u32> {
        session
            .map()
            .edges()
            .for_parent(parent)
            .map(|e| e.headland_num)
            .collect()
    }

    #[test]
    fn test_move_vertex_keeps_untouched_edge() {
        init_tracing();
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "2");
        let edge_ids: Vec<Uuid> = session.map().edges().for_parent(id).map(|e| e.id).collect();
        for edge in &edge_ids {
            session.edit_headland(*edge, "5").unwrap();
        }

        let started = session.begin_edit(id).unwrap();
        assert_eq!(started.vertices, triangle());
        assert_eq!(started.form.title, "Editing: Obstacle");
        assert_eq!(started.form.field(HEADLAND_NUM).unwrap().value, "2");

        let moved = LatLng::new(55.495, 10.115);
        let outcome = session
            .geometry_edited(vec![GeometryEdit {
                feature_id: id,
                vertices: vec![V1, V2, moved],
            }])
            .unwrap();
        assert_eq!(outcome.live, [id]);
        // Edges follow the saved geometry only
        assert_eq!(headlands(&session, id), [5, 5, 5]);

        let saved = session.save_edits().unwrap();
        assert_eq!(saved.edges.unwrap().preserved, 1);
        assert_eq!(headlands(&session, id), [5, 2, 2]);
        assert!(session.mode().is_idle());
        assert_eq!(session.counts().markers, session.counts().edges);
    }

    #[test]
    fn test_draw_while_editing_is_rejected() {
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "1");
        session.begin_edit(id).unwrap();

        let err = session.start_drawing(FIELD_BLOCK).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Precondition(PreconditionError::EditInProgress)
        ));
        assert_eq!(err.to_string(), "Please finish editing the current geometry first.");
        assert!(session.mode().is_editing());
        assert_eq!(session.mode().editing().unwrap().feature_id, id);
    }

    #[test]
    fn test_cancel_edit_restores_snapshot() {
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "1");
        let edges_before: Vec<Uuid> = session.map().edges().for_parent(id).map(|e| e.id).collect();

        session.begin_edit(id).unwrap();
        session.set_field(HEADLAND_NUM, "4").unwrap();
        session
            .geometry_edited(vec![GeometryEdit {
                feature_id: id,
                vertices: vec![V1, V2, LatLng::new(55.49, 10.12)],
            }])
            .unwrap();
        assert!(session.cancel_edit());
        assert!(!session.cancel_edit());

        let feature = session.map().feature(id).unwrap();
        assert_eq!(feature.geometry.vertices(), triangle());
        assert_eq!(
            feature.properties.get(HEADLAND_NUM),
            Some(&AttributeValue::Int(1))
        );
        let edges_after: Vec<Uuid> = session.map().edges().for_parent(id).map(|e| e.id).collect();
        assert_eq!(edges_before, edges_after);
    }

    #[test]
    fn test_switching_edit_auto_saves() {
        let mut session = EditorSession::default();
        let first = obstacle(&mut session, "1");
        let second = road(&mut session);

        session.begin_edit(first).unwrap();
        session.set_field(HEADLAND_NUM, "3").unwrap();
        let started = session.begin_edit(second).unwrap();

        let saved = started.auto_saved.unwrap();
        assert_eq!(saved.feature_id, first);
        assert_eq!(
            session.map().feature(first).unwrap().properties.get(HEADLAND_NUM),
            Some(&AttributeValue::Int(3))
        );
        // Unchanged segments keep their own headland counts
        assert_eq!(headlands(&session, first), [1, 1, 1]);
        assert_eq!(session.mode().editing().unwrap().feature_id, second);
    }

    #[test]
    fn test_failed_auto_save_keeps_previous_edit() {
        let mut session = EditorSession::default();
        let first = obstacle(&mut session, "1");
        let second = road(&mut session);

        session.begin_edit(first).unwrap();
        session.set_field("safetyDistance", "").unwrap();
        assert!(matches!(
            session.begin_edit(second),
            Err(SessionError::Validation(_))
        ));
        assert_eq!(session.mode().editing().unwrap().feature_id, first);
    }

    #[test]
    fn test_begin_edit_same_feature_reopens_form() {
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "1");
        session.begin_edit(id).unwrap();
        session.set_field(HEADLAND_NUM, "6").unwrap();

        let again = session.begin_edit(id).unwrap();
        assert!(again.auto_saved.is_none());
        assert_eq!(again.form.field(HEADLAND_NUM).unwrap().value, "6");
    }

    #[test]
    fn test_idle_geometry_edit_rederives() {
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "2");
        let outcome = session
            .geometry_edited(vec![GeometryEdit {
                feature_id: id,
                vertices: vec![V1, V2, LatLng::new(55.49, 10.12), V3],
            }])
            .unwrap();

        assert!(outcome.live.is_empty());
        let derived = outcome.committed[0].edges.as_ref().unwrap();
        assert_eq!(derived.edge_ids.len(), 4);
        assert_eq!(derived.removed, 3);
        assert_eq!(session.counts().markers, 4);
    }

    #[test]
    fn test_geometry_edit_preconditions() {
        let mut session = EditorSession::default();
        let block = obstacle(&mut session, "1");
        let other = road(&mut session);
        session.begin_edit(block).unwrap();

        let err = session
            .geometry_edited(vec![GeometryEdit {
                feature_id: other,
                vertices: vec![V2, V3],
            }])
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Precondition(PreconditionError::EditInProgress)
        ));

        let too_short = session
            .geometry_edited(vec![GeometryEdit {
                feature_id: block,
                vertices: vec![V1, V2],
            }])
            .unwrap_err();
        assert!(matches!(too_short, SessionError::InsufficientGeometry { .. }));
        assert_eq!(session.map().feature(block).unwrap().geometry.vertices(), triangle());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "1");

        assert!(!session.delete_feature(id, |_| false).unwrap());
        assert_eq!(session.counts().edges, 3);

        let deleted = session
            .delete_feature(id, |summary| {
                assert_eq!(summary.title, "Obstacle");
                true
            })
            .unwrap();
        assert!(deleted);
        assert_eq!(session.map().edges().for_parent(id).count(), 0);
        assert_eq!(session.counts().markers, 0);
        assert!(matches!(
            session.delete_feature(id, |_| true),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_edited_feature_cancels_edit() {
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "1");
        session.begin_edit(id).unwrap();

        assert!(session.delete_feature(id, |_| true).unwrap());
        assert!(session.mode().is_idle());
        assert!(session.map().features().is_empty());
    }

    #[test]
    fn test_delete_during_drawing_rejected() {
        let mut session = EditorSession::default();
        let id = road(&mut session);
        session.start_drawing(FIELD_BLOCK).unwrap();
        assert!(matches!(
            session.delete_feature(id, |_| true),
            Err(SessionError::Precondition(PreconditionError::DrawingInProgress))
        ));
        assert_eq!(session.counts().features, 1);
    }

    #[test]
    fn test_describe() {
        let mut session = EditorSession::default();
        let id = obstacle(&mut session, "1");
        let summary = session.describe(id).unwrap();
        assert_eq!(summary.lines(), ["headlandNum: 1", "safetyDistance: 1.5"]);

        let road = road(&mut session);
        let summary = session.describe(road).unwrap();
        assert_eq!(summary.title, "Road");
        assert_eq!(summary.lines(), [NO_PROPERTIES]);
    }
}
