//! Action dispatch
//!
//! The map widget and the sidebar report user interactions as
//! [`EditorAction`] values. [`EditorSession::dispatch`] routes each one to
//! its handler and hands back a structured [`ActionOutcome`].

use fieldmap_core::{LatLng, PropertyForm};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SessionError;
use crate::session::{
    CommittedFeature, DrawingStarted, EditStarted, EditorSession, FeatureSummary,
    GeometryCompleted, GeometryEdit, GeometryEditOutcome,
};

/// User interactions handled by the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Pick a type from the "create" menu
    StartDrawing { type_name: String },
    /// The drawing tool finished a shape
    CompleteGeometry { vertices: Vec<LatLng> },
    /// An input of the property form changed
    SetField { name: String, value: String },
    /// Save button of a new feature's property form
    SubmitProperties,
    /// Cancel button while drawing or entering properties
    CancelDrawing,
    /// Edit button of a feature popup
    BeginEdit { feature_id: Uuid },
    /// The map widget finished a vertex drag
    GeometryEdited { edits: Vec<GeometryEdit> },
    /// Save button of the edit form
    SaveEdits,
    /// Cancel button of the edit form
    CancelEdit,
    /// Delete button of a feature popup, with the user's answer
    DeleteFeature { feature_id: Uuid, confirmed: bool },
    /// Click on a feature
    Describe { feature_id: Uuid },
    /// Click on an edge
    OpenEdgeForm { edge_id: Uuid },
    /// Click on an edge marker
    ClickMarker { marker_id: Uuid },
    /// Save button of an edge form
    EditHeadland { edge_id: Uuid, value: String },
}

impl EditorAction {
    /// Get the display name of the action
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::StartDrawing { .. } => "start drawing",
            EditorAction::CompleteGeometry { .. } => "complete geometry",
            EditorAction::SetField { .. } => "set field",
            EditorAction::SubmitProperties => "submit properties",
            EditorAction::CancelDrawing => "cancel drawing",
            EditorAction::BeginEdit { .. } => "begin edit",
            EditorAction::GeometryEdited { .. } => "geometry edited",
            EditorAction::SaveEdits => "save edits",
            EditorAction::CancelEdit => "cancel edit",
            EditorAction::DeleteFeature { .. } => "delete feature",
            EditorAction::Describe { .. } => "describe",
            EditorAction::OpenEdgeForm { .. } => "open edge form",
            EditorAction::ClickMarker { .. } => "click marker",
            EditorAction::EditHeadland { .. } => "edit headland",
        }
    }
}

/// Successful result of an action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    DrawingStarted(DrawingStarted),
    GeometryCompleted(GeometryCompleted),
    FieldUpdated,
    Committed(CommittedFeature),
    EditStarted(EditStarted),
    GeometryEdited(GeometryEditOutcome),
    /// Whether a drawing or edit was open and got cancelled
    Cancelled(bool),
    /// Whether the feature was deleted
    Deleted(bool),
    Summary(FeatureSummary),
    /// Headland form of an edge
    EdgeForm { edge_id: Uuid, form: PropertyForm },
    HeadlandUpdated,
}

impl EditorSession {
    /// Handle one user interaction
    pub fn dispatch(&mut self, action: EditorAction) -> Result<ActionOutcome, SessionError> {
        let name = action.name();
        debug!("Dispatching {} in {} mode", name, self.mode());

        let result = match action {
            EditorAction::StartDrawing { type_name } => self
                .start_drawing(&type_name)
                .map(ActionOutcome::DrawingStarted),

            EditorAction::CompleteGeometry { vertices } => self
                .complete_geometry(vertices)
                .map(ActionOutcome::GeometryCompleted),

            EditorAction::SetField { name, value } => self
                .set_field(&name, &value)
                .map(|()| ActionOutcome::FieldUpdated),

            EditorAction::SubmitProperties => {
                self.submit_properties().map(ActionOutcome::Committed)
            }

            EditorAction::CancelDrawing => Ok(ActionOutcome::Cancelled(self.cancel_drawing())),

            EditorAction::BeginEdit { feature_id } => {
                self.begin_edit(feature_id).map(ActionOutcome::EditStarted)
            }

            EditorAction::GeometryEdited { edits } => self
                .geometry_edited(edits)
                .map(ActionOutcome::GeometryEdited),

            EditorAction::SaveEdits => self.save_edits().map(ActionOutcome::Committed),

            EditorAction::CancelEdit => Ok(ActionOutcome::Cancelled(self.cancel_edit())),

            EditorAction::DeleteFeature {
                feature_id,
                confirmed,
            } => self
                .delete_feature(feature_id, |_| confirmed)
                .map(ActionOutcome::Deleted),

            EditorAction::Describe { feature_id } => {
                self.describe(feature_id).map(ActionOutcome::Summary)
            }

            EditorAction::OpenEdgeForm { edge_id } => self
                .edge_form(edge_id)
                .map(|form| ActionOutcome::EdgeForm { edge_id, form }),

            EditorAction::ClickMarker { marker_id } => {
                self.marker_edge(marker_id).and_then(|edge_id| {
                    self.edge_form(edge_id)
                        .map(|form| ActionOutcome::EdgeForm { edge_id, form })
                })
            }

            EditorAction::EditHeadland { edge_id, value } => self
                .edit_headland(edge_id, &value)
                .map(|()| ActionOutcome::HeadlandUpdated),
        };

        match &result {
            Ok(_) => info!("Handled {} (now {})", name, self.mode()),
            Err(e) if e.is_user_notice() => warn!("Rejected {}: {}", name, e),
            Err(e) => debug!("Failed {}: {}", name, e),
        }
        result
    }
}
