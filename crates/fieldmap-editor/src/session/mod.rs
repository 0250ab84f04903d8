//! Editor session
//!
//! [`EditorSession`] is the interaction controller. It owns the
//! [`FieldMap`] document and the current [`EditorMode`], and every user
//! interaction is a method on it. Handlers run to completion and either
//! succeed or return a [`SessionError`] with the session unchanged.

mod edges;
mod editing;

pub use editing::{EditStarted, FeatureSummary, GeometryEdit, GeometryEditOutcome, NO_PROPERTIES};

use fieldmap_core::{
    EdgeDerivation, FieldMap, Geometry, LatLng, LayerCounts, Properties, PropertyForm,
    SchemaRegistry,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EditorConfig, SharedConfig};
use crate::error::{PreconditionError, SessionError};
use crate::state::{DrawTool, DrawingState, EditorMode, PropertyEntryState};

/// Entry of the "create" menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatableType {
    pub type_name: String,
    /// Menu label, e.g. "Create FieldBlock"
    pub label: String,
}

/// Result of starting a drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingStarted {
    pub type_name: String,
    /// Tool the map widget has to activate
    pub tool: DrawTool,
    /// Sidebar title
    pub title: String,
    /// Whether the sidebar shows a "finish shape" control
    pub needs_finish_control: bool,
}

/// A feature written to the map by a save
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedFeature {
    pub feature_id: Uuid,
    /// Edges derived for the feature, for field blocks and obstacles
    pub edges: Option<EdgeDerivation>,
}

/// Result of finishing a drawn shape
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryCompleted {
    /// The property form is open and waits for submission
    AwaitingProperties(PropertyForm),
    /// The type has no attributes and the feature was created directly
    Committed(CommittedFeature),
}

/// Interaction controller of the map editor
#[derive(Debug, Clone)]
pub struct EditorSession {
    map: FieldMap,
    mode: EditorMode,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin(), &EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(registry: SchemaRegistry, config: &EditorConfig) -> Self {
        Self {
            map: FieldMap::new(registry, config.map_style()),
            mode: EditorMode::Idle,
        }
    }

    /// Create a session styled by the shared editor configuration
    pub fn from_shared_config(registry: SchemaRegistry, config: &SharedConfig) -> Self {
        let manager = config.read();
        debug!(
            "Starting session with config from {:?}",
            manager.config_file_path()
        );
        Self::new(registry, manager.config())
    }

    /// The map document
    pub fn map(&self) -> &FieldMap {
        &self.map
    }

    /// Current interaction mode
    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// The property form currently shown in the sidebar
    pub fn form(&self) -> Option<&PropertyForm> {
        match &self.mode {
            EditorMode::EnteringProperties(state) => Some(&state.form),
            EditorMode::Editing(state) => Some(&state.form),
            _ => None,
        }
    }

    /// Object counts per map layer
    pub fn counts(&self) -> LayerCounts {
        self.map.counts()
    }

    /// Types offered in the "create" menu, in registry order
    pub fn creatable_types(&self) -> Vec<CreatableType> {
        self.map
            .registry()
            .creatable()
            .map(|schema| CreatableType {
                type_name: schema.type_name.clone(),
                label: format!("Create {}", schema.display_name),
            })
            .collect()
    }

    // ============== Drawing ==============

    /// Start drawing a new feature of the given type
    pub fn start_drawing(&mut self, type_name: &str) -> Result<DrawingStarted, SessionError> {
        match &self.mode {
            EditorMode::Editing(state) => {
                warn!(
                    "Cannot draw {} while {} is being edited",
                    type_name, state.feature_id
                );
                return Err(PreconditionError::EditInProgress.into());
            }
            EditorMode::Drawing(_) | EditorMode::EnteringProperties(_) => {
                warn!("Cannot draw {} while another drawing is open", type_name);
                return Err(PreconditionError::DrawingInProgress.into());
            }
            EditorMode::Idle => {}
        }

        let schema = self.map.registry().schema(type_name)?;
        let tool = DrawTool::for_kind(schema.geometry_kind()?);
        let title = format!("Drawing: {}", schema.display_name);

        self.mode = EditorMode::Drawing(DrawingState {
            type_name: type_name.to_string(),
            tool,
        });
        info!("Started drawing {} with {} tool", type_name, tool.name());

        Ok(DrawingStarted {
            type_name: type_name.to_string(),
            tool,
            title,
            needs_finish_control: tool.needs_finish_control(),
        })
    }

    /// Finish the drawn shape
    ///
    /// On insufficient vertices the drawing stays active so the user can
    /// keep adding points.
    pub fn complete_geometry(
        &mut self,
        vertices: Vec<LatLng>,
    ) -> Result<GeometryCompleted, SessionError> {
        let drawing = self.mode.drawing().ok_or(PreconditionError::NotDrawing)?;
        let type_name = drawing.type_name.clone();
        let kind = drawing.tool.geometry_kind();

        let geometry = Geometry::from_vertices(kind, vertices).inspect_err(|e| {
            warn!("Rejected {} geometry: {}", type_name, e);
        })?;

        let schema = self.map.registry().schema(&type_name)?;
        if !schema.has_editable_attributes() {
            let committed = self.commit_new(&type_name, geometry, Properties::new())?;
            self.mode = EditorMode::Idle;
            return Ok(GeometryCompleted::Committed(committed));
        }

        let form = schema.property_form(format!("Properties: {}", schema.display_name), None);
        self.mode = EditorMode::EnteringProperties(PropertyEntryState {
            type_name: type_name.clone(),
            geometry,
            form: form.clone(),
        });
        debug!("Geometry of new {} complete, waiting for properties", type_name);

        Ok(GeometryCompleted::AwaitingProperties(form))
    }

    /// Update one input of the open property form
    pub fn set_field(&mut self, name: &str, text: &str) -> Result<(), SessionError> {
        let form = match &mut self.mode {
            EditorMode::EnteringProperties(state) => &mut state.form,
            EditorMode::Editing(state) => &mut state.form,
            _ => return Err(PreconditionError::NoPropertyForm.into()),
        };
        form.set_value(name, text)?;
        Ok(())
    }

    /// Submit the property form of a new feature
    ///
    /// Validation errors keep the form open.
    pub fn submit_properties(&mut self) -> Result<CommittedFeature, SessionError> {
        let state = self
            .mode
            .property_entry()
            .ok_or(PreconditionError::NoPropertyForm)?;
        let schema = self.map.registry().schema(&state.type_name)?;
        let properties = schema.validate_form(&state.form).inspect_err(|e| {
            debug!("Property form of {} rejected: {}", state.type_name, e);
        })?;

        let type_name = state.type_name.clone();
        let geometry = state.geometry.clone();
        let committed = self.commit_new(&type_name, geometry, properties)?;
        self.mode = EditorMode::Idle;
        Ok(committed)
    }

    /// Abandon the drawing flow without creating a feature
    ///
    /// Returns false when nothing was being drawn.
    pub fn cancel_drawing(&mut self) -> bool {
        if !self.mode.is_creating() {
            return false;
        }
        info!("Cancelled {} flow", self.mode.name());
        self.mode = EditorMode::Idle;
        true
    }

    /// Create a feature and derive its edges
    fn commit_new(
        &mut self,
        type_name: &str,
        geometry: Geometry,
        properties: Properties,
    ) -> Result<CommittedFeature, SessionError> {
        let feature_id = self.map.add_feature(type_name, geometry, properties)?;
        let edges = match self.derive_if_parent(feature_id) {
            Ok(edges) => edges,
            Err(e) => {
                self.map.remove_feature(feature_id);
                return Err(e);
            }
        };
        Ok(CommittedFeature { feature_id, edges })
    }

    /// Re-derive edges when the feature is a field block or obstacle
    fn derive_if_parent(&mut self, id: Uuid) -> Result<Option<EdgeDerivation>, SessionError> {
        let feature = self.map.feature(id).ok_or(SessionError::NotFound(id))?;
        if !self.map.derives_edges(feature) {
            return Ok(None);
        }
        Ok(Some(self.map.derive_edges(id)?))
    }
}
