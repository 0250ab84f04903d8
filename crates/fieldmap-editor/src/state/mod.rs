//! Editor mode state types

mod drawing;
mod editing;

pub use drawing::{DrawTool, DrawingState, PropertyEntryState};
pub use editing::{EditSnapshot, EditState};

/// Interaction mode of the editor
#[derive(Debug, Clone, Default)]
#[allow(clippy::large_enum_variant)]
pub enum EditorMode {
    /// Nothing in progress
    #[default]
    Idle,
    /// The map widget's drawing tool is active
    Drawing(DrawingState),
    /// Geometry is finished, waiting for the property form
    EnteringProperties(PropertyEntryState),
    /// An existing feature is being edited
    Editing(EditState),
}

impl EditorMode {
    /// Get the display name of the mode
    pub fn name(&self) -> &'static str {
        match self {
            EditorMode::Idle => "idle",
            EditorMode::Drawing(_) => "drawing",
            EditorMode::EnteringProperties(_) => "entering-properties",
            EditorMode::Editing(_) => "editing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorMode::Idle)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditorMode::Editing(_))
    }

    /// Whether a new feature is being drawn or described
    pub fn is_creating(&self) -> bool {
        matches!(
            self,
            EditorMode::Drawing(_) | EditorMode::EnteringProperties(_)
        )
    }

    /// Get drawing state if drawing
    pub fn drawing(&self) -> Option<&DrawingState> {
        match self {
            EditorMode::Drawing(state) => Some(state),
            _ => None,
        }
    }

    /// Get property entry state if entering properties
    pub fn property_entry(&self) -> Option<&PropertyEntryState> {
        match self {
            EditorMode::EnteringProperties(state) => Some(state),
            _ => None,
        }
    }

    /// Get edit state if editing
    pub fn editing(&self) -> Option<&EditState> {
        match self {
            EditorMode::Editing(state) => Some(state),
            _ => None,
        }
    }

    /// Get mutable edit state if editing
    pub fn editing_mut(&mut self) -> Option<&mut EditState> {
        match self {
            EditorMode::Editing(state) => Some(state),
            _ => None,
        }
    }
}

impl std::fmt::Display for EditorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
