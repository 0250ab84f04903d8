//! Drawing and property entry state

use fieldmap_core::{Geometry, GeometryKind, PropertyForm};

/// Drawing tool the map widget activates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTool {
    Polygon,
    Polyline,
    Marker,
}

impl DrawTool {
    /// Tool for drawing a geometry kind
    pub fn for_kind(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Polygon => DrawTool::Polygon,
            GeometryKind::LineString => DrawTool::Polyline,
            GeometryKind::Point => DrawTool::Marker,
        }
    }

    /// Get the display name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            DrawTool::Polygon => "polygon",
            DrawTool::Polyline => "polyline",
            DrawTool::Marker => "marker",
        }
    }

    /// Whether the shape is finished with an explicit save control
    ///
    /// Markers complete on the first click.
    pub fn needs_finish_control(&self) -> bool {
        matches!(self, DrawTool::Polygon | DrawTool::Polyline)
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        match self {
            DrawTool::Polygon => GeometryKind::Polygon,
            DrawTool::Polyline => GeometryKind::LineString,
            DrawTool::Marker => GeometryKind::Point,
        }
    }
}

/// State while the user draws a new feature
#[derive(Debug, Clone)]
pub struct DrawingState {
    /// Type being drawn
    pub type_name: String,
    pub tool: DrawTool,
}

/// State while the property form of a new feature is open
#[derive(Debug, Clone)]
pub struct PropertyEntryState {
    pub type_name: String,
    /// Finished geometry, committed once the form is submitted
    pub geometry: Geometry,
    pub form: PropertyForm,
}
