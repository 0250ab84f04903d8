//! Session errors
//!
//! Every error is recovered locally: the session state is unchanged when a
//! handler returns one of these.

use fieldmap_core::{
    EdgeError, FieldError, FieldMapError, FormErrors, GeometryError, GeometryKind, SchemaError,
};
use thiserror::Error;
use uuid::Uuid;

/// Operation not allowed in the current mode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Please finish editing the current geometry first.")]
    EditInProgress,

    #[error("Please finish or cancel the current drawing first.")]
    DrawingInProgress,

    #[error("Not drawing")]
    NotDrawing,

    #[error("No property form is open")]
    NoPropertyForm,

    #[error("No feature is being edited")]
    NotEditing,
}

/// Errors returned by session handlers
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(#[from] FormErrors),

    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    #[error("A {kind} requires at least {required} vertices to be saved.")]
    InsufficientGeometry {
        kind: GeometryKind,
        required: usize,
        actual: usize,
    },

    #[error("Invalid geometry: {0}")]
    Geometry(GeometryError),

    #[error("Not found: {0}")]
    NotFound(Uuid),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Edge error: {0}")]
    Edge(EdgeError),

    #[error("Map error: {0}")]
    Map(FieldMapError),
}

impl SessionError {
    /// Whether the user should see a blocking notice for this error
    pub fn is_user_notice(&self) -> bool {
        matches!(
            self,
            SessionError::Precondition(_)
                | SessionError::InsufficientGeometry { .. }
                | SessionError::Geometry(_)
        )
    }
}

impl From<FieldError> for SessionError {
    fn from(e: FieldError) -> Self {
        SessionError::Validation(FormErrors(vec![e]))
    }
}

impl From<GeometryError> for SessionError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::InsufficientVertices {
                kind,
                required,
                actual,
            } => SessionError::InsufficientGeometry {
                kind,
                required,
                actual,
            },
            other => SessionError::Geometry(other),
        }
    }
}

impl From<EdgeError> for SessionError {
    fn from(e: EdgeError) -> Self {
        match e {
            EdgeError::ParentNotFound(id) | EdgeError::EdgeNotFound(id) => SessionError::NotFound(id),
            other => SessionError::Edge(other),
        }
    }
}

impl From<FieldMapError> for SessionError {
    fn from(e: FieldMapError) -> Self {
        match e {
            FieldMapError::FeatureNotFound(id) => SessionError::NotFound(id),
            FieldMapError::Schema(e) => SessionError::Schema(e),
            FieldMapError::Edge(e) => e.into(),
            other => SessionError::Map(other),
        }
    }
}
