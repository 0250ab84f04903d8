//! Field Planning Map Core
//!
//! This crate contains the core data structures for field planning maps:
//! - Schema: feature type definitions and typed attribute values
//! - Feature: drawn polygons, lines and points with their properties
//! - Edge: boundary segments derived from field blocks and obstacles
//! - Marker: headland labels placed on every edge
//! - FieldMap: the document tying features, edges and markers together

pub mod document;
pub mod edge;
pub mod feature;
pub mod geojson;
pub mod geometry;
pub mod marker;
pub mod schema;

pub use document::*;
pub use edge::*;
pub use feature::*;
pub use geometry::*;
pub use marker::*;
pub use schema::*;
