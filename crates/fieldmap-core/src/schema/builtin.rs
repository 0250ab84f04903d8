//! Built-in feature types

use super::{
    AttributeDef, AttributeKind, AttributeValue, FeatureTypeSchema, HEADLAND_NUM, SchemaRegistry,
};
use crate::geometry::GeometryKind;

pub const FIELD_BLOCK: &str = "BaseFieldBlock";
pub const OBSTACLE: &str = "BaseObstacle";
pub const UNIT: &str = "BaseUnit";
pub const AB_LINE: &str = "BaseABLine";
pub const SUBFIELD_SPLIT: &str = "BaseSubfieldSplit";
pub const ENTRY: &str = "BaseEntry";
pub const ROAD: &str = "BaseRoad";
pub const EDGE: &str = "BaseEdge";

fn drawable(
    type_name: &str,
    display_name: &str,
    geometry: GeometryKind,
    color: &str,
    attributes: Vec<AttributeDef>,
) -> FeatureTypeSchema {
    FeatureTypeSchema {
        geometry: Some(geometry),
        color: Some(color.to_string()),
        attributes,
        ..FeatureTypeSchema::new(type_name, display_name)
    }
}

impl SchemaRegistry {
    /// The feature types shipped with the editor
    pub fn builtin() -> Self {
        use AttributeKind::*;

        let headland =
            |default| AttributeDef::new(HEADLAND_NUM, Int).with_default(AttributeValue::Int(default));

        let field_block = FeatureTypeSchema {
            derives_edges: true,
            ..drawable(
                FIELD_BLOCK,
                "FieldBlock",
                GeometryKind::Polygon,
                "#75c800",
                vec![
                    AttributeDef::new("fieldName", Str),
                    AttributeDef::new("workingWidth", Number),
                    headland(2),
                    AttributeDef::new("headlandObstacleMerge", Int),
                    AttributeDef::new("smoothPathline", Bool),
                    AttributeDef::new("safetyDistance", Float),
                ],
            )
        };

        let obstacle = FeatureTypeSchema {
            derives_edges: true,
            ..drawable(
                OBSTACLE,
                "Obstacle",
                GeometryKind::Polygon,
                "#0dbdae",
                vec![headland(1), AttributeDef::new("safetyDistance", Float)],
            )
        };

        let unit = drawable(
            UNIT,
            "Unit",
            GeometryKind::Point,
            "#bc7c6a",
            vec![
                AttributeDef::new("unitName", Str),
                AttributeDef::new("width", Number),
                AttributeDef::new("workingSpeed", Number),
                AttributeDef::new("traversalSpeed", Number),
                AttributeDef::new("distanceToNoseFromGps", Number),
            ],
        );

        let edge = FeatureTypeSchema {
            color: Some("#000000".to_string()),
            attributes: vec![headland(1)],
            ..FeatureTypeSchema::new(EDGE, "Edge")
        };

        let schemas = vec![
            field_block,
            obstacle,
            unit,
            drawable(AB_LINE, "ABLine", GeometryKind::LineString, "#0f81d3", vec![]),
            drawable(
                SUBFIELD_SPLIT,
                "SubfieldSplit",
                GeometryKind::LineString,
                "#000000",
                vec![],
            ),
            drawable(ENTRY, "Entry", GeometryKind::Point, "#44960e", vec![]),
            drawable(ROAD, "Road", GeometryKind::LineString, "#000000", vec![]),
            edge,
        ];

        Self { schemas }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_creatable() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.len(), 8);

        let creatable: Vec<&str> = registry.creatable().map(|s| s.type_name.as_str()).collect();
        assert_eq!(
            creatable,
            [FIELD_BLOCK, OBSTACLE, UNIT, AB_LINE, SUBFIELD_SPLIT, ENTRY, ROAD]
        );
    }

    #[test]
    fn test_only_polygons_derive_edges() {
        let registry = SchemaRegistry::builtin();
        let deriving: Vec<&str> = registry
            .iter()
            .filter(|s| s.derives_edges)
            .map(|s| s.type_name.as_str())
            .collect();
        assert_eq!(deriving, [FIELD_BLOCK, OBSTACLE]);
    }

    #[test]
    fn test_line_types_have_no_attributes() {
        let registry = SchemaRegistry::builtin();
        for name in [AB_LINE, SUBFIELD_SPLIT, ENTRY, ROAD] {
            assert!(!registry.schema(name).unwrap().has_editable_attributes());
        }
    }
}
