//! Property forms
//!
//! The sidebar renders a [`PropertyForm`] and hands back the edited text of
//! each field. Validation turns that text into typed [`Properties`].

use serde::{Deserialize, Serialize};

use super::{AttributeKind, FeatureTypeSchema, FieldError, FormErrors, Properties};

/// Name of the headland count attribute
pub const HEADLAND_NUM: &str = "headlandNum";

/// A single input field of a property form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub kind: AttributeKind,
    /// Current text of the input
    pub value: String,
    pub required: bool,
}

impl FormField {
    /// Label shown next to the input
    pub fn label(&self) -> String {
        if self.required {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Form handed to the sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyForm {
    pub title: String,
    pub fields: Vec<FormField>,
}

impl PropertyForm {
    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Update the text of a field
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), FieldError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| FieldError::UnknownField {
                field: name.to_string(),
            })?;
        field.value = value.into();
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FeatureTypeSchema {
    /// Build the property form for this type
    ///
    /// Fields are prefilled from `current` when given (editing an existing
    /// feature), otherwise from the attribute defaults.
    pub fn property_form(&self, title: impl Into<String>, current: Option<&Properties>) -> PropertyForm {
        let fields = self
            .attributes
            .iter()
            .map(|attr| {
                let value = current
                    .and_then(|props| props.get(&attr.name))
                    .or(attr.default.as_ref())
                    .map(ToString::to_string)
                    .unwrap_or_default();
                FormField {
                    name: attr.name.clone(),
                    kind: attr.kind,
                    value,
                    required: true,
                }
            })
            .collect();

        PropertyForm {
            title: title.into(),
            fields,
        }
    }

    /// Validate a submitted form against this schema
    ///
    /// Every attribute must be present and parse as its kind. All failing
    /// fields are reported, in schema order.
    pub fn validate_form(&self, form: &PropertyForm) -> Result<Properties, FormErrors> {
        let mut properties = Properties::new();
        let mut errors = Vec::new();

        for attr in &self.attributes {
            let text = form.field(&attr.name).map(|f| f.value.as_str()).unwrap_or("");
            match attr.kind.parse(&attr.name, text) {
                Ok(value) => properties.insert(attr.name.clone(), value),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(properties)
        } else {
            Err(FormErrors(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeValue, FIELD_BLOCK, OBSTACLE, SchemaRegistry};

    #[test]
    fn test_form_prefilled_from_defaults() {
        let registry = SchemaRegistry::builtin();
        let form = registry
            .schema(FIELD_BLOCK)
            .unwrap()
            .property_form("Properties: FieldBlock", None);

        let names: Vec<&str> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "fieldName",
                "workingWidth",
                "headlandNum",
                "headlandObstacleMerge",
                "smoothPathline",
                "safetyDistance"
            ]
        );
        assert_eq!(form.field(HEADLAND_NUM).unwrap().value, "2");
        assert_eq!(form.field("fieldName").unwrap().value, "");
        assert_eq!(form.field("fieldName").unwrap().label(), "fieldName*");
    }

    #[test]
    fn test_validate_obstacle_form() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema(OBSTACLE).unwrap();
        let mut form = schema.property_form("Properties: Obstacle", None);

        let errors = schema.validate_form(&form).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.for_field("safetyDistance"),
            Some(&FieldError::Required {
                field: "safetyDistance".into()
            })
        );

        form.set_value("safetyDistance", "1.5").unwrap();
        let props = schema.validate_form(&form).unwrap();
        assert_eq!(props.get(HEADLAND_NUM), Some(&AttributeValue::Int(1)));
        assert_eq!(props.get("safetyDistance"), Some(&AttributeValue::Float(1.5)));
        assert_eq!(props.len(), schema.attributes.len());
    }

    #[test]
    fn test_unknown_field() {
        let registry = SchemaRegistry::builtin();
        let mut form = registry
            .schema(OBSTACLE)
            .unwrap()
            .property_form("Properties: Obstacle", None);
        assert!(matches!(
            form.set_value("colour", "red"),
            Err(FieldError::UnknownField { .. })
        ));
    }
}
