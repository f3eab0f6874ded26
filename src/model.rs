//! Plant record and the write payloads built from request bodies.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields a PATCH may assign. `id` is immutable.
pub const MUTABLE_FIELDS: &[&str] = &["name", "image", "price"];

/// One row of the `plants` table. Serializes to the API representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Plant {
    pub id: i64,
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
}

impl Plant {
    /// Assign every field present in the patch; absent fields are untouched.
    pub fn apply(&mut self, patch: &PlantPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

/// Fields for a new row. Missing keys are stored as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPlant {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
}

impl NewPlant {
    /// Read `name`, `image` and `price`; any other key is ignored.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, AppError> {
        Ok(NewPlant {
            name: text_field(body, "name")?.flatten(),
            image: text_field(body, "image")?.flatten(),
            price: number_field(body, "price")?.flatten(),
        })
    }
}

/// Partial update. The outer `Option` is presence in the body, the inner one is the value (null clears).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantPatch {
    pub name: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub price: Option<Option<f64>>,
}

impl PlantPatch {
    /// Every key must name a mutable field.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, AppError> {
        if let Some(key) = body.keys().find(|k| !MUTABLE_FIELDS.contains(&k.as_str())) {
            return Err(if key == "id" {
                AppError::Validation("id is immutable".into())
            } else {
                AppError::Validation(format!("plant has no attribute '{}'", key))
            });
        }
        Ok(PlantPatch {
            name: text_field(body, "name")?,
            image: text_field(body, "image")?,
            price: number_field(body, "price")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image.is_none() && self.price.is_none()
    }
}

fn text_field(body: &Map<String, Value>, field: &'static str) -> Result<Option<Option<String>>, AppError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(AppError::TypeMismatch {
            field,
            expected: "a string",
        }),
    }
}

fn number_field(body: &Map<String, Value>, field: &'static str) -> Result<Option<Option<f64>>, AppError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Number(n)) => n.as_f64().map(|f| Some(Some(f))).ok_or(AppError::TypeMismatch {
            field,
            expected: "a number",
        }),
        Some(_) => Err(AppError::TypeMismatch {
            field,
            expected: "a number",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn plant_serializes_with_all_four_fields() {
        let plant = Plant {
            id: 1,
            name: Some("Fern".into()),
            image: None,
            price: Some(12.5),
        };
        assert_eq!(
            serde_json::to_value(&plant).unwrap(),
            json!({"id": 1, "name": "Fern", "image": null, "price": 12.5})
        );
    }

    #[test]
    fn new_plant_ignores_extra_keys_and_nulls_missing_ones() {
        let body = object(json!({"name": "Fern", "colour": "green"}));
        let new = NewPlant::from_body(&body).unwrap();
        assert_eq!(
            new,
            NewPlant {
                name: Some("Fern".into()),
                image: None,
                price: None,
            }
        );
    }

    #[test]
    fn new_plant_rejects_wrong_types() {
        let err = NewPlant::from_body(&object(json!({"price": "cheap"}))).unwrap_err();
        assert!(matches!(err, AppError::TypeMismatch { field: "price", .. }));

        let err = NewPlant::from_body(&object(json!({"name": 7}))).unwrap_err();
        assert!(matches!(err, AppError::TypeMismatch { field: "name", .. }));
    }

    #[test]
    fn integer_prices_are_accepted() {
        let new = NewPlant::from_body(&object(json!({"price": 12}))).unwrap();
        assert_eq!(new.price, Some(12.0));
    }

    #[test]
    fn patch_allows_only_mutable_fields() {
        let err = PlantPatch::from_body(&object(json!({"id": 5}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = PlantPatch::from_body(&object(json!({"price": 1.0, "height": 3}))).unwrap_err();
        assert_eq!(err.to_string(), "plant has no attribute 'height'");
    }

    #[test]
    fn patch_applies_present_fields_only() {
        let mut plant = Plant {
            id: 1,
            name: Some("Fern".into()),
            image: Some("fern.jpg".into()),
            price: Some(12.5),
        };
        let patch = PlantPatch::from_body(&object(json!({"price": 15.0, "image": null}))).unwrap();
        plant.apply(&patch);
        assert_eq!(plant.name.as_deref(), Some("Fern"));
        assert_eq!(plant.image, None);
        assert_eq!(plant.price, Some(15.0));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let patch = PlantPatch::from_body(&Map::new()).unwrap();
        assert!(patch.is_empty());
        let before = Plant {
            id: 3,
            name: None,
            image: None,
            price: Some(1.0),
        };
        let mut after = before.clone();
        after.apply(&patch);
        assert_eq!(before, after);
    }
}
