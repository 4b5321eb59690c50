use crate::{
    binder::Record,
    errors::ValueError,
    schema::{FieldRef, Schema},
    value::Value,
};
use serde_json::{Map, Value as JsonValue};

/// A record whose shape is only known at runtime, e.g. loaded from YAML.
///
/// One slot per declared field; slots the binder never wrote stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    shape: String,
    values: Vec<Option<Value>>,
}

impl DynamicRecord {
    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn get(&self, field: FieldRef) -> Option<&Value> {
        self.values.get(field.index()).and_then(Option::as_ref)
    }

    /// JSON object keyed by field name; unset fields and non-finite floats
    /// are `null`. Serialization errors are returned, not replaced.
    pub fn to_json(&self, schema: &Schema) -> serde_json::Result<JsonValue> {
        let mut object = Map::new();
        for (index, value) in self.values.iter().enumerate() {
            let Some(name) = schema.field_name(FieldRef::at(index)) else {
                continue;
            };
            let json = match value {
                Some(value) => serde_json::to_value(value)?,
                None => JsonValue::Null,
            };
            object.insert(name.to_string(), json);
        }
        Ok(JsonValue::Object(object))
    }
}

impl Record for DynamicRecord {
    fn blank(schema: &Schema) -> Self {
        Self {
            shape: schema.shape_name().to_string(),
            values: vec![None; schema.field_count()],
        }
    }

    fn shape_name(&self) -> &str {
        &self.shape
    }

    fn set_field(&mut self, field: FieldRef, value: Value) -> Result<(), ValueError> {
        let slot = self
            .values
            .get_mut(field.index())
            .ok_or(ValueError::UnknownField(field.index()))?;
        *slot = Some(value);
        Ok(())
    }
}
