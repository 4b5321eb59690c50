/*!
# Record Shape Descriptions

A [`Shape`] is the ordered list of fields a record type exposes, each with its
declared type and optional column mapping. It is plain data: record types
describe themselves through [`crate::Tabular::shape`], and the CLI loads shapes
from YAML.

```yaml
name: person
fields:
  - name: name
    type: string
    required: true
  - name: age
    type: i32
    tag: "Age,required"
  - name: score
    type: { optional: f64 }
```
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a record field.
///
/// Every Rust-side field type is expressible here, including the ones the
/// binder rejects (`List`, `Map`, `Record`, nested `Optional`), so that an
/// unsupported shape is caught when the schema is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    Bool,
    String,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Time,
    Optional(Box<DeclaredType>),
    List(Box<DeclaredType>),
    Map {
        key: Box<DeclaredType>,
        value: Box<DeclaredType>,
    },
    Record(String),
}

impl DeclaredType {
    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Optional(Box::new(inner))
    }

    pub fn list(inner: DeclaredType) -> Self {
        DeclaredType::List(Box::new(inner))
    }

    pub fn map(key: DeclaredType, value: DeclaredType) -> Self {
        DeclaredType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Bool => f.write_str("bool"),
            DeclaredType::String => f.write_str("String"),
            DeclaredType::I8 => f.write_str("i8"),
            DeclaredType::I16 => f.write_str("i16"),
            DeclaredType::I32 => f.write_str("i32"),
            DeclaredType::I64 => f.write_str("i64"),
            DeclaredType::Isize => f.write_str("isize"),
            DeclaredType::U8 => f.write_str("u8"),
            DeclaredType::U16 => f.write_str("u16"),
            DeclaredType::U32 => f.write_str("u32"),
            DeclaredType::U64 => f.write_str("u64"),
            DeclaredType::Usize => f.write_str("usize"),
            DeclaredType::F32 => f.write_str("f32"),
            DeclaredType::F64 => f.write_str("f64"),
            DeclaredType::Time => f.write_str("DateTime<FixedOffset>"),
            DeclaredType::Optional(inner) => write!(f, "Option<{inner}>"),
            DeclaredType::List(inner) => write!(f, "Vec<{inner}>"),
            DeclaredType::Map { key, value } => write!(f, "HashMap<{key}, {value}>"),
            DeclaredType::Record(name) => f.write_str(name),
        }
    }
}

/// One field of a record shape, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name; the default column name
    pub name: String,

    /// Parameterized types are single-key maps: `{ optional: f64 }`
    #[serde(rename = "type", with = "serde_yaml::with::singleton_map_recursive")]
    pub ty: DeclaredType,

    /// External column name, overriding `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Ignored fields never take part in binding
    #[serde(default)]
    pub ignore: bool,

    /// Packed annotation: `"<column>[<sep>required]"`, or `"-"` to ignore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            column: None,
            required: None,
            ignore: false,
            tag: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Ordered field list of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Identifies record instances of this shape
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

impl Shape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Field names in declaration order, ignored ones included
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_display() {
        assert_eq!(DeclaredType::optional(DeclaredType::I32).to_string(), "Option<i32>");
        assert_eq!(
            DeclaredType::map(DeclaredType::String, DeclaredType::list(DeclaredType::U8)).to_string(),
            "HashMap<String, Vec<u8>>"
        );
        assert_eq!(DeclaredType::Record("Address".to_string()).to_string(), "Address");
    }

    #[test]
    fn test_shape_from_yaml() {
        let yaml = r#"
name: person
fields:
  - name: name
    type: string
    required: true
  - name: age
    type: i32
    tag: "Age,required"
  - name: score
    type: { optional: f64 }
  - name: notes
    type: { list: string }
    ignore: true
"#;
        let shape: Shape = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(shape.name, "person");
        assert_eq!(
            shape.fields,
            vec![
                FieldDecl::new("name", DeclaredType::String).required(),
                FieldDecl::new("age", DeclaredType::I32).tag("Age,required"),
                FieldDecl::new("score", DeclaredType::optional(DeclaredType::F64)),
                FieldDecl::new("notes", DeclaredType::list(DeclaredType::String)).ignore(),
            ]
        );
    }

    #[test]
    fn test_nested_type_from_yaml() {
        let yaml = r#"
name: lookup
fields:
  - name: codes
    type: { map: { key: string, value: { optional: u8 } } }
    ignore: true
"#;
        let shape: Shape = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            shape.fields[0].ty,
            DeclaredType::map(DeclaredType::String, DeclaredType::optional(DeclaredType::U8))
        );

        let written = serde_yaml::to_string(&shape).unwrap();
        assert!(written.contains("map:"), "{written}");
        assert_eq!(serde_yaml::from_str::<Shape>(&written).unwrap(), shape);
    }
}
