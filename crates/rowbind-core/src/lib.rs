/*!
# Rowbind Core

Binds CSV rows to typed records: the header is reconciled against the
record's expected columns, then every data row's cells are coerced into the
record's fields.

## Pieces

- **[`Shape`]**: the ordered field list of a record type (name, declared
  type, optional column name, required / ignore flags).
- **[`Schema`]**: built once from a shape; rejects field types the binder
  cannot handle (lists, maps, nested records, nested options).
- **[`RecordBinder`]**: reconciles a header, then decodes rows into any
  [`Record`] implementation.

## Supported field types

`String`, `bool`, every signed and unsigned integer width, `f32`, `f64`,
`DateTime<FixedOffset>`, and `Option` of any of those. Empty cells of `Option`
fields leave the field untouched.

## Usage

```rust
use rowbind_core::{
    BinderConfig, DeclaredType, FieldDecl, FieldRef, Record, RecordBinder, Schema, Shape,
    Tabular, Value, ValueError,
};

#[derive(Debug, Default, PartialEq)]
struct Player {
    name: String,
    age: u8,
    score: Option<f64>,
}

impl Record for Player {
    fn blank(_: &Schema) -> Self {
        Self::default()
    }

    fn shape_name(&self) -> &str {
        "player"
    }

    fn set_field(&mut self, field: FieldRef, value: Value) -> Result<(), ValueError> {
        match field.index() {
            0 => value.assign(&mut self.name),
            1 => value.assign(&mut self.age),
            2 => value.assign(&mut self.score),
            other => Err(ValueError::UnknownField(other)),
        }
    }
}

impl Tabular for Player {
    fn shape() -> Shape {
        Shape::new("player")
            .field(FieldDecl::new("name", DeclaredType::String).tag("Name,required"))
            .field(FieldDecl::new("age", DeclaredType::U8).required())
            .field(FieldDecl::new("score", DeclaredType::optional(DeclaredType::F64)))
    }
}

fn example() -> Result<(), Box<dyn std::error::Error>> {
    let mut binder = RecordBinder::<Player>::for_record(BinderConfig::default())?;
    binder.reconcile_header(&["Name", "Age", "Score"])?;

    let player = binder.new_record(&["Alice", "30", ""])?;
    assert_eq!(player, Player { name: "Alice".into(), age: 30, score: None });
    Ok(())
}
# example().unwrap();
```
*/

pub mod binder;
pub mod config;
pub mod dynamic;
pub mod errors;
pub mod kind;
pub mod reader;
pub mod schema;
pub mod shape;
pub mod value;

// Re-export main types for convenience
pub use binder::{BoundColumn, Record, RecordBinder, Tabular};
pub use config::{BinderConfig, TimeFormat, DEFAULT_TAG_FIELD_SEP};
pub use dynamic::DynamicRecord;
pub use errors::{
    CsvError, CsvResult, DecodeError, IncorrectHeaderError, ParseError, SchemaError, ValueError,
};
pub use kind::{FloatWidth, IntWidth, Kind};
pub use reader::{read_records, BindingReader};
pub use schema::{FieldDescriptor, FieldRef, Schema};
pub use shape::{DeclaredType, FieldDecl, Shape};
pub use value::{FromValue, Value};
