/*!
# Schema Builder

Turns a [`Shape`] into the ordered list of [`FieldDescriptor`]s the binder
works from. Every field type is checked here, once; a shape the binder cannot
handle fails with [`SchemaError`] before any header is seen.
*/

use crate::{
    config::BinderConfig,
    errors::SchemaError,
    kind::Kind,
    shape::{FieldDecl, Shape},
};
use tracing::debug;

/// Tag value marking a field as not bound to any column
pub const IGNORE_TAG: &str = "-";

/// Tag flag marking a column as mandatory
pub const REQUIRED_FLAG: &str = "required";

/// Handle to a field's storage within a record instance.
///
/// This is the field's position in the shape's declaration, ignored fields
/// included, so it lines up with a record's hand-written accessor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef(usize);

impl FieldRef {
    pub const fn at(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A record field as seen by the binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Lowercased external column name
    pub column: String,
    pub required: bool,
    pub field: FieldRef,
    pub kind: Kind,
}

/// Immutable descriptor list built from a record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    shape_name: String,
    field_names: Vec<String>,
    descriptors: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn build(shape: &Shape, config: &BinderConfig) -> Result<Self, SchemaError> {
        let mut descriptors = Vec::with_capacity(shape.fields.len());

        for (index, decl) in shape.fields.iter().enumerate() {
            let Some((column, required)) = resolve_binding(decl, &config.tag_field_sep) else {
                debug!(shape = %shape.name, field = %decl.name, "field ignored");
                continue;
            };

            let kind = Kind::resolve(&decl.ty).ok_or_else(|| SchemaError::UnsupportedType {
                field: decl.name.clone(),
                declared: decl.ty.to_string(),
            })?;

            debug!(
                shape = %shape.name,
                field = %decl.name,
                column = %column,
                required,
                kind = %kind,
                "field descriptor built"
            );

            descriptors.push(FieldDescriptor {
                column,
                required,
                field: FieldRef(index),
                kind,
            });
        }

        Ok(Self {
            shape_name: shape.name.clone(),
            field_names: shape.fields.iter().map(|f| f.name.clone()).collect(),
            descriptors,
        })
    }

    pub fn shape_name(&self) -> &str {
        &self.shape_name
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Number of declared fields, ignored ones included
    pub fn field_count(&self) -> usize {
        self.field_names.len()
    }

    pub fn field_name(&self, field: FieldRef) -> Option<&str> {
        self.field_names.get(field.0).map(String::as_str)
    }
}

/// Work out the column name and required flag of a field, or `None` if the
/// field is ignored. Structured settings win over the packed tag.
fn resolve_binding(decl: &FieldDecl, sep: &str) -> Option<(String, bool)> {
    if decl.ignore {
        return None;
    }

    let mut tag_column = None;
    let mut tag_required = false;
    if let Some(tag) = decl.tag.as_deref() {
        if tag == IGNORE_TAG {
            return None;
        }
        let (name, flags) = match tag.split_once(sep) {
            Some((name, flags)) if !sep.is_empty() => (name, Some(flags)),
            _ => (tag, None),
        };
        tag_column = Some(name).filter(|name| !name.is_empty());
        tag_required = flags.and_then(|flags| flags.split(sep).next()) == Some(REQUIRED_FLAG);
    }

    let column = decl
        .column
        .as_deref()
        .filter(|name| !name.is_empty())
        .or(tag_column)
        .unwrap_or(decl.name.as_str())
        .to_lowercase();
    let required = decl.required.unwrap_or(tag_required);

    Some((column, required))
}
