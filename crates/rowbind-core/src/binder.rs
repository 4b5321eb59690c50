/*!
# Record Binder

Reconciles an observed CSV header against a [`Schema`] and decodes data rows
into record instances using the resulting column bindings.

A binder is driven per file: [`RecordBinder::reconcile_header`] once, then
[`RecordBinder::decode_row`] (or [`RecordBinder::new_record`]) for every data
row. Reconciling again discards the previous bindings entirely.

Reconciliation takes `&mut self`, decoding takes `&self`: once a header is
reconciled the binder can be shared across threads for decoding. Workers that
each need their own header use [`RecordBinder::fork`], which shares the
descriptor list but not the bindings.
*/

use crate::{
    config::BinderConfig,
    errors::{DecodeError, IncorrectHeaderError, SchemaError, ValueError},
    schema::{FieldDescriptor, FieldRef, Schema},
    shape::Shape,
    value::Value,
};
use std::{marker::PhantomData, sync::Arc};
use tracing::debug;

/// Accessor table of a record type: how the binder creates instances and
/// writes typed values into their fields.
pub trait Record: Sized {
    /// A zero-valued instance for the given schema
    fn blank(schema: &Schema) -> Self;

    /// Name of the shape this instance belongs to; must match
    /// [`Schema::shape_name`] for the binder to write into it
    fn shape_name(&self) -> &str;

    /// Write `value` into the field identified by `field`
    fn set_field(&mut self, field: FieldRef, value: Value) -> Result<(), ValueError>;
}

/// A record type that describes its own shape.
pub trait Tabular: Record {
    fn shape() -> Shape;
}

/// A descriptor bound to a position in the current header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundColumn {
    /// Index into [`Schema::descriptors`]
    pub descriptor: usize,
    /// Position of the column in the header, and of the cell in each row
    pub record_index: usize,
}

pub struct RecordBinder<R> {
    schema: Arc<Schema>,
    config: BinderConfig,
    /// Resolved header position per descriptor, `None` while unbound
    positions: Vec<Option<usize>>,
    bound: Vec<BoundColumn>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordBinder<R> {
    pub fn new(schema: Arc<Schema>, config: BinderConfig) -> Self {
        let positions = vec![None; schema.descriptors().len()];
        Self {
            schema,
            config,
            positions,
            bound: Vec::new(),
            _record: PhantomData,
        }
    }

    pub fn from_shape(shape: &Shape, config: BinderConfig) -> Result<Self, SchemaError> {
        let schema = Schema::build(shape, &config)?;
        Ok(Self::new(Arc::new(schema), config))
    }

    pub fn for_record(config: BinderConfig) -> Result<Self, SchemaError>
    where
        R: Tabular,
    {
        Self::from_shape(&R::shape(), config)
    }

    /// A binder sharing this one's descriptors, with nothing bound yet.
    pub fn fork(&self) -> Self {
        Self::new(Arc::clone(&self.schema), self.config.clone())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bindings from the last successful reconciliation, in header order
    pub fn bound_columns(&self) -> &[BoundColumn] {
        &self.bound
    }

    /// Header position bound to `column`, matched the same way header cells are
    pub fn position_of(&self, column: &str) -> Option<usize> {
        let column = normalize(column);
        self.schema
            .descriptors()
            .iter()
            .zip(&self.positions)
            .find(|(descriptor, _)| descriptor.column == column)
            .and_then(|(_, position)| *position)
    }

    /// Match `header` against the schema and cache the column bindings.
    ///
    /// Every header cell must name a known column, and every required column
    /// must be present. On failure nothing stays bound.
    pub fn reconcile_header<S: AsRef<str>>(
        &mut self,
        header: &[S],
    ) -> Result<(), IncorrectHeaderError> {
        self.reset();
        let result = self.bind_header(header);
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn bind_header<S: AsRef<str>>(&mut self, header: &[S]) -> Result<(), IncorrectHeaderError> {
        for (record_index, cell) in header.iter().enumerate() {
            let original: &str = cell.as_ref();
            let column = normalize(original);
            let mut found = false;

            for (descriptor, field) in self.schema.descriptors().iter().enumerate() {
                if field.column == column {
                    self.positions[descriptor] = Some(record_index);
                    self.bound.push(BoundColumn {
                        descriptor,
                        record_index,
                    });
                    found = true;
                }
            }

            if !found {
                return Err(IncorrectHeaderError::UnexpectedColumn(original.to_string()));
            }
        }

        let missing = self
            .schema
            .descriptors()
            .iter()
            .zip(&self.positions)
            .find(|(field, position)| field.required && position.is_none());
        if let Some((field, _)) = missing {
            return Err(IncorrectHeaderError::MissingColumn(field.column.clone()));
        }

        debug!(
            shape = %self.schema.shape_name(),
            columns = header.len(),
            bound = self.bound.len(),
            "header reconciled"
        );
        Ok(())
    }

    fn reset(&mut self) {
        self.positions.iter_mut().for_each(|position| *position = None);
        self.bound.clear();
    }

    /// Decode one data row into `target`.
    ///
    /// Empty cells of optional fields leave the field untouched. The first
    /// failing cell aborts the row; fields written before it keep their new
    /// values.
    pub fn decode_row<S: AsRef<str>>(&self, record: &[S], target: &mut R) -> Result<(), DecodeError> {
        if record.len() != self.bound.len() {
            return Err(self.row_shape_error(record.len()));
        }
        if target.shape_name() != self.schema.shape_name() {
            return Err(DecodeError::ShapeMismatch {
                expected: self.schema.shape_name().to_string(),
                found: target.shape_name().to_string(),
            });
        }

        for bound in &self.bound {
            let field = &self.schema.descriptors()[bound.descriptor];
            let cell: &str = record
                .get(bound.record_index)
                .map(AsRef::as_ref)
                .ok_or_else(|| self.row_shape_error(record.len()))?;

            if cell.is_empty() && field.kind.is_optional() {
                continue;
            }

            write_cell(field, cell, &self.config, target)?;
        }

        Ok(())
    }

    /// Decode one data row into a freshly created record.
    pub fn new_record<S: AsRef<str>>(&self, record: &[S]) -> Result<R, DecodeError> {
        let mut target = R::blank(&self.schema);
        self.decode_row(record, &mut target)?;
        Ok(target)
    }

    fn row_shape_error(&self, found: usize) -> DecodeError {
        DecodeError::RowShape {
            expected: self.bound.len(),
            found,
        }
    }
}

fn write_cell<R: Record>(
    field: &FieldDescriptor,
    cell: &str,
    config: &BinderConfig,
    target: &mut R,
) -> Result<(), DecodeError> {
    let value = field
        .kind
        .coerce(cell, config)
        .map_err(|source| DecodeError::Parse {
            column: field.column.clone(),
            source,
        })?;
    target
        .set_field(field.field, value)
        .map_err(|source| DecodeError::Write {
            column: field.column.clone(),
            source,
        })
}

fn normalize(column: &str) -> String {
    column.trim().to_lowercase()
}
