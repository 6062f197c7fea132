//! Logical schema types. Pure data, inferred from or checked against batches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Boolean,
    Int64,
    Float64,
    Utf8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Look up a field by name, failing the way a table lookup would.
    pub fn field_named(&self, name: &str) -> crate::Result<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| crate::Error::ColumnNotFound(name.to_string()))
    }

    /// Append a field, replacing an existing one with the same name in place.
    pub fn with_field(mut self, field: Field) -> Self {
        match self.index_of(&field.name) {
            Some(idx) => self.fields[idx] = field,
            None => self.fields.push(field),
        }
        self
    }
}
