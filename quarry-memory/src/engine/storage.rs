use anyhow::{Result, bail};
use quarry_core::Value;
use std::collections::HashMap;

/// Storage class of a column, the file family's four affinities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Integer,
    Real,
    Text,
    Blob,
}

impl StorageClass {
    pub fn name(&self) -> &'static str {
        match self {
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
        }
    }
}

/// Whole database state. Cloning snapshots every table, which is what
/// transactions roll back to.
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub tables: HashMap<String, TableData>,
}

#[derive(Debug, Clone)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Box<[Value]>>,
    pub next_rowid: i64,
}

#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub name: String,
    pub ty: StorageClass,
    pub not_null: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub default: Option<Value>,
}

impl TableData {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Coerce an incoming cell into its column's storage class. NULL passes
/// through untouched; a value the class cannot hold is a datatype error.
pub fn normalize(class: StorageClass, value: Value) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    Ok(match (class, value) {
        (StorageClass::Integer, Value::Boolean(Some(v))) => Value::Int64(Some(v as i64)),
        (StorageClass::Integer, Value::Int16(Some(v))) => Value::Int64(Some(v as i64)),
        (StorageClass::Integer, Value::Int32(Some(v))) => Value::Int64(Some(v as i64)),
        (StorageClass::Integer, v @ Value::Int64(..)) => v,
        (StorageClass::Real, Value::Int16(Some(v))) => Value::Float64(Some(v as f64)),
        (StorageClass::Real, Value::Int32(Some(v))) => Value::Float64(Some(v as f64)),
        (StorageClass::Real, Value::Int64(Some(v))) => Value::Float64(Some(v as f64)),
        (StorageClass::Real, v @ Value::Float64(..)) => v,
        (StorageClass::Text, v @ Value::Varchar(..)) => v,
        (StorageClass::Blob, v @ Value::Blob(..)) => v,
        (class, value) => bail!(
            "datatype mismatch: cannot store {} in a {} column",
            value.type_name(),
            class.name(),
        ),
    })
}
