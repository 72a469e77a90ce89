use crate::{EmptinessProbe, SqlWriter, Value, WireCodec};

/// Writer for the file engine family.
///
/// Storage reduces to the INTEGER, REAL, TEXT and BLOB classes, so booleans,
/// temporals, UUIDs and decimals are lowered by the wire codec. Identities
/// come back through `last_insert_rowid`, emptiness is probed with a
/// `LIMIT 1` select, and row value membership is rewritten as OR of AND.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteSqlWriter;

impl SqliteSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn dialect(&self) -> &'static str {
        "sqlite"
    }

    fn wire_codec(&self) -> WireCodec {
        WireCodec::storage_classes()
    }

    fn emptiness_probe(&self) -> EmptinessProbe {
        EmptinessProbe::LimitOne
    }

    fn identity_clause(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn write_column_type(&self, out: &mut String, value: &Value) -> crate::Result<()> {
        out.push_str(match value {
            Value::Boolean(..)
            | Value::Int16(..)
            | Value::Int32(..)
            | Value::Int64(..) => "INTEGER",
            Value::Float64(..) => "REAL",
            Value::Decimal(..)
            | Value::Varchar(..)
            | Value::Date(..)
            | Value::Time(..)
            | Value::Timestamp(..)
            | Value::Uuid(..) => "TEXT",
            Value::Blob(..) => "BLOB",
            Value::Null => {
                return Err(self.unsupported("a column without a declared type"));
            }
        });
        Ok(())
    }
}
