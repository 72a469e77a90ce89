use crate::{Context, IdentityRetrieval, SqlWriter, Value};

/// Writer for the client/server family: `$n` placeholders, native row value
/// membership, identity retrieval through `RETURNING`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresSqlWriter;

impl PostgresSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn dialect(&self) -> &'static str {
        "postgres"
    }

    fn supports_row_value_in(&self) -> bool {
        true
    }

    fn identity_retrieval(&self) -> IdentityRetrieval {
        IdentityRetrieval::Returning
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        out.push('$');
        out.push_str(itoa::Buffer::new().format(context.params.len()));
    }

    fn write_column_type(&self, out: &mut String, value: &Value) -> crate::Result<()> {
        if let Value::Blob(..) = value {
            out.push_str("BYTEA");
            return Ok(());
        }
        // The ANSI spellings already are the native ones.
        self.default_column_type(out, value)
    }
}

impl PostgresSqlWriter {
    fn default_column_type(&self, out: &mut String, value: &Value) -> crate::Result<()> {
        out.push_str(match value {
            Value::Boolean(..) => "BOOLEAN",
            Value::Int16(..) => "SMALLINT",
            Value::Int32(..) => "INTEGER",
            Value::Int64(..) => "BIGINT",
            Value::Float64(..) => "DOUBLE PRECISION",
            Value::Decimal(..) => "DECIMAL",
            Value::Varchar(..) => "VARCHAR",
            Value::Date(..) => "DATE",
            Value::Time(..) => "TIME",
            Value::Timestamp(..) => "TIMESTAMP",
            Value::Uuid(..) => "UUID",
            Value::Blob(..) | Value::Null => {
                return Err(self.unsupported("a column without a declared type"));
            }
        });
        Ok(())
    }
}
