use crate::{CodecError, ColumnDef, Result, Value};
use rust_decimal::Decimal;
use time::{
    Date, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};
use uuid::Uuid;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:6]");
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

/// How a dialect stores the types it has no native column for.
///
/// The file family keeps only integer, real, text and blob storage classes,
/// so temporals, UUIDs, decimals and booleans are lowered on the way in and
/// raised back to the declared variant on the way out. Dialects with native
/// types use [`WireCodec::native`] and pass values through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireCodec {
    pub boolean_as_integer: bool,
    pub integer_widening: bool,
    pub temporal_as_text: bool,
    pub uuid_as_text: bool,
    pub decimal_as_text: bool,
}

impl WireCodec {
    pub const fn native() -> Self {
        Self {
            boolean_as_integer: false,
            integer_widening: false,
            temporal_as_text: false,
            uuid_as_text: false,
            decimal_as_text: false,
        }
    }
    /// Storage classes of the file family: INTEGER, REAL, TEXT, BLOB.
    pub const fn storage_classes() -> Self {
        Self {
            boolean_as_integer: true,
            integer_widening: true,
            temporal_as_text: true,
            uuid_as_text: true,
            decimal_as_text: true,
        }
    }
}

/// Reject a value whose runtime type or nullability does not match the
/// column declaration. This is the encode side guard: it runs when a value
/// is attached to a statement, long before any SQL is rendered.
pub fn check(column: &ColumnDef, value: &Value) -> Result<()> {
    if value.is_null() {
        if !column.nullable {
            return Err(CodecError::NullNotAllowed {
                column: column.name().to_string(),
            }
            .into());
        }
        return Ok(());
    }
    if !column.value.same_type(value) {
        return Err(CodecError::TypeMismatch {
            column: column.name().to_string(),
            expected: column.value.type_name(),
            found: value.type_name(),
        }
        .into());
    }
    Ok(())
}

fn format_error(value: impl std::fmt::Debug) -> CodecError {
    CodecError::Conversion {
        value: format!("{:?}", value),
        target: "text".to_string(),
    }
}

/// Lower a value to the representation the dialect stores for its type.
pub fn to_wire(codec: &WireCodec, value: Value) -> Result<Value> {
    Ok(match value {
        Value::Boolean(v) if codec.boolean_as_integer => Value::Int64(v.map(|b| b as i64)),
        Value::Int16(v) if codec.integer_widening => Value::Int64(v.map(|n| n as i64)),
        Value::Int32(v) if codec.integer_widening => Value::Int64(v.map(|n| n as i64)),
        Value::Date(v) if codec.temporal_as_text => Value::Varchar(match v {
            Some(d) => Some(d.format(DATE_FORMAT).map_err(|_| format_error(d))?),
            None => None,
        }),
        Value::Time(v) if codec.temporal_as_text => Value::Varchar(match v {
            Some(t) => Some(t.format(TIME_FORMAT).map_err(|_| format_error(t))?),
            None => None,
        }),
        Value::Timestamp(v) if codec.temporal_as_text => Value::Varchar(match v {
            Some(ts) => Some(ts.format(TIMESTAMP_FORMAT).map_err(|_| format_error(ts))?),
            None => None,
        }),
        Value::Uuid(v) if codec.uuid_as_text => Value::Varchar(v.map(|u| u.to_string())),
        Value::Decimal(v) if codec.decimal_as_text => Value::Varchar(v.map(|d| d.to_string())),
        other => other,
    })
}

fn untypeable(column: &ColumnDef, wire: &Value) -> crate::Error {
    CodecError::TypeMismatch {
        column: column.name().to_string(),
        expected: column.value.type_name(),
        found: wire.type_name(),
    }
    .into()
}

fn parse_failed(column: &ColumnDef, text: &str) -> crate::Error {
    CodecError::Conversion {
        value: text.to_string(),
        target: column.value.type_name().to_string(),
    }
    .into()
}

/// Raise a wire value back to the variant the column was declared with.
///
/// Accepts every representation [`to_wire`] can produce for the declared
/// type, for any dialect, so `from_wire(col, to_wire(codec, v)) == v` holds
/// for every value valid for the column.
pub fn from_wire(column: &ColumnDef, wire: Value) -> Result<Value> {
    if wire.is_null() {
        if !column.nullable {
            return Err(CodecError::NullNotAllowed {
                column: column.name().to_string(),
            }
            .into());
        }
        return Ok(column.value.as_empty());
    }
    if column.value.same_type(&wire) {
        return Ok(wire);
    }
    let out_of_range = |v: &dyn std::fmt::Display| {
        crate::Error::from(CodecError::OutOfRange {
            value: v.to_string(),
            target: column.value.type_name().to_string(),
        })
    };
    Ok(match (&column.value, wire) {
        (Value::Boolean(..), Value::Int64(Some(v))) => Value::Boolean(Some(v != 0)),
        (Value::Boolean(..), Value::Int32(Some(v))) => Value::Boolean(Some(v != 0)),
        (Value::Int16(..), Value::Int64(Some(v))) => {
            Value::Int16(Some(i16::try_from(v).map_err(|_| out_of_range(&v))?))
        }
        (Value::Int16(..), Value::Int32(Some(v))) => {
            Value::Int16(Some(i16::try_from(v).map_err(|_| out_of_range(&v))?))
        }
        (Value::Int32(..), Value::Int64(Some(v))) => {
            Value::Int32(Some(i32::try_from(v).map_err(|_| out_of_range(&v))?))
        }
        (Value::Int32(..), Value::Int16(Some(v))) => Value::Int32(Some(v as i32)),
        (Value::Int64(..), Value::Int32(Some(v))) => Value::Int64(Some(v as i64)),
        (Value::Int64(..), Value::Int16(Some(v))) => Value::Int64(Some(v as i64)),
        (Value::Float64(..), Value::Int64(Some(v))) => Value::Float64(Some(v as f64)),
        (Value::Decimal(..), Value::Varchar(Some(v))) => Value::Decimal(Some(
            v.parse::<Decimal>().map_err(|_| parse_failed(column, &v))?,
        )),
        (Value::Decimal(..), Value::Int64(Some(v))) => Value::Decimal(Some(Decimal::from(v))),
        (Value::Date(..), Value::Varchar(Some(v))) => Value::Date(Some(
            Date::parse(&v, DATE_FORMAT).map_err(|_| parse_failed(column, &v))?,
        )),
        (Value::Time(..), Value::Varchar(Some(v))) => Value::Time(Some(
            Time::parse(&v, TIME_FORMAT).map_err(|_| parse_failed(column, &v))?,
        )),
        (Value::Timestamp(..), Value::Varchar(Some(v))) => Value::Timestamp(Some(
            PrimitiveDateTime::parse(&v, TIMESTAMP_FORMAT)
                .map_err(|_| parse_failed(column, &v))?,
        )),
        (Value::Uuid(..), Value::Varchar(Some(v))) => Value::Uuid(Some(
            Uuid::parse_str(&v).map_err(|_| parse_failed(column, &v))?,
        )),
        (_, wire) => return Err(untypeable(column, &wire)),
    })
}
