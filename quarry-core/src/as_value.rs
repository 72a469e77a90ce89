use crate::{CodecError, Result, Value};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use std::any;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// representation backing query parameters and row decoding.
///
/// `try_from_value` accepts the canonical variant for the type plus the usual
/// widenings (a range checked `Int64` decodes into an `i32`, an integer into a
/// `Decimal`), so wire values coming back from a driver land in the type the
/// caller declared.
pub trait AsValue {
    /// Whether an absent cell is representable by this type.
    const NULLABLE: bool = false;
    /// The NULL carrying variant for this type. Used for column prototypes.
    fn as_empty_value() -> Value;
    /// Convert this value into its owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn conversion<T>(value: &Value) -> CodecError {
    CodecError::Conversion {
        value: format!("{:?}", value),
        target: any::type_name::<T>().to_string(),
    }
}

macro_rules! impl_as_value {
    ($source:ty, $variant:path $(, $pat:pat => $expr:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $variant(Some(v)) => Ok(v),
                    $($pat => $expr,)*
                    other => Err(conversion::<Self>(&other).into()),
                }
            }
        }
    };
}

macro_rules! narrow_int {
    ($target:ty, $v:expr) => {{
        let v = $v;
        <$target>::try_from(v).map_err(|_| {
            crate::Error::from(CodecError::OutOfRange {
                value: v.to_string(),
                target: any::type_name::<$target>().to_string(),
            })
        })
    }};
}

impl_as_value!(
    bool,
    Value::Boolean,
    Value::Int16(Some(v)) => Ok(v != 0),
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
);
impl_as_value!(
    i16,
    Value::Int16,
    Value::Int32(Some(v)) => narrow_int!(i16, v),
    Value::Int64(Some(v)) => narrow_int!(i16, v),
);
impl_as_value!(
    i32,
    Value::Int32,
    Value::Int16(Some(v)) => Ok(v as i32),
    Value::Int64(Some(v)) => narrow_int!(i32, v),
);
impl_as_value!(
    i64,
    Value::Int64,
    Value::Int16(Some(v)) => Ok(v as i64),
    Value::Int32(Some(v)) => Ok(v as i64),
);
impl_as_value!(
    f64,
    Value::Float64,
    Value::Int16(Some(v)) => Ok(v as f64),
    Value::Int32(Some(v)) => Ok(v as f64),
    Value::Int64(Some(v)) => Ok(v as f64),
);
impl_as_value!(
    Decimal,
    Value::Decimal,
    Value::Int16(Some(v)) => Ok(Decimal::from(v)),
    Value::Int32(Some(v)) => Ok(Decimal::from(v)),
    Value::Int64(Some(v)) => Ok(Decimal::from(v)),
    Value::Float64(Some(v)) => Decimal::from_f64(v).ok_or_else(|| {
        crate::Error::from(CodecError::OutOfRange {
            value: v.to_string(),
            target: "Decimal".to_string(),
        })
    }),
    Value::Varchar(Some(ref v)) => v.parse().map_err(|_| conversion::<Self>(&Value::Varchar(Some(v.clone()))).into()),
);
impl_as_value!(String, Value::Varchar);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);
impl_as_value!(
    Uuid,
    Value::Uuid,
    Value::Varchar(Some(ref v)) => Uuid::parse_str(v).map_err(|_| conversion::<Self>(&Value::Varchar(Some(v.clone()))).into()),
);
impl_as_value!(Box<[u8]>, Value::Blob);

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            other => Err(conversion::<Self>(&other).into()),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    const NULLABLE: bool = true;
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    const NULLABLE: bool = T::NULLABLE;
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.to_owned()))
    }
}
