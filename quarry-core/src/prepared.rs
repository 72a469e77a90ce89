use crate::{AsValue, Result};
use std::fmt::Display;

/// A backend prepared query handle.
///
/// Drivers pre-parse the SQL once and later bind positional parameters.
/// Values are converted through [`AsValue`]; `bind` appends, the driver
/// decides placeholder numbering.
pub trait Prepared: Send + Sync + Display {
    /// Remove every bound value.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
    /// Append a parameter value.
    fn bind(&mut self, value: impl AsValue) -> Result<&mut Self>;
}
