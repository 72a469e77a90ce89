use crate::{AsValue, Column, Expr, Value};

/// Right hand side of a typed comparison: a literal of the column's type,
/// another column of the same type, or a bare inner value for a nullable
/// column. Anything else does not compile.
pub trait Operand<T> {
    fn into_expr(self) -> Expr;
}

impl<T: AsValue> Operand<T> for T {
    fn into_expr(self) -> Expr {
        Expr::Value(self.as_value())
    }
}

impl<U: AsValue> Operand<Option<U>> for U {
    fn into_expr(self) -> Expr {
        Expr::Value(self.as_value())
    }
}

impl<T> Operand<T> for &Column<T> {
    fn into_expr(self) -> Expr {
        Expr::Column(self.def.column_ref.clone())
    }
}

impl Operand<String> for &str {
    fn into_expr(self) -> Expr {
        Expr::Value(Value::Varchar(Some(self.to_owned())))
    }
}

impl Operand<Option<String>> for &str {
    fn into_expr(self) -> Expr {
        Expr::Value(Value::Varchar(Some(self.to_owned())))
    }
}
