use crate::{
    AsValue, BinaryOp, Expr, ProjectionError, Result, Select, Value,
    expression::{Operand, binary, in_list, in_query, is_null},
};
use std::{fmt::Debug, marker::PhantomData, sync::Arc};

/// Reference to a table column, as it appears inside expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: Arc<str>,
    pub table: Arc<str>,
}

/// Declarative metadata of a table column.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub column_ref: ColumnRef,
    /// `Value` prototype describing the column type.
    pub value: Value,
    pub nullable: bool,
    pub primary_key: bool,
    /// Identity column: the value is generated at insert time. Implies
    /// `primary_key`.
    pub auto_increment: bool,
    pub default: Option<Value>,
    /// Foreign key target. Must point at a primary key, validated when the
    /// table is built.
    pub references: Option<ColumnRef>,
}

impl ColumnDef {
    pub fn name(&self) -> &str {
        &self.column_ref.name
    }
    pub fn table(&self) -> &str {
        &self.column_ref.table
    }
}

/// Types that expose an underlying column definition. Lets heterogeneous
/// column handles share projection and ordering surfaces.
pub trait ColumnTrait {
    fn def(&self) -> &Arc<ColumnDef>;
    fn column_ref(&self) -> &ColumnRef {
        &self.def().column_ref
    }
}

/// Typed handle to a declared column.
///
/// The type parameter carries the Rust type of the column through the
/// expression algebra, so both sides of a comparison are checked for
/// compatibility when the expression is constructed. An incompatible operand
/// does not compile.
pub struct Column<T> {
    pub(crate) def: Arc<ColumnDef>,
    marker: PhantomData<fn() -> T>,
}

impl<T> Column<T> {
    pub(crate) fn new(def: Arc<ColumnDef>) -> Self {
        Self {
            def,
            marker: PhantomData,
        }
    }
    fn expr(&self) -> Expr {
        Expr::Column(self.def.column_ref.clone())
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self::new(self.def.clone())
    }
}

impl<T> Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column({}.{})", self.def.table(), self.def.name())
    }
}

impl<T> ColumnTrait for Column<T> {
    fn def(&self) -> &Arc<ColumnDef> {
        &self.def
    }
}

impl<T: AsValue> Column<T> {
    pub fn eq(&self, operand: impl Operand<T>) -> Expr {
        binary(BinaryOp::Eq, self.expr(), operand.into_expr())
    }
    pub fn ne(&self, operand: impl Operand<T>) -> Expr {
        binary(BinaryOp::NotEq, self.expr(), operand.into_expr())
    }
    pub fn lt(&self, operand: impl Operand<T>) -> Expr {
        binary(BinaryOp::Less, self.expr(), operand.into_expr())
    }
    pub fn le(&self, operand: impl Operand<T>) -> Expr {
        binary(BinaryOp::LessEq, self.expr(), operand.into_expr())
    }
    pub fn gt(&self, operand: impl Operand<T>) -> Expr {
        binary(BinaryOp::Greater, self.expr(), operand.into_expr())
    }
    pub fn ge(&self, operand: impl Operand<T>) -> Expr {
        binary(BinaryOp::GreaterEq, self.expr(), operand.into_expr())
    }

    pub fn is_null(&self) -> Expr {
        is_null(self.expr(), false)
    }
    pub fn is_not_null(&self) -> Expr {
        is_null(self.expr(), true)
    }

    /// Membership in a finite sequence of literals. An empty sequence is a
    /// legal expression that matches no row.
    pub fn in_list<I>(&self, values: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Operand<T>,
    {
        in_list(
            self.expr(),
            values.into_iter().map(Operand::into_expr).collect(),
            false,
        )
    }

    /// Negated membership. An empty sequence matches every row.
    pub fn not_in_list<I>(&self, values: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Operand<T>,
    {
        in_list(
            self.expr(),
            values.into_iter().map(Operand::into_expr).collect(),
            true,
        )
    }

    /// Membership in the result of a sub-query, which must project exactly
    /// one column.
    pub fn in_query(&self, query: Select) -> Result<Expr> {
        check_arity(&query, 1)?;
        Ok(in_query(self.expr(), query, false))
    }

    pub fn not_in_query(&self, query: Select) -> Result<Expr> {
        check_arity(&query, 1)?;
        Ok(in_query(self.expr(), query, true))
    }
}

pub(crate) fn check_arity(query: &Select, expected: usize) -> Result<()> {
    let found = query.arity();
    if found != expected {
        return Err(ProjectionError::SubQueryArity { expected, found }.into());
    }
    Ok(())
}
