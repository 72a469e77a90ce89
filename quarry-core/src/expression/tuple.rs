use crate::{
    AsValue, Column, Expr, Result, Select,
    column::check_arity,
    expression::{in_list, in_query},
};

/// Row value membership: an ordered tuple of columns tested against a
/// sequence of literal tuples of matching arity, or against a sub-query
/// projecting the same number of columns.
///
/// A composite membership test is a single expression node; how it is spelled
/// (native row value `IN` or an equivalent rewrite) is decided by the dialect
/// writer at render time.
pub trait RowTuple {
    /// The Rust tuple carrying one literal row.
    type Row;

    fn columns(&self) -> Vec<Expr>;
    fn row_exprs(row: Self::Row) -> Vec<Expr>;
    fn arity() -> usize;

    fn in_list<I: IntoIterator<Item = Self::Row>>(&self, rows: I) -> Expr {
        in_list(
            Expr::Tuple(self.columns()),
            rows.into_iter()
                .map(|row| Expr::Tuple(Self::row_exprs(row)))
                .collect(),
            false,
        )
    }

    fn not_in_list<I: IntoIterator<Item = Self::Row>>(&self, rows: I) -> Expr {
        in_list(
            Expr::Tuple(self.columns()),
            rows.into_iter()
                .map(|row| Expr::Tuple(Self::row_exprs(row)))
                .collect(),
            true,
        )
    }

    fn in_query(&self, query: Select) -> Result<Expr> {
        check_arity(&query, Self::arity())?;
        Ok(in_query(Expr::Tuple(self.columns()), query, false))
    }

    fn not_in_query(&self, query: Select) -> Result<Expr> {
        check_arity(&query, Self::arity())?;
        Ok(in_query(Expr::Tuple(self.columns()), query, true))
    }
}

impl<A: AsValue, B: AsValue> RowTuple for (&Column<A>, &Column<B>) {
    type Row = (A, B);

    fn columns(&self) -> Vec<Expr> {
        vec![
            Expr::Column(self.0.def.column_ref.clone()),
            Expr::Column(self.1.def.column_ref.clone()),
        ]
    }
    fn row_exprs(row: Self::Row) -> Vec<Expr> {
        vec![
            Expr::Value(row.0.as_value()),
            Expr::Value(row.1.as_value()),
        ]
    }
    fn arity() -> usize {
        2
    }
}

impl<A: AsValue, B: AsValue, C: AsValue> RowTuple for (&Column<A>, &Column<B>, &Column<C>) {
    type Row = (A, B, C);

    fn columns(&self) -> Vec<Expr> {
        vec![
            Expr::Column(self.0.def.column_ref.clone()),
            Expr::Column(self.1.def.column_ref.clone()),
            Expr::Column(self.2.def.column_ref.clone()),
        ]
    }
    fn row_exprs(row: Self::Row) -> Vec<Expr> {
        vec![
            Expr::Value(row.0.as_value()),
            Expr::Value(row.1.as_value()),
            Expr::Value(row.2.as_value()),
        ]
    }
    fn arity() -> usize {
        3
    }
}
