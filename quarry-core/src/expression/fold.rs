use crate::{EmptyFoldError, Expr, Result};

/// Reduce a sequence of expressions into one conjunction, left to right.
///
/// Folding zero expressions fails: there is no empty identity worth exposing
/// to the caller.
pub fn compound_and<I: IntoIterator<Item = Expr>>(expressions: I) -> Result<Expr> {
    fold(expressions, Expr::and, "AND")
}

/// Reduce a sequence of expressions into one disjunction, left to right.
pub fn compound_or<I: IntoIterator<Item = Expr>>(expressions: I) -> Result<Expr> {
    fold(expressions, Expr::or, "OR")
}

fn fold<I: IntoIterator<Item = Expr>>(
    expressions: I,
    combine: fn(Expr, Expr) -> Expr,
    operator: &'static str,
) -> Result<Expr> {
    let mut iter = expressions.into_iter();
    let first = iter
        .next()
        .ok_or(crate::Error::EmptyFold(EmptyFoldError { operator }))?;
    Ok(iter.fold(first, combine))
}
