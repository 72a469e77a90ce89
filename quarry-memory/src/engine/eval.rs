use super::{Database, SqlExpr, exec_select};
use anyhow::{Result, bail};
use quarry_core::{BinaryOp, Value};
use std::cmp::Ordering;

/// Three valued logic: predicates over NULL evaluate to `Unknown`, and only
/// rows whose predicate is `True` pass a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    pub fn from_bool(value: bool) -> Self {
        if value { Truth::True } else { Truth::False }
    }

    pub fn not(self) -> Self {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }
}

/// Everything an expression may refer to while one row is under evaluation.
pub struct EvalContext<'a> {
    pub db: &'a Database,
    pub params: &'a [Value],
    pub labels: &'a [String],
    pub row: &'a [Value],
}

impl<'a> EvalContext<'a> {
    /// Context with no current row, for INSERT value lists.
    pub fn rowless(db: &'a Database, params: &'a [Value]) -> Self {
        Self {
            db,
            params,
            labels: &[],
            row: &[],
        }
    }
}

pub fn eval_predicate(expr: &SqlExpr, ctx: &EvalContext) -> Result<Truth> {
    Ok(match expr {
        SqlExpr::Bool(value) => Truth::from_bool(*value),
        SqlExpr::Not(inner) => eval_predicate(inner, ctx)?.not(),
        SqlExpr::Binary { op, lhs, rhs } => match op {
            BinaryOp::And => eval_predicate(lhs, ctx)?.and(eval_predicate(rhs, ctx)?),
            BinaryOp::Or => eval_predicate(lhs, ctx)?.or(eval_predicate(rhs, ctx)?),
            comparison => {
                let l = eval_scalar(lhs, ctx)?;
                let r = eval_scalar(rhs, ctx)?;
                match compare(&l, &r)? {
                    None => Truth::Unknown,
                    Some(ordering) => Truth::from_bool(match comparison {
                        BinaryOp::Eq => ordering == Ordering::Equal,
                        BinaryOp::NotEq => ordering != Ordering::Equal,
                        BinaryOp::Less => ordering == Ordering::Less,
                        BinaryOp::LessEq => ordering != Ordering::Greater,
                        BinaryOp::Greater => ordering == Ordering::Greater,
                        BinaryOp::GreaterEq => ordering != Ordering::Less,
                        BinaryOp::And | BinaryOp::Or => unreachable!(),
                    }),
                }
            }
        },
        SqlExpr::IsNull { operand, negated } => {
            let value = eval_scalar(operand, ctx)?;
            let truth = Truth::from_bool(value.is_null());
            if *negated { truth.not() } else { truth }
        }
        SqlExpr::InList {
            operand,
            list,
            negated,
        } => {
            let needle = eval_scalar(operand, ctx)?;
            let haystack = list
                .iter()
                .map(|item| eval_scalar(item, ctx))
                .collect::<Result<Vec<_>>>()?;
            let truth = membership(&needle, &haystack)?;
            if *negated { truth.not() } else { truth }
        }
        SqlExpr::InSelect {
            operand,
            select,
            negated,
        } => {
            let needle = eval_scalar(operand, ctx)?;
            let (_, rows) = exec_select(ctx.db, select, ctx.params)?;
            let haystack = rows
                .iter()
                .map(|row| match row.first() {
                    Some(value) => Ok(value.clone()),
                    None => bail!("sub-query produced a row without columns"),
                })
                .collect::<Result<Vec<_>>>()?;
            let truth = membership(&needle, &haystack)?;
            if *negated { truth.not() } else { truth }
        }
        other => bail!("{:?} is not a predicate", other),
    })
}

/// SQL membership: equal to any member is true, otherwise unknown if any
/// member (or the operand) is NULL, otherwise false.
fn membership(needle: &Value, haystack: &[Value]) -> Result<Truth> {
    let mut result = Truth::False;
    if needle.is_null() {
        result = Truth::Unknown;
    }
    for member in haystack {
        match compare(needle, member)? {
            Some(Ordering::Equal) => return Ok(Truth::True),
            None => result = Truth::Unknown,
            _ => {}
        }
    }
    Ok(result)
}

pub fn eval_scalar(expr: &SqlExpr, ctx: &EvalContext) -> Result<Value> {
    Ok(match expr {
        SqlExpr::Column(name) => {
            let Some(index) = ctx.labels.iter().position(|label| label == name) else {
                bail!("no such column: {}", name);
            };
            ctx.row[index].clone()
        }
        SqlExpr::Param(index) => match ctx.params.get(*index) {
            Some(value) => value.clone(),
            None => bail!(
                "statement refers to parameter {} but only {} are bound",
                index + 1,
                ctx.params.len(),
            ),
        },
        SqlExpr::Literal(value) => value.clone(),
        SqlExpr::Bool(value) => Value::Boolean(Some(*value)),
        other => bail!("{:?} is not a scalar expression", other),
    })
}

/// Compare two stored values. `None` means incomparable under three valued
/// logic: one side is NULL (or a NaN float).
pub fn compare(a: &Value, b: &Value) -> Result<Option<Ordering>> {
    if a.is_null() || b.is_null() {
        return Ok(None);
    }
    Ok(match (a, b) {
        (Value::Int64(Some(l)), Value::Int64(Some(r))) => Some(l.cmp(r)),
        (Value::Float64(Some(l)), Value::Float64(Some(r))) => l.partial_cmp(r),
        (Value::Int64(Some(l)), Value::Float64(Some(r))) => (*l as f64).partial_cmp(r),
        (Value::Float64(Some(l)), Value::Int64(Some(r))) => l.partial_cmp(&(*r as f64)),
        (Value::Varchar(Some(l)), Value::Varchar(Some(r))) => Some(l.cmp(r)),
        (Value::Blob(Some(l)), Value::Blob(Some(r))) => Some(l.cmp(r)),
        (Value::Boolean(Some(l)), Value::Boolean(Some(r))) => Some(l.cmp(r)),
        (l, r) => bail!("cannot compare {} with {}", l.type_name(), r.type_name()),
    })
}

/// Total ordering for ORDER BY: NULL sorts first, incomparable pairs keep
/// their relative position.
pub fn compare_for_sort(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare(a, b).ok().flatten().unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kleene_connectives() {
        use Truth::*;
        assert_eq!(False.and(Unknown), False);
        assert_eq!(Unknown.and(True), Unknown);
        assert_eq!(True.or(Unknown), True);
        assert_eq!(Unknown.or(False), Unknown);
        assert_eq!(Unknown.not(), Unknown);
    }

    #[test]
    fn null_never_compares() {
        let null = Value::Int64(None);
        let one = Value::Int64(Some(1));
        assert_eq!(compare(&null, &one).unwrap(), None);
        assert_eq!(compare(&one, &null).unwrap(), None);
        assert_eq!(
            compare(&one, &Value::Float64(Some(1.0))).unwrap(),
            Some(Ordering::Equal),
        );
        assert!(compare(&one, &Value::Varchar(Some("1".into()))).is_err());
    }
}
