use crate::{BinaryOp, ColumnRef, Select, SqlWriter, UnaryOp, Value};

/// A node of the predicate / scalar expression tree.
///
/// The tree is an explicit sum type: rendering is a structural recursion over
/// the variants, performed by a [`SqlWriter`](crate::SqlWriter). Nodes are
/// immutable and freely reusable across queries and renderings.
///
/// Type compatibility between the two sides of a comparison is enforced by
/// the typed [`Column`](crate::Column) constructors before a node is ever
/// created; the tree itself is untyped.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Literal value. Rendered as a bound parameter, never as SQL text.
    Value(Value),
    /// Column reference.
    Column(ColumnRef),
    /// Row value: an ordered tuple of expressions.
    Tuple(Vec<Expr>),
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Membership in a finite literal sequence. An empty `list` is legal and
    /// renders as a constant predicate, never as malformed SQL.
    InList {
        operand: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    /// Membership in the rows of a sub-query.
    InSubQuery {
        operand: Box<Expr>,
        query: Box<Select>,
        negated: bool,
    },
    IsNull { operand: Box<Expr>, negated: bool },
}

impl Expr {
    /// Both this and `rhs` must hold.
    pub fn and(self, rhs: Expr) -> Expr {
        binary(BinaryOp::And, self, rhs)
    }

    /// Either this or `rhs` must hold.
    pub fn or(self, rhs: Expr) -> Expr {
        binary(BinaryOp::Or, self, rhs)
    }

    /// Logical negation.
    pub fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    /// Render this expression alone into SQL text plus its ordered
    /// parameter list.
    pub fn to_statement(&self, writer: &dyn SqlWriter) -> crate::Result<crate::Statement> {
        let mut context = crate::Context::new();
        let mut sql = String::with_capacity(128);
        writer.write_expression(&mut context, &mut sql, self)?;
        Ok(crate::Statement::new(sql, context.take_params()))
    }

    /// Numeric binding strength, used by writers to decide parenthesization.
    pub fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        match self {
            Expr::Value(..) | Expr::Column(..) | Expr::Tuple(..) => 1_000_000,
            Expr::Unary { op, .. } => writer.unary_op_precedence(op),
            Expr::Binary { op, .. } => writer.binary_op_precedence(op),
            Expr::InList { .. } | Expr::InSubQuery { .. } | Expr::IsNull { .. } => {
                writer.comparison_precedence()
            }
        }
    }
}

/// Both expressions must hold.
pub fn and(lhs: Expr, rhs: Expr) -> Expr {
    lhs.and(rhs)
}

/// Either expression must hold.
pub fn or(lhs: Expr, rhs: Expr) -> Expr {
    lhs.or(rhs)
}

/// The expression must not hold.
pub fn not(expr: Expr) -> Expr {
    expr.not()
}

pub(crate) fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    // Comparing against a typed NULL means a null check, `= NULL` matches
    // nothing in SQL.
    if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) {
        if let Expr::Value(v) = &rhs {
            if v.is_null() {
                return is_null(lhs, op == BinaryOp::NotEq);
            }
        }
    }
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub(crate) fn in_list(operand: Expr, list: Vec<Expr>, negated: bool) -> Expr {
    Expr::InList {
        operand: Box::new(operand),
        list,
        negated,
    }
}

pub(crate) fn in_query(operand: Expr, query: Select, negated: bool) -> Expr {
    Expr::InSubQuery {
        operand: Box::new(operand),
        query: Box::new(query),
        negated,
    }
}

pub(crate) fn is_null(operand: Expr, negated: bool) -> Expr {
    Expr::IsNull {
        operand: Box::new(operand),
        negated,
    }
}
