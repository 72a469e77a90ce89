use super::StorageClass;
use quarry_core::{BinaryOp, Value};

#[derive(Debug, Clone)]
pub enum Stmt {
    CreateTable {
        name: String,
        if_not_exists: bool,
        columns: Vec<ColumnSpec>,
    },
    DropTable {
        name: String,
        if_exists: bool,
    },
    Insert {
        table: String,
        columns: Vec<String>,
        values: Vec<SqlExpr>,
    },
    Update {
        table: String,
        sets: Vec<(String, SqlExpr)>,
        predicate: Option<SqlExpr>,
    },
    Delete {
        table: String,
        predicate: Option<SqlExpr>,
    },
    Select(SelectStmt),
}

#[derive(Debug, Clone)]
pub struct SelectStmt {
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub source: Source,
    pub predicate: Option<SqlExpr>,
    /// `(column, ascending)` pairs in declaration order.
    pub order: Vec<(String, bool)>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum SelectItem {
    Column(String),
    CountStar,
    Literal(Value),
}

#[derive(Debug, Clone)]
pub enum Source {
    Table(String),
    /// Derived table; the alias is irrelevant once parsed.
    SubSelect(Box<SelectStmt>),
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: StorageClass,
    pub not_null: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub default: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum SqlExpr {
    Column(String),
    /// `?` placeholder, resolved against the bound parameter list.
    Param(usize),
    Literal(Value),
    Bool(bool),
    Binary {
        op: BinaryOp,
        lhs: Box<SqlExpr>,
        rhs: Box<SqlExpr>,
    },
    Not(Box<SqlExpr>),
    IsNull {
        operand: Box<SqlExpr>,
        negated: bool,
    },
    InList {
        operand: Box<SqlExpr>,
        list: Vec<SqlExpr>,
        negated: bool,
    },
    InSelect {
        operand: Box<SqlExpr>,
        select: Box<SelectStmt>,
        negated: bool,
    },
}
