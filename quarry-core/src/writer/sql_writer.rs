use crate::{
    BinaryOp, ColumnDef, ColumnRef, Context, Delete, Expr, Insert, Result, Select, Table, UnaryOp,
    UnsupportedConstructError, Update, Value, WireCodec, codec, possibly_parenthesized,
    separated_by, try_separated_by,
};
use std::fmt::Write;

/// How a dialect hands back an auto generated identity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRetrieval {
    /// The insert statement itself returns the value (`RETURNING`).
    Returning,
    /// The driver reports the last inserted identifier out of band.
    LastInsertId,
}

/// The form of the `is_empty` probe a dialect answers fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptinessProbe {
    /// `SELECT EXISTS (SELECT 1 ...)`: one row holding a boolean.
    Exists,
    /// `SELECT 1 ... LIMIT 1`: zero or one row.
    LimitOne,
}

/// Dialect renderer: a pure structural recursion over the expression tree
/// and the query descriptors, producing SQL text plus the ordered parameter
/// list collected in the [`Context`].
///
/// Every dialect difference lives here, in the capability methods and the
/// overridable fragments; the expression algebra and the query builders stay
/// dialect agnostic. Every literal value becomes a placeholder, only
/// structural keywords, identifiers and the constant predicate of an empty
/// membership test reach the text.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn dialect(&self) -> &'static str;

    // Capability table.

    /// How the dialect stores types it has no native column for.
    fn wire_codec(&self) -> WireCodec {
        WireCodec::native()
    }

    /// Whether `(a, b) IN ((...), (...))` is native syntax. Without it, list
    /// membership falls back to an OR of AND rewrite; sub-query membership
    /// over a tuple has no rewrite and is unsupported.
    fn supports_row_value_in(&self) -> bool {
        false
    }

    fn identity_retrieval(&self) -> IdentityRetrieval {
        IdentityRetrieval::LastInsertId
    }

    fn emptiness_probe(&self) -> EmptinessProbe {
        EmptinessProbe::Exists
    }

    /// Lower numbers bind weaker; children with lower precedence than their
    /// parent operator are parenthesized.
    fn binary_op_precedence(&self, op: &BinaryOp) -> i32 {
        match op {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            _ => self.comparison_precedence(),
        }
    }

    fn unary_op_precedence(&self, _op: &UnaryOp) -> i32 {
        3
    }

    fn comparison_precedence(&self) -> i32 {
        4
    }

    // Identifiers, literals, parameters.

    /// Quote an identifier, doubling inner quotes.
    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push('"');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '"' {
                out.push_str(&value[position..i]);
                out.push_str("\"\"");
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
        out.push('"');
    }

    fn write_bool_literal(&self, out: &mut String, value: bool) {
        out.push_str(["FALSE", "TRUE"][value as usize]);
    }

    /// Render the placeholder for the parameter most recently collected.
    fn write_placeholder(&self, _context: &mut Context, out: &mut String) {
        out.push('?');
    }

    /// Collect a literal as a parameter, lowered to its wire representation,
    /// and render its placeholder.
    fn write_param(&self, context: &mut Context, out: &mut String, value: &Value) -> Result<()> {
        let wire = codec::to_wire(&self.wire_codec(), value.clone())?;
        context.params.push(wire);
        self.write_placeholder(context, out);
        Ok(())
    }

    /// Render a value inline. Only reached from DDL defaults; query literals
    /// always go through [`SqlWriter::write_param`].
    fn write_literal(&self, out: &mut String, value: &Value) -> Result<()> {
        let wire = codec::to_wire(&self.wire_codec(), value.clone())?;
        match &wire {
            v if v.is_null() => out.push_str("NULL"),
            Value::Boolean(Some(v)) => self.write_bool_literal(out, *v),
            Value::Int16(Some(v)) => out.push_str(itoa::Buffer::new().format(*v)),
            Value::Int32(Some(v)) => out.push_str(itoa::Buffer::new().format(*v)),
            Value::Int64(Some(v)) => out.push_str(itoa::Buffer::new().format(*v)),
            Value::Float64(Some(v)) => out.push_str(ryu::Buffer::new().format(*v)),
            Value::Decimal(Some(v)) => {
                let _ = write!(out, "{}", v);
            }
            Value::Varchar(Some(v)) => self.write_string_literal(out, v),
            Value::Uuid(Some(v)) => {
                let _ = write!(out, "'{}'", v);
            }
            Value::Blob(Some(v)) => {
                out.push_str("X'");
                for b in v.iter() {
                    let _ = write!(out, "{:02X}", b);
                }
                out.push('\'');
            }
            other => {
                return Err(self.unsupported(&format!("a {} literal", other.type_name())));
            }
        }
        Ok(())
    }

    /// Render and escape a string literal using single quotes.
    fn write_string_literal(&self, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[position..i]);
                out.push_str("''");
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    // Expressions.

    fn write_expression(&self, context: &mut Context, out: &mut String, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Value(value) => self.write_param(context, out, value),
            Expr::Column(column) => {
                self.write_column_ref(out, column);
                Ok(())
            }
            Expr::Tuple(items) => self.write_tuple(context, out, items),
            Expr::Unary { op, operand } => self.write_unary(context, out, op, operand),
            Expr::Binary { op, lhs, rhs } => self.write_binary(context, out, op, lhs, rhs),
            Expr::InList {
                operand,
                list,
                negated,
            } => self.write_in_list(context, out, operand, list, *negated),
            Expr::InSubQuery {
                operand,
                query,
                negated,
            } => self.write_in_subquery(context, out, operand, query, *negated),
            Expr::IsNull { operand, negated } => self.write_is_null(context, out, operand, *negated),
        }
    }

    fn write_column_ref(&self, out: &mut String, column: &ColumnRef) {
        self.write_identifier(out, &column.name);
    }

    fn write_tuple(&self, context: &mut Context, out: &mut String, items: &[Expr]) -> Result<()> {
        out.push('(');
        try_separated_by(
            out,
            items,
            |out, item| self.write_expression(context, out, item),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    fn write_unary(
        &self,
        context: &mut Context,
        out: &mut String,
        op: &UnaryOp,
        operand: &Expr,
    ) -> Result<()> {
        let precedence = self.unary_op_precedence(op);
        let _ = write!(out, "{} ", op);
        possibly_parenthesized!(
            out,
            operand.precedence(self.as_dyn()) < precedence,
            self.write_expression(context, out, operand)?
        );
        Ok(())
    }

    fn write_binary(
        &self,
        context: &mut Context,
        out: &mut String,
        op: &BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<()> {
        let precedence = self.binary_op_precedence(op);
        possibly_parenthesized!(
            out,
            lhs.precedence(self.as_dyn()) < precedence,
            self.write_expression(context, out, lhs)?
        );
        let _ = write!(out, " {} ", op);
        possibly_parenthesized!(
            out,
            rhs.precedence(self.as_dyn()) < precedence,
            self.write_expression(context, out, rhs)?
        );
        Ok(())
    }

    fn write_is_null(
        &self,
        context: &mut Context,
        out: &mut String,
        operand: &Expr,
        negated: bool,
    ) -> Result<()> {
        possibly_parenthesized!(
            out,
            operand.precedence(self.as_dyn()) < self.comparison_precedence(),
            self.write_expression(context, out, operand)?
        );
        out.push_str(if negated { " IS NOT NULL" } else { " IS NULL" });
        Ok(())
    }

    /// Membership in a literal sequence.
    ///
    /// An empty sequence is a constant predicate: `FALSE` for `IN`, `TRUE`
    /// for `NOT IN`, with no parameter and no sub-select. A tuple operand on
    /// a dialect without native row values takes the OR of AND rewrite.
    fn write_in_list(
        &self,
        context: &mut Context,
        out: &mut String,
        operand: &Expr,
        list: &[Expr],
        negated: bool,
    ) -> Result<()> {
        if list.is_empty() {
            self.write_bool_literal(out, negated);
            return Ok(());
        }
        if let Expr::Tuple(columns) = operand {
            if !self.supports_row_value_in() {
                return self.write_row_membership_rewrite(context, out, columns, list, negated);
            }
        }
        self.write_expression(context, out, operand)?;
        out.push_str(if negated { " NOT IN (" } else { " IN (" });
        try_separated_by(
            out,
            list,
            |out, item| self.write_expression(context, out, item),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    /// `(a, b) IN ((1, 2), (3, 4))` as
    /// `("a" = 1 AND "b" = 2) OR ("a" = 3 AND "b" = 4)`, negated by wrapping
    /// in `NOT (...)`.
    fn write_row_membership_rewrite(
        &self,
        context: &mut Context,
        out: &mut String,
        columns: &[Expr],
        list: &[Expr],
        negated: bool,
    ) -> Result<()> {
        if negated {
            out.push_str("NOT (");
        }
        try_separated_by(
            out,
            list,
            |out, row| {
                let Expr::Tuple(values) = row else {
                    return Err(self.unsupported("a non tuple row in a row value membership"));
                };
                out.push('(');
                try_separated_by(
                    out,
                    columns.iter().zip(values),
                    |out, (column, value)| {
                        self.write_expression(context, out, column)?;
                        out.push_str(" = ");
                        self.write_expression(context, out, value)
                    },
                    " AND ",
                )?;
                out.push(')');
                Ok(())
            },
            " OR ",
        )?;
        if negated {
            out.push(')');
        }
        Ok(())
    }

    fn write_in_subquery(
        &self,
        context: &mut Context,
        out: &mut String,
        operand: &Expr,
        query: &Select,
        negated: bool,
    ) -> Result<()> {
        if matches!(operand, Expr::Tuple(..)) && !self.supports_row_value_in() {
            return Err(self.unsupported("row value membership in a sub-query"));
        }
        self.write_expression(context, out, operand)?;
        out.push_str(if negated { " NOT IN (" } else { " IN (" });
        self.write_select(context, out, query)?;
        out.push(')');
        Ok(())
    }

    // Statements.

    fn write_select(&self, context: &mut Context, out: &mut String, select: &Select) -> Result<()> {
        out.push_str("SELECT ");
        if select.distinct {
            out.push_str("DISTINCT ");
        }
        separated_by(
            out,
            &select.projection,
            |out, column| self.write_identifier(out, column.name()),
            ", ",
        );
        out.push_str("\nFROM ");
        self.write_identifier(out, select.table.name());
        if let Some(predicate) = &select.predicate {
            out.push_str("\nWHERE ");
            self.write_expression(context, out, predicate)?;
        }
        if !select.order.is_empty() {
            out.push_str("\nORDER BY ");
            separated_by(
                out,
                &select.order,
                |out, (column, order)| {
                    self.write_identifier(out, column.name());
                    out.push(' ');
                    out.push_str(order.keyword());
                },
                ", ",
            );
        }
        if let Some(limit) = select.limit {
            out.push_str("\nLIMIT ");
            out.push_str(itoa::Buffer::new().format(limit));
        }
        Ok(())
    }

    /// `count` lowered to the dialect's native form: a plain `COUNT(*)`, or
    /// `COUNT(*)` over a derived table when the query is distinct.
    fn write_count(&self, context: &mut Context, out: &mut String, select: &Select) -> Result<()> {
        if select.distinct {
            out.push_str("SELECT COUNT(*)\nFROM (");
            self.write_select(context, out, select)?;
            out.push_str(") AS ");
            self.write_identifier(out, "counted");
            return Ok(());
        }
        out.push_str("SELECT COUNT(*)\nFROM ");
        self.write_identifier(out, select.table.name());
        if let Some(predicate) = &select.predicate {
            out.push_str("\nWHERE ");
            self.write_expression(context, out, predicate)?;
        }
        Ok(())
    }

    /// The emptiness probe matching [`SqlWriter::emptiness_probe`].
    fn write_exists_probe(
        &self,
        context: &mut Context,
        out: &mut String,
        select: &Select,
    ) -> Result<()> {
        match self.emptiness_probe() {
            EmptinessProbe::Exists => {
                out.push_str("SELECT EXISTS (SELECT 1\nFROM ");
                self.write_identifier(out, select.table.name());
                if let Some(predicate) = &select.predicate {
                    out.push_str("\nWHERE ");
                    self.write_expression(context, out, predicate)?;
                }
                out.push(')');
            }
            EmptinessProbe::LimitOne => {
                out.push_str("SELECT 1\nFROM ");
                self.write_identifier(out, select.table.name());
                if let Some(predicate) = &select.predicate {
                    out.push_str("\nWHERE ");
                    self.write_expression(context, out, predicate)?;
                }
                out.push_str("\nLIMIT 1");
            }
        }
        Ok(())
    }

    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        insert: &Insert,
        returning_identity: bool,
    ) -> Result<()> {
        out.push_str("INSERT INTO ");
        self.write_identifier(out, insert.table.name());
        out.push_str(" (");
        separated_by(
            out,
            &insert.sets,
            |out, (column, _)| self.write_identifier(out, column.name()),
            ", ",
        );
        out.push_str(")\nVALUES (");
        try_separated_by(
            out,
            &insert.sets,
            |out, (_, value)| self.write_param(context, out, value),
            ", ",
        )?;
        out.push(')');
        if returning_identity && self.identity_retrieval() == IdentityRetrieval::Returning {
            let Some(identity) = insert.table.identity() else {
                return Err(self.unsupported("returning an identity the table does not declare"));
            };
            out.push_str("\nRETURNING ");
            self.write_identifier(out, identity.name());
        }
        Ok(())
    }

    fn write_update(&self, context: &mut Context, out: &mut String, update: &Update) -> Result<()> {
        out.push_str("UPDATE ");
        self.write_identifier(out, update.table.name());
        out.push_str("\nSET ");
        try_separated_by(
            out,
            &update.sets,
            |out, (column, value)| {
                self.write_identifier(out, column.name());
                out.push_str(" = ");
                self.write_param(context, out, value)
            },
            ", ",
        )?;
        if let Some(predicate) = &update.predicate {
            out.push_str("\nWHERE ");
            self.write_expression(context, out, predicate)?;
        }
        Ok(())
    }

    fn write_delete(&self, context: &mut Context, out: &mut String, delete: &Delete) -> Result<()> {
        out.push_str("DELETE FROM ");
        self.write_identifier(out, delete.table.name());
        if let Some(predicate) = &delete.predicate {
            out.push_str("\nWHERE ");
            self.write_expression(context, out, predicate)?;
        }
        Ok(())
    }

    // DDL.

    fn write_create_table(
        &self,
        out: &mut String,
        table: &Table,
        if_not_exists: bool,
    ) -> Result<()> {
        out.push_str("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier(out, table.name());
        out.push_str(" (\n");
        try_separated_by(
            out,
            table.columns(),
            |out, column| self.write_column_def(out, column),
            ",\n",
        )?;
        out.push_str("\n)");
        Ok(())
    }

    fn write_column_def(&self, out: &mut String, def: &ColumnDef) -> Result<()> {
        self.write_identifier(out, def.name());
        out.push(' ');
        self.write_column_type(out, &def.value)?;
        if !def.nullable {
            out.push_str(" NOT NULL");
        }
        if def.primary_key {
            out.push_str(" PRIMARY KEY");
        }
        if def.auto_increment {
            out.push(' ');
            out.push_str(self.identity_clause());
        }
        if let Some(default) = &def.default {
            out.push_str(" DEFAULT ");
            self.write_literal(out, default)?;
        }
        if let Some(target) = &def.references {
            out.push_str(" REFERENCES ");
            self.write_identifier(out, &target.table);
            out.push('(');
            self.write_identifier(out, &target.name);
            out.push(')');
        }
        Ok(())
    }

    /// The SQL spelling of an identity column declaration.
    fn identity_clause(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    /// Render the SQL type for a `Value` prototype.
    fn write_column_type(&self, out: &mut String, value: &Value) -> Result<()> {
        out.push_str(match value {
            Value::Boolean(..) => "BOOLEAN",
            Value::Int16(..) => "SMALLINT",
            Value::Int32(..) => "INTEGER",
            Value::Int64(..) => "BIGINT",
            Value::Float64(..) => "DOUBLE PRECISION",
            Value::Decimal(..) => "DECIMAL",
            Value::Varchar(..) => "VARCHAR",
            Value::Blob(..) => "BLOB",
            Value::Date(..) => "DATE",
            Value::Time(..) => "TIME",
            Value::Timestamp(..) => "TIMESTAMP",
            Value::Uuid(..) => "UUID",
            Value::Null => {
                return Err(self.unsupported("a column without a declared type"));
            }
        });
        Ok(())
    }

    fn write_drop_table(&self, out: &mut String, table: &Table, if_exists: bool) {
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier(out, table.name());
    }

    // Transaction control.

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN TRANSACTION");
    }

    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT");
    }

    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK");
    }

    /// Build the [`UnsupportedConstructError`] for a construct this dialect
    /// has no spelling for.
    fn unsupported(&self, construct: &str) -> crate::Error {
        UnsupportedConstructError {
            dialect: self.dialect(),
            construct: construct.to_string(),
        }
        .into()
    }
}
