use super::{
    ColumnSpec, Keyword, Lexer, SelectItem, SelectStmt, Source, SqlExpr, Stmt, StorageClass, Token,
};
use anyhow::{Result, bail};
use quarry_core::{BinaryOp, Value};

/// Parse one statement of the SQL subset the file dialect writer emits.
pub fn parse(sql: &str) -> Result<Stmt> {
    let tokens = Lexer::new(sql).tokenize()?;
    let mut parser = Parser {
        tokens,
        position: 0,
        params: 0,
    };
    let stmt = parser.parse_statement()?;
    parser.expect(Token::Eof)?;
    Ok(stmt)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Running placeholder counter; placeholders bind by occurrence order.
    params: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        self.position += 1;
        token
    }

    fn matches(&mut self, token: Token) -> bool {
        if *self.current() == token {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn matches_keyword(&mut self, keyword: Keyword) -> bool {
        self.matches(Token::Keyword(keyword))
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if !self.matches(token.clone()) {
            bail!("expected {:?}, found {:?}", token, self.current());
        }
        Ok(())
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        self.expect(Token::Keyword(keyword))
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.advance() {
            Token::Ident(name) => Ok(name),
            other => bail!("expected an identifier, found {:?}", other),
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt> {
        match self.current() {
            Token::Keyword(Keyword::Select) => Ok(Stmt::Select(self.parse_select()?)),
            Token::Keyword(Keyword::Insert) => self.parse_insert(),
            Token::Keyword(Keyword::Update) => self.parse_update(),
            Token::Keyword(Keyword::Delete) => self.parse_delete(),
            Token::Keyword(Keyword::Create) => self.parse_create_table(),
            Token::Keyword(Keyword::Drop) => self.parse_drop_table(),
            other => bail!("expected a statement, found {:?}", other),
        }
    }

    fn parse_select(&mut self) -> Result<SelectStmt> {
        self.expect_keyword(Keyword::Select)?;
        let distinct = self.matches_keyword(Keyword::Distinct);
        let mut items = Vec::new();
        loop {
            items.push(self.parse_select_item()?);
            if !self.matches(Token::Comma) {
                break;
            }
        }
        self.expect_keyword(Keyword::From)?;
        let source = if self.matches(Token::LParen) {
            let inner = self.parse_select()?;
            self.expect(Token::RParen)?;
            if self.matches_keyword(Keyword::As) {
                self.expect_identifier()?;
            }
            Source::SubSelect(Box::new(inner))
        } else {
            Source::Table(self.expect_identifier()?)
        };
        let predicate = if self.matches_keyword(Keyword::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let mut order = Vec::new();
        if self.matches_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            loop {
                let column = self.expect_identifier()?;
                let ascending = if self.matches_keyword(Keyword::Desc) {
                    false
                } else {
                    self.matches_keyword(Keyword::Asc);
                    true
                };
                order.push((column, ascending));
                if !self.matches(Token::Comma) {
                    break;
                }
            }
        }
        let limit = if self.matches_keyword(Keyword::Limit) {
            match self.advance() {
                Token::Int(v) if v >= 0 => Some(v as u64),
                other => bail!("expected a LIMIT count, found {:?}", other),
            }
        } else {
            None
        };
        Ok(SelectStmt {
            distinct,
            items,
            source,
            predicate,
            order,
            limit,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.matches_keyword(Keyword::Count) {
            self.expect(Token::LParen)?;
            self.expect(Token::Star)?;
            self.expect(Token::RParen)?;
            return Ok(SelectItem::CountStar);
        }
        match self.advance() {
            Token::Ident(name) => Ok(SelectItem::Column(name)),
            Token::Int(v) => Ok(SelectItem::Literal(Value::Int64(Some(v)))),
            other => bail!("expected a projection item, found {:?}", other),
        }
    }

    fn parse_insert(&mut self) -> Result<Stmt> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_identifier()?;
        self.expect(Token::LParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.expect_identifier()?);
            if !self.matches(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;
        self.expect_keyword(Keyword::Values)?;
        self.expect(Token::LParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.parse_atom()?);
            if !self.matches(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;
        if columns.len() != values.len() {
            bail!(
                "INSERT lists {} columns but {} values",
                columns.len(),
                values.len()
            );
        }
        Ok(Stmt::Insert {
            table,
            columns,
            values,
        })
    }

    fn parse_update(&mut self) -> Result<Stmt> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.expect_identifier()?;
        self.expect_keyword(Keyword::Set)?;
        let mut sets = Vec::new();
        loop {
            let column = self.expect_identifier()?;
            self.expect(Token::Eq)?;
            sets.push((column, self.parse_atom()?));
            if !self.matches(Token::Comma) {
                break;
            }
        }
        let predicate = if self.matches_keyword(Keyword::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::Update {
            table,
            sets,
            predicate,
        })
    }

    fn parse_delete(&mut self) -> Result<Stmt> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier()?;
        let predicate = if self.matches_keyword(Keyword::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::Delete { table, predicate })
    }

    fn parse_create_table(&mut self) -> Result<Stmt> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = if self.matches_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };
        let name = self.expect_identifier()?;
        self.expect(Token::LParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_spec()?);
            if !self.matches(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(Stmt::CreateTable {
            name,
            if_not_exists,
            columns,
        })
    }

    fn parse_column_spec(&mut self) -> Result<ColumnSpec> {
        let name = self.expect_identifier()?;
        let ty = match self.advance() {
            Token::Keyword(Keyword::Integer) => StorageClass::Integer,
            Token::Keyword(Keyword::Real) => StorageClass::Real,
            Token::Keyword(Keyword::Text) => StorageClass::Text,
            Token::Keyword(Keyword::Blob) => StorageClass::Blob,
            other => bail!("expected a column type, found {:?}", other),
        };
        let mut spec = ColumnSpec {
            name,
            ty,
            not_null: false,
            primary_key: false,
            auto_increment: false,
            default: None,
        };
        loop {
            if self.matches_keyword(Keyword::Not) {
                self.expect_keyword(Keyword::Null)?;
                spec.not_null = true;
            } else if self.matches_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                spec.primary_key = true;
            } else if self.matches_keyword(Keyword::Autoincrement) {
                spec.auto_increment = true;
            } else if self.matches_keyword(Keyword::Default) {
                spec.default = Some(self.parse_literal()?);
            } else if self.matches_keyword(Keyword::References) {
                // Accepted and not enforced: referential actions are the
                // backing database's concern, not this engine's.
                self.expect_identifier()?;
                self.expect(Token::LParen)?;
                self.expect_identifier()?;
                self.expect(Token::RParen)?;
            } else {
                break;
            }
        }
        Ok(spec)
    }

    fn parse_drop_table(&mut self) -> Result<Stmt> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let if_exists = if self.matches_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };
        Ok(Stmt::DropTable {
            name: self.expect_identifier()?,
            if_exists,
        })
    }

    // Expressions, loosest binding first: OR, AND, NOT, predicates.

    fn parse_expression(&mut self) -> Result<SqlExpr> {
        let mut lhs = self.parse_and()?;
        while self.matches_keyword(Keyword::Or) {
            let rhs = self.parse_and()?;
            lhs = SqlExpr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<SqlExpr> {
        let mut lhs = self.parse_not()?;
        while self.matches_keyword(Keyword::And) {
            let rhs = self.parse_not()?;
            lhs = SqlExpr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<SqlExpr> {
        if self.matches_keyword(Keyword::Not) {
            return Ok(SqlExpr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Result<SqlExpr> {
        let operand = self.parse_atom()?;
        let op = match self.current() {
            Token::Eq => Some(BinaryOp::Eq),
            Token::NotEq => Some(BinaryOp::NotEq),
            Token::Less => Some(BinaryOp::Less),
            Token::LessEq => Some(BinaryOp::LessEq),
            Token::Greater => Some(BinaryOp::Greater),
            Token::GreaterEq => Some(BinaryOp::GreaterEq),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let rhs = self.parse_atom()?;
            return Ok(SqlExpr::Binary {
                op,
                lhs: Box::new(operand),
                rhs: Box::new(rhs),
            });
        }
        if self.matches_keyword(Keyword::Is) {
            let negated = self.matches_keyword(Keyword::Not);
            self.expect_keyword(Keyword::Null)?;
            return Ok(SqlExpr::IsNull {
                operand: Box::new(operand),
                negated,
            });
        }
        let negated = if self.matches_keyword(Keyword::Not) {
            self.expect_keyword(Keyword::In)?;
            true
        } else if self.matches_keyword(Keyword::In) {
            false
        } else {
            return Ok(operand);
        };
        self.expect(Token::LParen)?;
        if *self.current() == Token::Keyword(Keyword::Select) {
            let select = self.parse_select()?;
            self.expect(Token::RParen)?;
            return Ok(SqlExpr::InSelect {
                operand: Box::new(operand),
                select: Box::new(select),
                negated,
            });
        }
        let mut list = Vec::new();
        loop {
            list.push(self.parse_atom()?);
            if !self.matches(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(SqlExpr::InList {
            operand: Box::new(operand),
            list,
            negated,
        })
    }

    fn parse_atom(&mut self) -> Result<SqlExpr> {
        if self.matches(Token::LParen) {
            let inner = self.parse_expression()?;
            self.expect(Token::RParen)?;
            return Ok(inner);
        }
        match self.advance() {
            Token::Ident(name) => Ok(SqlExpr::Column(name)),
            Token::Param => {
                let index = self.params;
                self.params += 1;
                Ok(SqlExpr::Param(index))
            }
            Token::Int(v) => Ok(SqlExpr::Literal(Value::Int64(Some(v)))),
            Token::Float(v) => Ok(SqlExpr::Literal(Value::Float64(Some(v)))),
            Token::Str(v) => Ok(SqlExpr::Literal(Value::Varchar(Some(v)))),
            Token::Blob(v) => Ok(SqlExpr::Literal(Value::Blob(Some(v.into_boxed_slice())))),
            Token::Keyword(Keyword::True) => Ok(SqlExpr::Bool(true)),
            Token::Keyword(Keyword::False) => Ok(SqlExpr::Bool(false)),
            Token::Keyword(Keyword::Null) => Ok(SqlExpr::Literal(Value::Null)),
            other => bail!("expected an operand, found {:?}", other),
        }
    }

    fn parse_literal(&mut self) -> Result<Value> {
        match self.parse_atom()? {
            SqlExpr::Literal(v) => Ok(v),
            SqlExpr::Bool(v) => Ok(Value::Boolean(Some(v))),
            other => bail!("expected a literal, found {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_filtered_select() {
        let stmt = parse(
            "SELECT \"id\", \"name\"\nFROM \"users\"\nWHERE \"id\" = ? AND \"city_id\" IS NOT NULL\nORDER BY \"name\" DESC\nLIMIT 3",
        )
        .expect("Failed to parse");
        let Stmt::Select(select) = stmt else {
            panic!("expected a select");
        };
        assert_eq!(select.items.len(), 2);
        assert!(matches!(select.source, Source::Table(ref t) if t == "users"));
        assert!(select.predicate.is_some());
        assert_eq!(select.order, [("name".to_string(), false)]);
        assert_eq!(select.limit, Some(3));
    }

    #[test]
    fn parses_nested_membership() {
        let stmt = parse(
            "SELECT \"id\"\nFROM \"cities\"\nWHERE \"id\" NOT IN (SELECT \"id\"\nFROM \"cities\"\nWHERE \"id\" = ?)",
        )
        .expect("Failed to parse");
        let Stmt::Select(select) = stmt else {
            panic!("expected a select");
        };
        let Some(SqlExpr::InSelect { negated: true, .. }) = select.predicate else {
            panic!("expected a negated sub-query membership");
        };
    }

    #[test]
    fn placeholders_number_by_occurrence() {
        let stmt = parse("UPDATE \"t\" SET \"a\" = ?, \"b\" = ? WHERE \"c\" = ?")
            .expect("Failed to parse");
        let Stmt::Update { sets, predicate, .. } = stmt else {
            panic!("expected an update");
        };
        assert!(matches!(sets[0].1, SqlExpr::Param(0)));
        assert!(matches!(sets[1].1, SqlExpr::Param(1)));
        let Some(SqlExpr::Binary { rhs, .. }) = predicate else {
            panic!("expected a comparison");
        };
        assert!(matches!(*rhs, SqlExpr::Param(2)));
    }

    #[test]
    fn parses_a_create_table() {
        let stmt = parse(
            "CREATE TABLE \"cities\" (\n\"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,\n\"name\" TEXT NOT NULL DEFAULT 'n/a'\n)",
        )
        .expect("Failed to parse");
        let Stmt::CreateTable { columns, .. } = stmt else {
            panic!("expected a create table");
        };
        assert!(columns[0].auto_increment && columns[0].primary_key);
        assert_eq!(
            columns[1].default,
            Some(Value::Varchar(Some("n/a".to_string())))
        );
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("DROP TABLE \"t\" garbage...").is_err());
    }
}
