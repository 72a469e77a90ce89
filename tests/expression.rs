use quarry::{
    BinaryOp, Column, Error, Expr, GenericSqlWriter, ProjectionError, RowTuple, Table,
    compound_and, compound_or,
};

const WRITER: GenericSqlWriter = GenericSqlWriter::new();

struct Trades {
    table: Table,
    symbol: Column<String>,
    price: Column<f64>,
    volume: Column<i64>,
}

fn trades() -> Trades {
    let mut builder = Table::builder("trades");
    let symbol = builder.column::<String>("symbol").take();
    let price = builder.column::<f64>("price").take();
    let volume = builder.column::<i64>("volume").take();
    Trades {
        table: builder.build().expect("Failed to declare trades"),
        symbol,
        price,
        volume,
    }
}

#[test]
fn comparisons_build_binary_nodes() {
    let trades = trades();
    for (expr, op) in [
        (trades.price.eq(1.5), BinaryOp::Eq),
        (trades.price.ne(1.5), BinaryOp::NotEq),
        (trades.price.lt(1.5), BinaryOp::Less),
        (trades.price.le(1.5), BinaryOp::LessEq),
        (trades.price.gt(1.5), BinaryOp::Greater),
        (trades.price.ge(1.5), BinaryOp::GreaterEq),
    ] {
        let Expr::Binary { op: found, .. } = expr else {
            panic!("expected a binary node");
        };
        assert_eq!(found, op);
    }

    // Column against column of the same type.
    let statement = trades
        .price
        .gt(&trades.price)
        .to_statement(&WRITER)
        .expect("Failed to render");
    assert_eq!(statement.sql, r#""price" > "price""#);
    assert!(statement.params.is_empty());
}

#[test]
fn trees_are_reusable() {
    let trades = trades();
    let cheap = trades.price.lt(10.0);
    let liquid = trades.volume.ge(1000);

    // The same nodes participate in several trees and render the same SQL
    // every time.
    let both = cheap.clone().and(liquid.clone());
    let either = cheap.clone().or(liquid.clone());
    let first = both.to_statement(&WRITER).expect("Failed to render");
    let second = both.to_statement(&WRITER).expect("Failed to render");
    assert_eq!(first, second);
    assert_eq!(
        either.to_statement(&WRITER).expect("Failed to render").sql,
        r#""price" < ? OR "volume" >= ?"#
    );
    assert_eq!(
        cheap.to_statement(&WRITER).expect("Failed to render").sql,
        r#""price" < ?"#
    );
}

#[test]
fn folds_reduce_left_to_right() {
    let trades = trades();
    let folded = compound_or([
        trades.symbol.eq("AAPL"),
        trades.symbol.eq("MSFT"),
        trades.symbol.eq("NVDA"),
    ])
    .expect("Failed to fold");
    let statement = folded.to_statement(&WRITER).expect("Failed to render");
    assert_eq!(
        statement.sql,
        r#""symbol" = ? OR "symbol" = ? OR "symbol" = ?"#
    );

    let folded = compound_and([trades.price.gt(1.0), trades.volume.gt(10)])
        .expect("Failed to fold");
    let statement = folded.to_statement(&WRITER).expect("Failed to render");
    assert_eq!(statement.sql, r#""price" > ? AND "volume" > ?"#);

    // A single expression folds to itself.
    let folded = compound_and([trades.price.gt(1.0)]).expect("Failed to fold");
    assert_eq!(
        folded.to_statement(&WRITER).expect("Failed to render").sql,
        r#""price" > ?"#
    );
}

#[test]
fn empty_folds_are_construction_errors() {
    assert!(matches!(
        compound_and(Vec::new()),
        Err(Error::EmptyFold(..))
    ));
    assert!(matches!(compound_or(Vec::new()), Err(Error::EmptyFold(..))));
}

#[test]
fn foreign_projection_fails_at_build_time() {
    let trades = trades();
    let mut builder = Table::builder("venues");
    let venue_name = builder.column::<String>("name").take();
    let _venues = builder.build().expect("Failed to declare venues");

    let error = trades
        .table
        .select_all()
        .slice(&[&venue_name])
        .expect_err("a foreign column must be rejected");
    assert!(matches!(
        error,
        Error::Projection(ProjectionError::ForeignColumn { .. })
    ));
}

#[test]
fn sub_query_arity_is_checked_at_construction() {
    let trades = trades();
    let wide = trades.table.select_all();
    let error = trades
        .symbol
        .in_query(wide.clone())
        .expect_err("a three column sub-query must be rejected");
    assert!(matches!(
        error,
        Error::Projection(ProjectionError::SubQueryArity {
            expected: 1,
            found: 3,
        })
    ));

    let error = (&trades.symbol, &trades.volume)
        .in_query(wide)
        .expect_err("arity two against three columns must be rejected");
    assert!(matches!(
        error,
        Error::Projection(ProjectionError::SubQueryArity {
            expected: 2,
            found: 3,
        })
    ));

    let narrow = trades
        .table
        .select_all()
        .slice(&[&trades.symbol])
        .expect("Failed to narrow");
    trades
        .symbol
        .in_query(narrow)
        .expect("a single column sub-query must be accepted");
}

#[test]
fn repeated_slice_replaces_the_projection() {
    let trades = trades();
    let select = trades
        .table
        .select_all()
        .slice(&[&trades.symbol, &trades.price])
        .expect("Failed to narrow")
        .slice(&[&trades.volume])
        .expect("Failed to narrow again");
    assert_eq!(select.arity(), 1);
    let statement = select.to_statement(&WRITER).expect("Failed to render");
    assert!(statement.sql.starts_with(r#"SELECT "volume""#));
}

#[test]
fn distinct_is_idempotent() {
    let trades = trades();
    let select = trades.table.select_all().with_distinct().with_distinct();
    let statement = select.to_statement(&WRITER).expect("Failed to render");
    assert!(statement.sql.starts_with("SELECT DISTINCT "));
    assert_eq!(statement.sql.matches("DISTINCT").count(), 1);
}
