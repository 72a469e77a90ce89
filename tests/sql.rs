use indoc::indoc;
use quarry::{
    Column, Error, GenericSqlWriter, Order, PostgresSqlWriter, RowTuple, SqliteSqlWriter, Table,
    Value,
};

const GENERIC: GenericSqlWriter = GenericSqlWriter::new();
const SQLITE: SqliteSqlWriter = SqliteSqlWriter::new();
const POSTGRES: PostgresSqlWriter = PostgresSqlWriter::new();

struct Users {
    table: Table,
    id: Column<String>,
    name: Column<String>,
    city_id: Column<Option<i32>>,
}

fn users() -> Users {
    let mut builder = Table::builder("users");
    let id = builder.column::<String>("id").primary_key().take();
    let name = builder.column::<String>("name").take();
    let city_id = builder.column::<Option<i32>>("city_id").take();
    Users {
        table: builder.build().expect("Failed to declare users"),
        id,
        name,
        city_id,
    }
}

#[test]
fn select_with_predicate() {
    let users = users();
    let statement = users
        .table
        .select(users.id.eq("andrey").and(users.city_id.eq(2)))
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            SELECT "id", "name", "city_id"
            FROM "users"
            WHERE "id" = ? AND "city_id" = ?
        "#}
        .trim()
    );
    assert_eq!(
        statement.params,
        [
            Value::Varchar(Some("andrey".to_string())),
            Value::Int64(Some(2)),
        ]
    );

    // The client/server family numbers its placeholders and keeps native
    // integer widths.
    let statement = users
        .table
        .select(users.id.eq("andrey").and(users.city_id.eq(2)))
        .to_statement(&POSTGRES)
        .expect("Failed to render");
    assert!(statement.sql.ends_with(r#"WHERE "id" = $1 AND "city_id" = $2"#));
    assert_eq!(
        statement.params,
        [
            Value::Varchar(Some("andrey".to_string())),
            Value::Int32(Some(2)),
        ]
    );
}

#[test]
fn logical_precedence_is_parenthesized() {
    let users = users();
    let predicate = users
        .id
        .eq("a")
        .or(users.id.eq("b"))
        .and(users.city_id.is_not_null());
    let statement = users
        .table
        .select(predicate)
        .to_statement(&GENERIC)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            SELECT "id", "name", "city_id"
            FROM "users"
            WHERE ("id" = ? OR "id" = ?) AND "city_id" IS NOT NULL
        "#}
        .trim()
    );

    let statement = quarry::not(users.id.eq("a").and(users.name.eq("b")))
        .to_statement(&GENERIC)
        .expect("Failed to render");
    assert_eq!(statement.sql, r#"NOT ("id" = ? AND "name" = ?)"#);

    let statement = quarry::not(users.id.eq("a"))
        .to_statement(&GENERIC)
        .expect("Failed to render");
    assert_eq!(statement.sql, r#"NOT "id" = ?"#);
}

#[test]
fn null_comparisons_become_null_checks() {
    let users = users();
    let statement = users
        .city_id
        .eq(None)
        .to_statement(&GENERIC)
        .expect("Failed to render");
    assert_eq!(statement.sql, r#""city_id" IS NULL"#);
    assert!(statement.params.is_empty());

    let statement = users
        .city_id
        .ne(None)
        .to_statement(&GENERIC)
        .expect("Failed to render");
    assert_eq!(statement.sql, r#""city_id" IS NOT NULL"#);
}

#[test]
fn empty_membership_is_a_constant_predicate() {
    let users = users();
    let statement = users
        .id
        .in_list(Vec::<String>::new())
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(statement.sql, "FALSE");
    assert!(statement.params.is_empty());

    let statement = users
        .id
        .not_in_list(Vec::<String>::new())
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(statement.sql, "TRUE");
    assert!(statement.params.is_empty());
}

#[test]
fn scalar_membership() {
    let users = users();
    let statement = users
        .id
        .in_list(["a", "b", "c"])
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(statement.sql, r#""id" IN (?, ?, ?)"#);
    assert_eq!(statement.params.len(), 3);

    let statement = users
        .id
        .not_in_list(["a"])
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(statement.sql, r#""id" NOT IN (?)"#);
}

#[test]
fn row_value_membership_per_dialect() {
    let users = users();
    let pairs = || {
        [
            ("a".to_string(), "A".to_string()),
            ("b".to_string(), "B".to_string()),
        ]
    };

    // Native row values.
    let statement = (&users.id, &users.name)
        .in_list(pairs())
        .to_statement(&POSTGRES)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        r#"("id", "name") IN (($1, $2), ($3, $4))"#
    );

    // OR of AND rewrite where the dialect has none.
    let statement = (&users.id, &users.name)
        .in_list(pairs())
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        r#"("id" = ? AND "name" = ?) OR ("id" = ? AND "name" = ?)"#
    );
    assert_eq!(statement.params.len(), 4);

    let statement = (&users.id, &users.name)
        .not_in_list(pairs())
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        r#"NOT (("id" = ? AND "name" = ?) OR ("id" = ? AND "name" = ?))"#
    );
}

#[test]
fn sub_query_membership() {
    let users = users();
    let inner = users
        .table
        .select(users.name.eq("Andrey"))
        .slice(&[&users.id])
        .expect("Failed to narrow the sub-query");
    let statement = users
        .id
        .in_query(inner.clone())
        .expect("Failed to build the membership")
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            "id" IN (SELECT "id"
            FROM "users"
            WHERE "name" = ?)
        "#}
        .trim()
    );

    // A tuple against a sub-query needs native row values.
    let error = (&users.id, &users.name)
        .in_query(users.table.select_all().slice(&[&users.id, &users.name]).unwrap())
        .expect("Failed to build the membership")
        .to_statement(&SQLITE)
        .expect_err("sqlite must refuse a row value sub-query");
    assert!(matches!(error, Error::Unsupported(..)));
}

#[test]
fn parameters_keep_textual_order_across_nesting() {
    let users = users();
    let inner = users
        .table
        .select(users.name.eq("inner"))
        .slice(&[&users.id])
        .expect("Failed to narrow the sub-query");
    let predicate = users
        .city_id
        .eq(5)
        .and(users.id.in_query(inner).expect("Failed to build"))
        .and(users.name.eq("outer"));
    let statement = predicate
        .to_statement(&POSTGRES)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            "city_id" = $1 AND "id" IN (SELECT "id"
            FROM "users"
            WHERE "name" = $2) AND "name" = $3
        "#}
        .trim()
    );
    assert_eq!(
        statement.params,
        [
            Value::Int32(Some(5)),
            Value::Varchar(Some("inner".to_string())),
            Value::Varchar(Some("outer".to_string())),
        ]
    );
}

#[test]
fn distinct_ordering_and_limit() {
    let users = users();
    let statement = users
        .table
        .select_all()
        .slice(&[&users.name])
        .expect("Failed to narrow the projection")
        .with_distinct()
        .order_by(&users.name, Order::Asc)
        .order_by(&users.id, Order::Desc)
        .limit(10)
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            SELECT DISTINCT "name"
            FROM "users"
            ORDER BY "name" ASC, "id" DESC
            LIMIT 10
        "#}
        .trim()
    );
}

#[test]
fn modify_statements() {
    let users = users();
    let statement = users
        .table
        .insert()
        .set(&users.id, "nina".to_string())
        .expect("Failed to attach")
        .set(&users.name, "Nina".to_string())
        .expect("Failed to attach")
        .to_statement(&SQLITE, false)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            INSERT INTO "users" ("id", "name")
            VALUES (?, ?)
        "#}
        .trim()
    );

    let statement = users
        .table
        .update(users.id.eq("nina"))
        .set(&users.name, "Nina N".to_string())
        .expect("Failed to attach")
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            UPDATE "users"
            SET "name" = ?
            WHERE "id" = ?
        "#}
        .trim()
    );
    // Assignments render before the predicate, and so do their parameters.
    assert_eq!(
        statement.params,
        [
            Value::Varchar(Some("Nina N".to_string())),
            Value::Varchar(Some("nina".to_string())),
        ]
    );

    let statement = users
        .table
        .delete(users.id.eq("nina"))
        .to_statement(&SQLITE)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            DELETE FROM "users"
            WHERE "id" = ?
        "#}
        .trim()
    );
}

#[test]
fn identity_retrieval_per_dialect() {
    let mut builder = Table::builder("cities");
    let _id = builder.column::<i32>("id").auto_increment().take();
    let name = builder.column::<String>("name").take();
    let cities = builder.build().expect("Failed to declare cities");

    let insert = cities
        .insert()
        .set(&name, "Prague".to_string())
        .expect("Failed to attach");
    // The file family retrieves identities out of band, nothing extra is
    // rendered even when the identity is requested.
    let statement = insert
        .to_statement(&SQLITE, true)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            INSERT INTO "cities" ("name")
            VALUES (?)
        "#}
        .trim()
    );
    let statement = insert
        .to_statement(&POSTGRES, true)
        .expect("Failed to render");
    assert_eq!(
        statement.sql,
        indoc! {r#"
            INSERT INTO "cities" ("name")
            VALUES ($1)
            RETURNING "id"
        "#}
        .trim()
    );
}

#[test]
fn create_and_drop_table() {
    use quarry::SqlWriter;
    let mut builder = Table::builder("cities");
    let id = builder.column::<i32>("id").auto_increment().take();
    let _name = builder.column::<String>("name").take();
    let cities = builder.build().expect("Failed to declare cities");

    let mut builder = Table::builder("users");
    builder.column::<String>("id").primary_key().take();
    builder
        .column::<Option<i32>>("city_id")
        .references(&id)
        .take();
    builder.column::<i32>("score").default_value(100).take();
    let users = builder.build().expect("Failed to declare users");

    let mut sql = String::new();
    SQLITE
        .write_create_table(&mut sql, &cities, false)
        .expect("Failed to render");
    assert_eq!(
        sql,
        indoc! {r#"
            CREATE TABLE "cities" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "name" TEXT NOT NULL
            )
        "#}
        .trim()
    );

    let mut sql = String::new();
    POSTGRES
        .write_create_table(&mut sql, &users, true)
        .expect("Failed to render");
    assert_eq!(
        sql,
        indoc! {r#"
            CREATE TABLE IF NOT EXISTS "users" (
            "id" VARCHAR NOT NULL PRIMARY KEY,
            "city_id" INTEGER REFERENCES "cities"("id"),
            "score" INTEGER NOT NULL DEFAULT 100
            )
        "#}
        .trim()
    );

    let mut sql = String::new();
    SQLITE.write_drop_table(&mut sql, &users, true);
    assert_eq!(sql, r#"DROP TABLE IF EXISTS "users""#);
}

#[test]
fn aggregate_forms() {
    use quarry::{Context, SqlWriter};
    let users = users();

    let select = users.table.select(users.name.eq("Andrey"));
    let mut context = Context::new();
    let mut sql = String::new();
    SQLITE
        .write_count(&mut context, &mut sql, &select)
        .expect("Failed to render");
    assert_eq!(
        sql,
        indoc! {r#"
            SELECT COUNT(*)
            FROM "users"
            WHERE "name" = ?
        "#}
        .trim()
    );

    let distinct = users
        .table
        .select_all()
        .slice(&[&users.name])
        .expect("Failed to narrow")
        .with_distinct();
    let mut context = Context::new();
    let mut sql = String::new();
    SQLITE
        .write_count(&mut context, &mut sql, &distinct)
        .expect("Failed to render");
    assert_eq!(
        sql,
        indoc! {r#"
            SELECT COUNT(*)
            FROM (SELECT DISTINCT "name"
            FROM "users") AS "counted"
        "#}
        .trim()
    );

    let mut context = Context::new();
    let mut sql = String::new();
    SQLITE
        .write_exists_probe(&mut context, &mut sql, &select)
        .expect("Failed to render");
    assert_eq!(
        sql,
        indoc! {r#"
            SELECT 1
            FROM "users"
            WHERE "name" = ?
            LIMIT 1
        "#}
        .trim()
    );

    let mut context = Context::new();
    let mut sql = String::new();
    GENERIC
        .write_exists_probe(&mut context, &mut sql, &select)
        .expect("Failed to render");
    assert_eq!(
        sql,
        indoc! {r#"
            SELECT EXISTS (SELECT 1
            FROM "users"
            WHERE "name" = ?)
        "#}
        .trim()
    );
}

#[test]
fn transaction_control() {
    use quarry::SqlWriter;
    let mut sql = String::new();
    GENERIC.write_transaction_begin(&mut sql);
    assert_eq!(sql, "BEGIN TRANSACTION");
    sql.clear();
    GENERIC.write_transaction_commit(&mut sql);
    assert_eq!(sql, "COMMIT");
    sql.clear();
    GENERIC.write_transaction_rollback(&mut sql);
    assert_eq!(sql, "ROLLBACK");
}
