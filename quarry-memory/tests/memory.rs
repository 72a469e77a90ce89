use quarry::{Connection, Executor, Prepared, Query, QueryResult, Value, stream::TryStreamExt};
use quarry_memory::MemoryConnection;

#[tokio::test]
async fn generic_suite() {
    quarry_tests::init_logs();
    let connection = MemoryConnection::connect("memory://suite")
        .await
        .expect("Failed to connect");
    quarry_tests::execute_tests(connection).await;
}

#[tokio::test]
async fn rejects_foreign_scheme() {
    quarry_tests::init_logs();
    assert!(MemoryConnection::connect("sqlite://file.db").await.is_err());
}

#[tokio::test]
async fn named_databases_are_shared() {
    quarry_tests::init_logs();
    let mut first = MemoryConnection::connect("memory://shared")
        .await
        .expect("Failed to connect");
    let mut second = MemoryConnection::connect("memory://shared")
        .await
        .expect("Failed to connect");
    first
        .execute(Query::Raw(
            "CREATE TABLE \"pets\" (\n\"name\" TEXT NOT NULL\n)".into(),
        ))
        .await
        .expect("Failed to create the table");
    let affected = second
        .execute(Query::Raw(quarry::Statement::new(
            "INSERT INTO \"pets\" (\"name\")\nVALUES (?)".to_string(),
            vec![Value::Varchar(Some("Rex".to_string()))],
        )))
        .await
        .expect("Failed to insert through the second connection");
    assert_eq!(affected.rows_affected, 1);
    second
        .execute(Query::Raw("DROP TABLE \"pets\"".into()))
        .await
        .expect("Failed to drop the table");
}

#[tokio::test]
async fn anonymous_databases_are_private() {
    quarry_tests::init_logs();
    let mut first = MemoryConnection::connect("memory://")
        .await
        .expect("Failed to connect");
    let mut second = MemoryConnection::connect("memory://")
        .await
        .expect("Failed to connect");
    first
        .execute(Query::Raw(
            "CREATE TABLE \"pets\" (\n\"name\" TEXT\n)".into(),
        ))
        .await
        .expect("Failed to create the table");
    let result = second
        .execute(Query::Raw("DROP TABLE \"pets\"".into()))
        .await;
    assert!(result.is_err(), "the table must not leak across databases");
}

#[tokio::test]
async fn prepared_statements_rebind() {
    quarry_tests::init_logs();
    let mut connection = MemoryConnection::connect("memory://prepared")
        .await
        .expect("Failed to connect");
    connection
        .execute(Query::Raw(
            "CREATE TABLE \"squares\" (\n\"n\" INTEGER NOT NULL,\n\"square\" INTEGER NOT NULL\n)"
                .into(),
        ))
        .await
        .expect("Failed to create the table");
    let query = connection
        .prepare(
            "INSERT INTO \"squares\" (\"n\", \"square\")\nVALUES (?, ?)"
                .to_string()
                .into(),
        )
        .await
        .expect("Failed to prepare the insert");
    assert!(query.is_prepared());
    let Query::Prepared(mut prepared) = query else {
        panic!("expected a prepared statement");
    };
    for n in 1i64..=5 {
        prepared.clear_bindings().expect("Failed to clear bindings");
        prepared
            .bind(n)
            .expect("Failed to bind n")
            .bind(n * n)
            .expect("Failed to bind the square");
        connection
            .execute(Query::Prepared(prepared.clone()))
            .await
            .expect("Failed to run the prepared insert");
    }
    // A placeholder without a binding is an execution error.
    let rows = connection
        .fetch(Query::Raw(
            "SELECT \"square\"\nFROM \"squares\"\nWHERE \"n\" = ?"
                .to_string()
                .into(),
        ))
        .try_collect::<Vec<_>>()
        .await;
    assert!(rows.is_err(), "a missing binding must fail");
    let results = connection
        .run(Query::Raw(quarry::Statement::new(
            "SELECT \"square\"\nFROM \"squares\"\nWHERE \"n\" = ?".to_string(),
            vec![Value::Int64(Some(4))],
        )))
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to query squares");
    assert_eq!(results.len(), 1);
    let QueryResult::Row(row) = &results[0] else {
        panic!("expected a row");
    };
    assert_eq!(row.values[0], Value::Int64(Some(16)));
}
