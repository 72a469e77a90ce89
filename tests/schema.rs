use quarry::{ColumnTrait, Error, SchemaError, Table, Value};

#[test]
fn declares_tables_in_memory_only() {
    let mut builder = Table::builder("accounts");
    let id = builder.column::<i64>("id").auto_increment().take();
    let owner = builder.column::<String>("owner").take();
    let note = builder.column::<Option<String>>("note").take();
    let table = builder.build().expect("Failed to declare accounts");

    assert_eq!(table.name(), "accounts");
    assert_eq!(table.columns().len(), 3);
    assert_eq!(table.primary_key().map(|c| c.name()), Some("id"));
    assert_eq!(table.identity().map(|c| c.name()), Some("id"));
    assert!(table.contains(&id.def().column_ref));
    assert!(owner.def().value.same_type(&Value::Varchar(None)));
    assert!(!owner.def().nullable);
    assert!(note.def().nullable);
    // The identity column is implicitly the primary key.
    assert!(id.def().primary_key && id.def().auto_increment);
}

#[test]
fn duplicate_columns_are_rejected() {
    let mut builder = Table::builder("accounts");
    builder.column::<i64>("name").take();
    builder.column::<String>("name").take();
    let error = builder.build().expect_err("duplicates must be rejected");
    assert!(matches!(
        error,
        Error::Schema(SchemaError::DuplicateColumn { .. })
    ));
}

#[test]
fn at_most_one_primary_key() {
    let mut builder = Table::builder("accounts");
    builder.column::<i64>("id").primary_key().take();
    builder.column::<String>("owner").primary_key().take();
    let error = builder.build().expect_err("two keys must be rejected");
    assert!(matches!(
        error,
        Error::Schema(SchemaError::MultiplePrimaryKeys { .. })
    ));
}

#[test]
fn identity_requires_an_integer_type() {
    let mut builder = Table::builder("accounts");
    builder.column::<String>("id").auto_increment().take();
    let error = builder
        .build()
        .expect_err("a text identity must be rejected");
    assert!(matches!(
        error,
        Error::Schema(SchemaError::IdentityNotInteger { .. })
    ));
}

#[test]
fn references_must_target_a_primary_key() {
    let mut builder = Table::builder("cities");
    let id = builder.column::<i32>("id").auto_increment().take();
    let name = builder.column::<String>("name").take();
    builder.build().expect("Failed to declare cities");

    let mut builder = Table::builder("users");
    builder
        .column::<Option<i32>>("city_id")
        .references(&id)
        .take();
    builder.build().expect("a primary key target is accepted");

    let mut builder = Table::builder("users");
    builder
        .column::<Option<String>>("city_name")
        .references(&name)
        .take();
    let error = builder
        .build()
        .expect_err("a non key target must be rejected");
    assert!(matches!(
        error,
        Error::Schema(SchemaError::ReferenceNotPrimaryKey { .. })
    ));

    // The nullability of the reference is independent of the target's.
    let mut builder = Table::builder("billing");
    let required = builder.column::<i32>("city_id").references(&id).take();
    builder.build().expect("Failed to declare billing");
    assert!(!required.def().nullable);
}
