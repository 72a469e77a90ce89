use crate::Dataset;
use quarry::{Connection, Transaction, stream::TryStreamExt};

pub async fn transactions<C: Connection>(connection: &mut C) {
    let data = Dataset::declare();
    data.prepare(connection)
        .await
        .expect("Failed to prepare the dataset");
    let cities = &data.cities;

    // Rolled back work leaves no trace for the next transaction.
    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    cities
        .table
        .insert()
        .set(&cities.name, "Ghost town".to_string())
        .expect("Failed to attach the name")
        .execute(&mut transaction)
        .await
        .expect("Failed to insert inside the transaction");
    assert_eq!(
        cities
            .table
            .select_all()
            .count(&mut transaction)
            .await
            .expect("Failed to count inside the transaction"),
        4
    );
    transaction
        .rollback()
        .await
        .expect("Failed to roll back the transaction");

    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    assert_eq!(
        cities
            .table
            .select_all()
            .count(&mut transaction)
            .await
            .expect("Failed to count after the rollback"),
        3
    );
    transaction
        .commit()
        .await
        .expect("Failed to commit the read transaction");

    // Committed work persists.
    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    cities
        .table
        .insert()
        .set(&cities.name, "Vienna".to_string())
        .expect("Failed to attach the name")
        .execute(&mut transaction)
        .await
        .expect("Failed to insert Vienna");
    transaction
        .commit()
        .await
        .expect("Failed to commit the transaction");
    assert_eq!(
        cities
            .table
            .select_all()
            .count(connection)
            .await
            .expect("Failed to count after the commit"),
        4
    );

    // An execution error is terminal: the insert that preceded it is gone
    // once the transaction ends, verified by a fresh transaction's read.
    let users = &data.users;
    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    users
        .table
        .insert()
        .set(&users.id, "nina".to_string())
        .expect("Failed to attach the id")
        .set(&users.name, "Nina".to_string())
        .expect("Failed to attach the name")
        .execute(&mut transaction)
        .await
        .expect("Failed to insert Nina");
    let duplicate = users
        .table
        .insert()
        .set(&users.id, "andrey".to_string())
        .expect("Failed to attach the id")
        .set(&users.name, "Impostor".to_string())
        .expect("Failed to attach the name")
        .execute(&mut transaction)
        .await;
    assert!(duplicate.is_err(), "duplicate key must fail");
    // The transaction is poisoned, later statements are refused.
    assert!(
        users
            .table
            .select_all()
            .rows(&mut transaction)
            .try_collect::<Vec<_>>()
            .await
            .is_err()
    );
    drop(transaction);

    let mut transaction = connection
        .begin()
        .await
        .expect("Could not begin a transaction");
    assert_eq!(
        users
            .table
            .select_all()
            .count(&mut transaction)
            .await
            .expect("Failed to count after the failure"),
        5
    );
    assert!(
        users
            .table
            .select(users.id.eq("nina"))
            .is_empty(&mut transaction)
            .await
            .expect("Failed to probe for Nina")
    );
    transaction
        .commit()
        .await
        .expect("Failed to commit the verification transaction");
}
