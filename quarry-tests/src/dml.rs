use crate::Dataset;
use quarry::{Executor, stream::TryStreamExt};

pub async fn insert_update_delete<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    let affected = users
        .table
        .insert()
        .set(&users.id, "nina".to_string())
        .expect("Failed to attach id")
        .set(&users.name, "Nina".to_string())
        .expect("Failed to attach name")
        .set(&users.city_id, None)
        .expect("Failed to attach city")
        .execute(executor)
        .await
        .expect("Failed to insert Nina");
    assert_eq!(affected.rows_affected, 1);

    let affected = users
        .table
        .update(users.id.eq("nina"))
        .set(&users.name, "Nina N".to_string())
        .expect("Failed to attach the new name")
        .set(&users.city_id, Some(3))
        .expect("Failed to attach the new city")
        .execute(executor)
        .await
        .expect("Failed to update Nina");
    assert_eq!(affected.rows_affected, 1);

    let rows = users
        .table
        .select(users.city_id.eq(3))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select by the new city");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(&users.name).expect("Failed to read"), "Nina N");
    assert_eq!(
        rows[0].get(&users.city_id).expect("Failed to read"),
        Some(3)
    );

    let affected = users
        .table
        .delete(users.id.eq("nina"))
        .execute(executor)
        .await
        .expect("Failed to delete Nina");
    assert_eq!(affected.rows_affected, 1);
    assert_eq!(
        users
            .table
            .select_all()
            .count(executor)
            .await
            .expect("Failed to count users"),
        5
    );
}

pub async fn identity_round_trip<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let cities = &data.cities;

    // The freshly assigned identity decodes through the same codec as a
    // read, so it filters without any conversion in between.
    let id: i32 = cities
        .table
        .insert()
        .set(&cities.name, "Amsterdam".to_string())
        .expect("Failed to attach the name")
        .execute_returning_id(executor)
        .await
        .expect("Failed to insert Amsterdam");
    assert_eq!(id, 4);

    let rows = cities
        .table
        .select(cities.id.eq(id))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select the new city");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get(&cities.name).expect("Failed to read"),
        "Amsterdam"
    );
    assert_eq!(rows[0].get(&cities.id).expect("Failed to read"), id);
}
