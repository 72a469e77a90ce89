use crate::Dataset;
use quarry::{Executor, not, stream::TryStreamExt};

pub async fn select_basics<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    let rows = users
        .table
        .select(users.id.eq("andrey"))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select by id");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get(&users.name).expect("Failed to read name"),
        "Andrey"
    );

    let rows = users
        .table
        .select(users.id.eq("andrey").and(users.name.eq("Andrey")))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select with AND");
    assert_eq!(rows.len(), 1);

    let rows = users
        .table
        .select(users.id.eq("andrey").or(users.name.eq("Sergey")))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select with OR");
    assert_eq!(rows.len(), 2);

    let rows = users
        .table
        .select(not(users.id.eq("andrey")))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select with NOT");
    assert_eq!(rows.len(), 4);
    assert!(
        rows.iter()
            .all(|row| row.get(&users.id).expect("Failed to read id") != "andrey")
    );

    // Null comparisons turn into null checks, never `= NULL`.
    let rows = users
        .table
        .select(users.city_id.eq(None))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select by null city");
    assert_eq!(rows.len(), 2);

    let rows = users
        .table
        .select(users.city_id.is_not_null())
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select by non null city");
    assert_eq!(rows.len(), 3);

    // The descriptor is reusable: iterating again re-executes the query.
    let select = data
        .cities
        .table
        .select(data.cities.id.ge(2))
        .order_by(&data.cities.name, quarry::Order::Asc);
    let first = select
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to run the first iteration");
    let second = select
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to run the second iteration");
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(
        first[0]
            .get(&data.cities.name)
            .expect("Failed to read the city name"),
        "Munich"
    );
}

pub async fn sized_queries<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let cities = &data.cities;

    assert!(
        !cities
            .table
            .select_all()
            .is_empty(executor)
            .await
            .expect("Failed to probe all cities")
    );
    assert!(
        cities
            .table
            .select(cities.name.eq("Qwertt"))
            .is_empty(executor)
            .await
            .expect("Failed to probe a missing city")
    );
    assert_eq!(
        cities
            .table
            .select(cities.name.eq("Qwertt"))
            .count(executor)
            .await
            .expect("Failed to count a missing city"),
        0
    );
    assert_eq!(
        cities
            .table
            .select_all()
            .count(executor)
            .await
            .expect("Failed to count cities"),
        3
    );
}
