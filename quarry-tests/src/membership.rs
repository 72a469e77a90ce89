use crate::Dataset;
use quarry::{Executor, Order, RowTuple, stream::TryStreamExt};

pub async fn in_list<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    let rows = users
        .table
        .select(users.id.in_list(["andrey", "alex"]))
        .order_by(&users.name, Order::Asc)
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select an id list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(&users.name).expect("Failed to read"), "Alex");
    assert_eq!(rows[1].get(&users.name).expect("Failed to read"), "Andrey");

    let rows = users
        .table
        .select(users.id.not_in_list(["andrey", "alex"]))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select outside an id list");
    assert_eq!(rows.len(), 3);

    let cities = &data.cities;
    let count = cities
        .table
        .select(cities.id.in_list([1, 2]))
        .count(executor)
        .await
        .expect("Failed to count a city id list");
    assert_eq!(count, 2);
}

pub async fn empty_in_list<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    // An empty membership list never matches; its negation always does.
    let rows = users
        .table
        .select(users.id.in_list(Vec::<String>::new()))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select an empty list");
    assert_eq!(rows.len(), 0);

    let rows = users
        .table
        .select(users.id.not_in_list(Vec::<String>::new()))
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select outside an empty list");
    assert_eq!(rows.len(), 5);
}

pub async fn row_tuple_in_list<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    let pairs = [
        ("andrey".to_string(), "Andrey".to_string()),
        ("alex".to_string(), "Alex".to_string()),
    ];
    let rows = users
        .table
        .select((&users.id, &users.name).in_list(pairs.clone()))
        .order_by(&users.name, Order::Asc)
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select a pair list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(&users.name).expect("Failed to read"), "Alex");
    assert_eq!(rows[1].get(&users.name).expect("Failed to read"), "Andrey");

    // A mixed pair matches only when both sides line up.
    let rows = users
        .table
        .select(
            (&users.id, &users.name)
                .in_list([("andrey".to_string(), "Alex".to_string())]),
        )
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select a mismatched pair");
    assert_eq!(rows.len(), 0);
}

pub async fn tuple_partition<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    // Membership and its negation partition the table for any tuple set.
    let pairs = [
        ("andrey".to_string(), "Andrey".to_string()),
        ("sergey".to_string(), "Sergey".to_string()),
        ("missing".to_string(), "Nobody".to_string()),
    ];
    let within = users
        .table
        .select((&users.id, &users.name).in_list(pairs.clone()))
        .count(executor)
        .await
        .expect("Failed to count inside the pair set");
    let outside = users
        .table
        .select((&users.id, &users.name).not_in_list(pairs))
        .count(executor)
        .await
        .expect("Failed to count outside the pair set");
    let total = users
        .table
        .select_all()
        .count(executor)
        .await
        .expect("Failed to count users");
    assert_eq!(within, 2);
    assert_eq!(within + outside, total);
}

pub async fn sub_queries<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let cities = &data.cities;

    // cities holds ids {1, 2, 3}; excluding the sub-query result {2} leaves
    // {1, 3}, and 2 never shows up.
    let inner = cities
        .table
        .select(cities.id.eq(2))
        .slice(&[&cities.id])
        .expect("Failed to project the sub-query");
    let rows = cities
        .table
        .select(
            cities
                .id
                .not_in_query(inner)
                .expect("Failed to build the exclusion"),
        )
        .order_by(&cities.id, Order::Asc)
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select outside the sub-query");
    let ids = rows
        .iter()
        .map(|row| row.get(&cities.id).expect("Failed to read the id"))
        .collect::<Vec<_>>();
    assert_eq!(ids, [1, 3]);

    // A sub-query covering the whole key space excludes everything and
    // includes everything, respectively.
    let everything = || {
        cities
            .table
            .select_all()
            .slice(&[&cities.id])
            .expect("Failed to project the sub-query")
    };
    let count = cities
        .table
        .select(
            cities
                .id
                .not_in_query(everything())
                .expect("Failed to build the exclusion"),
        )
        .count(executor)
        .await
        .expect("Failed to count the excluded rows");
    assert_eq!(count, 0);
    let count = cities
        .table
        .select(
            cities
                .id
                .in_query(everything())
                .expect("Failed to build the inclusion"),
        )
        .count(executor)
        .await
        .expect("Failed to count the included rows");
    assert_eq!(count, 3);
}
