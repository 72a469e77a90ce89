use crate::Dataset;
use quarry::{Executor, Order, stream::TryStreamExt};

pub async fn distinct_projection<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let user_data = &data.user_data;

    // Two rows differ only outside the projected column; distinct collapses
    // them into one projected tuple.
    let rows = user_data
        .table
        .select(user_data.value.eq(20))
        .slice(&[&user_data.value])
        .expect("Failed to narrow the projection")
        .with_distinct()
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select distinct values");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get(&user_data.value).expect("Failed to read"),
        20
    );

    let count = user_data
        .table
        .select_all()
        .slice(&[&user_data.user_id])
        .expect("Failed to narrow the projection")
        .with_distinct()
        .count(executor)
        .await
        .expect("Failed to count distinct users");
    assert_eq!(count, 3);
}

pub async fn order_by_override<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    // Repeating order_by for a column replaces its earlier term: the query
    // orders by city first, then by name descending.
    let rows = users
        .table
        .select(users.city_id.is_not_null())
        .order_by(&users.name, Order::Asc)
        .order_by(&users.city_id, Order::Asc)
        .order_by(&users.name, Order::Desc)
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select with ordering");
    let names = rows
        .iter()
        .map(|row| row.get(&users.name).expect("Failed to read"))
        .collect::<Vec<_>>();
    assert_eq!(names, ["Andrey", "Sergey", "Eugene"]);
}
