use crate::Dataset;
use quarry::{Executor, compound_and, compound_or, stream::TryStreamExt};

pub async fn compound_folds<E: Executor>(executor: &mut E) {
    let data = Dataset::declare();
    data.prepare(executor)
        .await
        .expect("Failed to prepare the dataset");
    let users = &data.users;

    // The disjunction fold matches the union of the folded predicates.
    let matched = |id: &str| users.id.eq(id.to_string());
    let rows = users
        .table
        .select(
            compound_or([matched("andrey"), matched("alex"), matched("smth")])
                .expect("Failed to fold with OR"),
        )
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select the union");
    assert_eq!(rows.len(), 3);

    // The conjunction fold matches the intersection: mutually exclusive
    // equalities on one column leave nothing.
    let rows = users
        .table
        .select(
            compound_and([matched("andrey"), matched("alex")])
                .expect("Failed to fold with AND"),
        )
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select the intersection");
    assert_eq!(rows.len(), 0);

    // Compatible conjuncts intersect normally.
    let rows = users
        .table
        .select(
            compound_and([users.id.eq("eugene"), users.city_id.eq(2)])
                .expect("Failed to fold with AND"),
        )
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select the narrow intersection");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(&users.name).expect("Failed to read"), "Eugene");
}
