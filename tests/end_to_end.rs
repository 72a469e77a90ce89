use quarry::{Connection, Order, Table, Transaction, stream::TryStreamExt};
use quarry_memory::MemoryConnection;

/// The whole pipeline against the in-memory engine: declare, create, insert
/// inside a transaction, query back with a typed predicate.
#[tokio::test]
async fn readme_flow() {
    let mut builder = Table::builder("books");
    let id = builder.column::<i64>("id").auto_increment().take();
    let title = builder.column::<String>("title").take();
    let pages = builder.column::<i32>("pages").take();
    let books = builder.build().expect("Failed to declare books");

    let mut connection = MemoryConnection::connect("memory://readme")
        .await
        .expect("Failed to connect");
    books
        .drop_table(&mut connection, true)
        .await
        .expect("Failed to drop books");
    books
        .create_table(&mut connection, false)
        .await
        .expect("Failed to create books");

    let mut transaction = connection
        .begin()
        .await
        .expect("Failed to begin a transaction");
    for (a_title, a_pages) in [
        ("The Hobbit", 310),
        ("The Silmarillion", 365),
        ("Leaf by Niggle", 50),
    ] {
        books
            .insert()
            .set(&title, a_title.to_string())
            .expect("Failed to attach the title")
            .set(&pages, a_pages)
            .expect("Failed to attach the pages")
            .execute(&mut transaction)
            .await
            .expect("Failed to insert the book");
    }
    transaction
        .commit()
        .await
        .expect("Failed to commit the inserts");

    let long_reads = books
        .select(pages.ge(300))
        .slice(&[&title])
        .expect("Failed to narrow the projection")
        .order_by(&title, Order::Asc)
        .rows(&mut connection)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to query the books");
    let titles = long_reads
        .iter()
        .map(|row| row.get(&title).expect("Failed to read the title"))
        .collect::<Vec<_>>();
    assert_eq!(titles, ["The Hobbit", "The Silmarillion"]);

    let next_id: i64 = books
        .insert()
        .set(&title, "Unfinished Tales".to_string())
        .expect("Failed to attach the title")
        .set(&pages, 480)
        .expect("Failed to attach the pages")
        .execute_returning_id(&mut connection)
        .await
        .expect("Failed to insert with identity retrieval");
    assert_eq!(next_id, 4);
    assert_eq!(
        books
            .select(id.eq(next_id))
            .count(&mut connection)
            .await
            .expect("Failed to count by the fresh identity"),
        1
    );
}
