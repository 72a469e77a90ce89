use quarry::{Executor, Table, stream::TryStreamExt};
use rust_decimal::Decimal;
use time::macros::{date, datetime, time};
use uuid::Uuid;

/// Every supported value type written through the codec and read back: the
/// decoded row must equal what was inserted, whatever the dialect stores
/// underneath.
pub async fn value_round_trip<E: Executor>(executor: &mut E) {
    let mut builder = Table::builder("specimens");
    let flag = builder.column::<bool>("flag").take();
    let small = builder.column::<i16>("small").take();
    let regular = builder.column::<i32>("regular").take();
    let large = builder.column::<i64>("large").take();
    let weight = builder.column::<f64>("weight").take();
    let price = builder.column::<Decimal>("price").take();
    let label = builder.column::<String>("label").take();
    let payload = builder.column::<Vec<u8>>("payload").take();
    let born = builder.column::<time::Date>("born").take();
    let wakes = builder.column::<time::Time>("wakes").take();
    let seen = builder.column::<time::PrimitiveDateTime>("seen").take();
    let token = builder.column::<Uuid>("token").take();
    let note = builder.column::<Option<String>>("note").take();
    let table = builder.build().expect("Failed to declare specimens");

    table
        .drop_table(executor, true)
        .await
        .expect("Failed to drop specimens");
    table
        .create_table(executor, false)
        .await
        .expect("Failed to create specimens");

    let uuid = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap();
    table
        .insert()
        .set(&flag, true)
        .expect("Failed to attach flag")
        .set(&small, -2)
        .expect("Failed to attach small")
        .set(&regular, 777)
        .expect("Failed to attach regular")
        .set(&large, 9876543210)
        .expect("Failed to attach large")
        .set(&weight, 13.25)
        .expect("Failed to attach weight")
        .set(&price, Decimal::new(123456, 2))
        .expect("Failed to attach price")
        .set(&label, "Hello world!".to_string())
        .expect("Failed to attach label")
        .set(&payload, vec![0xDE, 0xAD, 0xBE, 0xEF])
        .expect("Failed to attach payload")
        .set(&born, date!(1990 - 01 - 15))
        .expect("Failed to attach born")
        .set(&wakes, time!(12:00:10))
        .expect("Failed to attach wakes")
        .set(&seen, datetime!(2024-05-06 07:08:09.123456))
        .expect("Failed to attach seen")
        .set(&token, uuid)
        .expect("Failed to attach token")
        .set(&note, None)
        .expect("Failed to attach note")
        .execute(executor)
        .await
        .expect("Failed to insert the specimen");

    let rows = table
        .select_all()
        .rows(executor)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to read the specimen back");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.get(&flag).expect("flag"), true);
    assert_eq!(row.get(&small).expect("small"), -2);
    assert_eq!(row.get(&regular).expect("regular"), 777);
    assert_eq!(row.get(&large).expect("large"), 9876543210);
    assert_eq!(row.get(&weight).expect("weight"), 13.25);
    assert_eq!(row.get(&price).expect("price"), Decimal::new(123456, 2));
    assert_eq!(row.get(&label).expect("label"), "Hello world!");
    assert_eq!(
        row.get(&payload).expect("payload"),
        vec![0xDE, 0xAD, 0xBE, 0xEF]
    );
    assert_eq!(row.get(&born).expect("born"), date!(1990 - 01 - 15));
    assert_eq!(row.get(&wakes).expect("wakes"), time!(12:00:10));
    assert_eq!(
        row.get(&seen).expect("seen"),
        datetime!(2024-05-06 07:08:09.123456)
    );
    assert_eq!(row.get(&token).expect("token"), uuid);
    assert_eq!(row.get(&note).expect("note"), None);

    // Filtering on a lowered type goes through the same codec.
    let count = table
        .select(token.eq(uuid))
        .count(executor)
        .await
        .expect("Failed to count by token");
    assert_eq!(count, 1);
    let count = table
        .select(born.lt(date!(1991 - 01 - 01)))
        .count(executor)
        .await
        .expect("Failed to count by date");
    assert_eq!(count, 1);
}
