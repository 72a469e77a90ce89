use quarry_core::{
    AsValue, CodecError, ColumnDef, ColumnRef, Error, Value, WireCodec, codec,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use time::macros::{date, datetime, time};
use uuid::Uuid;

fn column(name: &str, prototype: Value, nullable: bool) -> ColumnDef {
    ColumnDef {
        column_ref: ColumnRef {
            name: Arc::from(name),
            table: Arc::from("t"),
        },
        value: prototype,
        nullable,
        primary_key: false,
        auto_increment: false,
        default: None,
        references: None,
    }
}

fn all_specimens() -> Vec<(Value, Value)> {
    // (column prototype, concrete value)
    vec![
        (Value::Boolean(None), true.as_value()),
        (Value::Boolean(None), false.as_value()),
        (Value::Int16(None), (-2i16).as_value()),
        (Value::Int32(None), 777i32.as_value()),
        (Value::Int64(None), 9876543210i64.as_value()),
        (Value::Float64(None), 13.25f64.as_value()),
        (Value::Decimal(None), Decimal::new(123456, 2).as_value()),
        (Value::Varchar(None), "Hello 'world'!".to_string().as_value()),
        (Value::Blob(None), vec![0u8, 1, 254, 255].as_value()),
        (Value::Date(None), date!(1990 - 01 - 15).as_value()),
        (Value::Time(None), time!(12:00:10.5).as_value()),
        (
            Value::Timestamp(None),
            datetime!(2024-05-06 07:08:09.123456).as_value(),
        ),
        (
            Value::Uuid(None),
            Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd")
                .unwrap()
                .as_value(),
        ),
    ]
}

#[test]
fn round_trip_for_every_dialect() {
    for wire_codec in [WireCodec::native(), WireCodec::storage_classes()] {
        for (prototype, value) in all_specimens() {
            let def = column("c", prototype, false);
            let wire = codec::to_wire(&wire_codec, value.clone()).expect("Failed to encode");
            let back = codec::from_wire(&def, wire).expect("Failed to decode");
            assert_eq!(back, value, "codec {:?}", wire_codec);
        }
    }
}

#[test]
fn nulls_round_trip_for_nullable_columns() {
    for wire_codec in [WireCodec::native(), WireCodec::storage_classes()] {
        for (prototype, _) in all_specimens() {
            let def = column("c", prototype.clone(), true);
            let wire = codec::to_wire(&wire_codec, prototype.clone()).expect("Failed to encode");
            assert!(wire.is_null());
            let back = codec::from_wire(&def, wire).expect("Failed to decode");
            assert!(back.is_null());
            assert!(back.same_type(&prototype));
        }
    }
}

#[test]
fn storage_classes_lower_to_text_and_integers() {
    let wire_codec = WireCodec::storage_classes();
    assert_eq!(
        codec::to_wire(&wire_codec, true.as_value()).unwrap(),
        Value::Int64(Some(1)),
    );
    assert_eq!(
        codec::to_wire(&wire_codec, 7i16.as_value()).unwrap(),
        Value::Int64(Some(7)),
    );
    assert_eq!(
        codec::to_wire(&wire_codec, date!(2020 - 02 - 29).as_value()).unwrap(),
        Value::Varchar(Some("2020-02-29".to_string())),
    );
    let uuid = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap();
    assert_eq!(
        codec::to_wire(&wire_codec, uuid.as_value()).unwrap(),
        Value::Varchar(Some("5e915574-bb30-4430-98cf-c5854f61fbbd".to_string())),
    );
}

#[test]
fn encode_guards_type_and_nullability() {
    let def = column("age", Value::Int32(None), false);
    codec::check(&def, &Value::Int32(Some(30))).expect("a matching value passes");
    let error = codec::check(&def, &Value::Varchar(Some("thirty".to_string())))
        .expect_err("a mismatched value fails");
    assert!(matches!(
        error,
        Error::Codec(CodecError::TypeMismatch { .. })
    ));
    let error = codec::check(&def, &Value::Int32(None)).expect_err("an absent value fails");
    assert!(matches!(
        error,
        Error::Codec(CodecError::NullNotAllowed { .. })
    ));

    let nullable = column("age", Value::Int32(None), true);
    codec::check(&nullable, &Value::Int32(None)).expect("a nullable column accepts NULL");
}

#[test]
fn decode_rejects_untypeable_wire_values() {
    let def = column("age", Value::Int32(None), false);
    let error =
        codec::from_wire(&def, Value::Blob(Some(Box::from([1u8])))).expect_err("must fail");
    assert!(matches!(error, Error::Codec(CodecError::TypeMismatch { .. })));
    let error = codec::from_wire(&def, Value::Null).expect_err("NULL must fail");
    assert!(matches!(
        error,
        Error::Codec(CodecError::NullNotAllowed { .. })
    ));
    let error = codec::from_wire(&def, Value::Int64(Some(i64::MAX))).expect_err("must overflow");
    assert!(matches!(error, Error::Codec(CodecError::OutOfRange { .. })));
}

#[test]
fn native_conversions_widen_and_narrow() {
    assert_eq!(
        i32::try_from_value(Value::Int64(Some(77))).expect("fits"),
        77
    );
    assert!(i16::try_from_value(Value::Int64(Some(1i64 << 40))).is_err());
    assert_eq!(
        i64::try_from_value(Value::Int32(Some(5))).expect("widens"),
        5
    );
    assert_eq!(
        f64::try_from_value(Value::Int32(Some(2))).expect("widens"),
        2.0
    );
    assert_eq!(
        Decimal::try_from_value(Value::Varchar(Some("12.50".to_string()))).expect("parses"),
        Decimal::new(1250, 2),
    );
    assert_eq!(
        Option::<i32>::try_from_value(Value::Int32(None)).expect("NULL decodes"),
        None
    );
    assert!(String::try_from_value(Value::Int32(Some(1))).is_err());
}
