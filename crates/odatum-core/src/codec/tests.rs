use super::*;
use proptest::prelude::*;
use serde_json::json;
use time::macros::{date, datetime, time};

fn round_trip(kind: PrimitiveKind, value: Value) {
    let wire = kind.serialize(&value, None);
    let back = kind.deserialize(&wire);

    assert_eq!(back, value, "{kind} round trip failed via wire {wire}");
}

#[test]
fn every_codec_round_trips_representative_values() {
    round_trip(PrimitiveKind::Boolean, Value::Bool(true));
    round_trip(PrimitiveKind::Int32, Value::Int(0));
    round_trip(PrimitiveKind::Int32, Value::Int(-2_147_483_648));
    round_trip(PrimitiveKind::Int64, Value::Int(i64::MAX));
    round_trip(PrimitiveKind::Double, Value::Float(1.5));
    round_trip(PrimitiveKind::Double, Value::Float(f64::INFINITY));
    round_trip(PrimitiveKind::Double, Value::Float(f64::NEG_INFINITY));
    round_trip(
        PrimitiveKind::Decimal,
        Value::Decimal("79228.162514".parse().unwrap()),
    );
    round_trip(PrimitiveKind::String, Value::Text("he said 'hi'".to_string()));
    round_trip(
        PrimitiveKind::Guid,
        Value::Guid("f89dee73-af9f-4cd4-b330-db93c25ff3c7".parse().unwrap()),
    );
    round_trip(PrimitiveKind::Binary, Value::Binary(vec![0, 1, 254, 255]));
    round_trip(PrimitiveKind::Date, Value::Date(date!(2024 - 02 - 29)));
    // midnight is the day boundary worth pinning
    round_trip(PrimitiveKind::TimeOfDay, Value::TimeOfDay(time!(00:00:00)));
    round_trip(PrimitiveKind::TimeOfDay, Value::TimeOfDay(time!(23:59:59.5)));
    round_trip(
        PrimitiveKind::DateTime,
        Value::DateTime(datetime!(2024-06-01 12:30:00 +02:00)),
    );
    round_trip(PrimitiveKind::Duration, Value::Duration(time::Duration::ZERO));
    round_trip(
        PrimitiveKind::Duration,
        Value::Duration(time::Duration::seconds(90061)),
    );
    round_trip(
        PrimitiveKind::Duration,
        Value::Duration(-time::Duration::seconds(30)),
    );
}

#[test]
fn nan_token_round_trips_by_value_class() {
    let wire = PrimitiveKind::Double.serialize(&Value::Float(f64::NAN), None);
    assert_eq!(wire, json!("NaN"));

    match PrimitiveKind::Double.deserialize(&wire) {
        Value::Float(f) => assert!(f.is_nan()),
        other => panic!("expected a float, got {other:?}"),
    }
}

#[test]
fn integer_codecs_coerce_wire_strings() {
    assert_eq!(PrimitiveKind::Int32.deserialize(&json!("1")), Value::Int(1));
    // V2 puts Int64 on the wire as a string
    assert_eq!(
        PrimitiveKind::Int64.deserialize(&json!("9007199254740993")),
        Value::Int(9_007_199_254_740_993)
    );
    assert_eq!(
        PrimitiveKind::Decimal.deserialize(&json!("12.50")),
        Value::Decimal("12.50".parse().unwrap())
    );
}

#[test]
fn null_passes_through_every_codec() {
    for kind in [
        PrimitiveKind::Boolean,
        PrimitiveKind::Int32,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::String,
        PrimitiveKind::DateTime,
    ] {
        assert_eq!(kind.deserialize(&Json::Null), Value::Null);
        assert_eq!(kind.serialize(&Value::Null, None), Json::Null);
    }
}

#[test]
fn unrefinable_wire_shapes_pass_through() {
    assert_eq!(
        PrimitiveKind::Int32.deserialize(&json!("not a number")),
        Value::Text("not a number".to_string())
    );
    assert_eq!(
        PrimitiveKind::Guid.deserialize(&json!(17)),
        Value::Int(17)
    );
}

#[test]
fn lookup_accepts_both_spellings_and_old_names() {
    assert_eq!(PrimitiveKind::lookup("Edm.Int32"), Some(PrimitiveKind::Int32));
    assert_eq!(PrimitiveKind::lookup("Int32"), Some(PrimitiveKind::Int32));
    assert_eq!(
        PrimitiveKind::lookup("Edm.DateTimeOffset"),
        Some(PrimitiveKind::DateTime)
    );
    assert_eq!(PrimitiveKind::lookup("Edm.DateTime"), Some(PrimitiveKind::DateTime));
    assert_eq!(PrimitiveKind::lookup("Edm.Time"), Some(PrimitiveKind::TimeOfDay));
    assert_eq!(PrimitiveKind::lookup("Edm.GeographyPoint"), None);
}

#[test]
fn decimal_compat_formats_to_precision_then_scale() {
    let format = DecimalFormat {
        precision: Some(5),
        scale: Some(2),
    };

    let wire = PrimitiveKind::Decimal.serialize(
        &Value::Decimal("123.456".parse().unwrap()),
        Some(format),
    );
    assert_eq!(wire, json!("123.46"));

    let padded = PrimitiveKind::Decimal.serialize(&Value::Decimal("7".parse().unwrap()), Some(format));
    assert_eq!(padded, json!("7.00"), "scale must pad trailing zeros");
}

#[test]
fn decimal_without_compat_stays_numeric() {
    let wire = PrimitiveKind::Decimal.serialize(&Value::Decimal("12.5".parse().unwrap()), None);
    assert_eq!(wire, json!(12.5));
}

#[test]
fn legacy_millisecond_datetimes_are_accepted() {
    let value = PrimitiveKind::DateTime.deserialize(&json!("/Date(0)/"));
    assert_eq!(value, Value::DateTime(datetime!(1970-01-01 00:00:00 UTC)));

    let offset = PrimitiveKind::DateTime.deserialize(&json!("/Date(86400000+0060)/"));
    assert_eq!(offset, Value::DateTime(datetime!(1970-01-02 00:00:00 UTC)));
}

#[test]
fn duration_grammar_covers_day_and_time_parts() {
    let cases = [
        ("PT0S", time::Duration::ZERO),
        ("P1D", time::Duration::days(1)),
        ("PT1H30M", time::Duration::minutes(90)),
        ("P2DT3H4M5S", time::Duration::seconds(2 * 86400 + 3 * 3600 + 4 * 60 + 5)),
        ("-PT30S", -time::Duration::seconds(30)),
        ("PT0.5S", time::Duration::milliseconds(500)),
    ];

    for (text, expected) in cases {
        assert_eq!(
            temporal::parse_duration(text),
            Some(expected),
            "parsing {text}"
        );
    }

    assert_eq!(temporal::parse_duration("P"), None);
    assert_eq!(temporal::parse_duration("PT"), None);
    assert_eq!(temporal::parse_duration("1H"), None);
}

proptest! {
    #[test]
    fn int_codec_round_trips_any_value(n in any::<i64>()) {
        let wire = PrimitiveKind::Int64.serialize(&Value::Int(n), None);
        prop_assert_eq!(PrimitiveKind::Int64.deserialize(&wire), Value::Int(n));
    }

    #[test]
    fn duration_round_trips_whole_milliseconds(ms in -86_400_000_000i64..86_400_000_000i64) {
        let duration = time::Duration::milliseconds(ms);
        let text = temporal::format_duration(duration);
        prop_assert_eq!(temporal::parse_duration(&text), Some(duration));
    }

    #[test]
    fn time_of_day_round_trips(h in 0u8..24, m in 0u8..60, s in 0u8..60) {
        let value = time::Time::from_hms(h, m, s).unwrap();
        let text = temporal::format_time(value);
        prop_assert_eq!(temporal::parse_time(&text), Some(value));
    }
}
