use tablematch::datatype::{KeyValue, Number, Value};

#[test]
fn round_trips_every_short_fraction() {
    // every value with |raw| < 10^(PRECISION+1) survives format -> parse
    for raw in -10_000i64..10_000 {
        let number = Number::from_raw(raw);
        let text = number.to_string();
        let parsed: Number = text.parse().expect("formatted number parses");
        assert_eq!(parsed, number, "round trip of raw {raw} via `{text}`");
    }
}

#[test]
fn infinity_spellings() {
    assert_eq!("inf".parse::<Number>().unwrap(), Number::INF);
    assert_eq!("Inf".parse::<Number>().unwrap(), Number::INF);
    assert_eq!("InFiNiTy".parse::<Number>().unwrap(), Number::INF);
    assert_eq!("-iNF".parse::<Number>().unwrap(), Number::NEG_INF);
    assert_eq!("-infiniTY".parse::<Number>().unwrap(), Number::NEG_INF);
    assert_eq!(Number::try_from(f64::INFINITY).unwrap(), Number::INF);
    assert_eq!(Number::try_from(f64::NEG_INFINITY).unwrap(), Number::NEG_INF);
    assert_eq!(Number::INF.to_string(), "inf");
    assert_eq!(Number::NEG_INF.to_string(), "-inf");
    assert_eq!(f64::from(Number::INF), f64::INFINITY);
    assert_eq!(f64::from(Number::NEG_INF), f64::NEG_INFINITY);
}

#[test]
fn zero_has_one_form() {
    assert_eq!("0.00".parse::<Number>().unwrap().to_string(), "0");
    assert_eq!("-0.00".parse::<Number>().unwrap().to_string(), "0");
    assert_eq!(Number::try_from(0.0).unwrap().to_string(), "0");
    assert_eq!(Number::try_from(-0.0).unwrap().to_string(), "0");
}

#[test]
fn double_conversions() {
    assert_eq!(f64::from("12.50".parse::<Number>().unwrap()), 12.5);
    assert_eq!(f64::from("-12.50".parse::<Number>().unwrap()), -12.5);
    assert_eq!(f64::from("0.050".parse::<Number>().unwrap()), 0.05);
    assert_eq!(Number::try_from(12.50).unwrap().to_string(), "12.5");
    assert_eq!(Number::try_from(-0.05).unwrap().to_string(), "-0.05");
    assert!(Number::try_from(f64::NAN).is_err(), "NaN is not a NUMBER");
}

#[test]
fn integer_part_accepts_hex_and_octal() {
    assert_eq!("0x1f".parse::<Number>().unwrap().to_string(), "31");
    assert_eq!("-0x10".parse::<Number>().unwrap().to_string(), "-16");
    assert_eq!("010".parse::<Number>().unwrap().to_string(), "8");
    assert_eq!("0x1f.5".parse::<Number>().unwrap().to_string(), "31.5");
    // the octal scan stops at `9`, leaving a stray character behind
    assert!("09".parse::<Number>().is_err());
    // `0x` without a hex digit parses `0` and trips over the `x`
    assert!("0x".parse::<Number>().is_err());
}

#[test]
fn fraction_truncates_beyond_precision() {
    assert_eq!("1.23456".parse::<Number>().unwrap().to_string(), "1.234");
    assert_eq!("-1.9999".parse::<Number>().unwrap().to_string(), "-1.999");
    assert_eq!("12.50".parse::<Number>().unwrap().to_string(), "12.5");
    assert_eq!("5.".parse::<Number>().unwrap().to_string(), "5");
}

#[test]
fn overflow_saturates_to_the_sentinels() {
    assert_eq!(
        "99999999999999999999".parse::<Number>().unwrap(),
        Number::INF
    );
    assert_eq!(
        "-99999999999999999999".parse::<Number>().unwrap(),
        Number::NEG_INF
    );
    assert_eq!("9223372036854775807".parse::<Number>().unwrap(), Number::INF);
    assert_eq!(Number::try_from(1e40).unwrap(), Number::INF);
    assert_eq!(Number::try_from(-1e40).unwrap(), Number::NEG_INF);
    assert_eq!(Number::from_raw(i64::MAX), Number::INF);
    assert_eq!(Number::from_raw(i64::MIN), Number::NEG_INF);
}

#[test]
fn rejects_malformed_strings() {
    for text in [
        "", "a", "+5", " 5", "5a", "5.a", "5.5.5", "-", "--5", "-.5", ".5", "in", "infin",
    ] {
        assert!(text.parse::<Number>().is_err(), "`{text}` must not parse");
    }
}

#[test]
fn sentinels_order_like_infinities() {
    let big: Number = "1000000".parse().unwrap();
    let small: Number = "-1000000".parse().unwrap();
    assert!(big < Number::INF);
    assert!(small > Number::NEG_INF);
    assert!(Number::NEG_INF < Number::INF);
}

#[test]
fn key_value_rendering() {
    assert_eq!(KeyValue::nil("K").to_string(), "K");
    assert_eq!(KeyValue::text("K", "v").to_string(), "K:v");
    assert_eq!(KeyValue::text("K", "").to_string(), "K:");
    assert_eq!(
        KeyValue::number("K", "12.50".parse().unwrap()).to_string(),
        "K:12.5"
    );
    assert!(KeyValue::nil("K").value.is_nil());
    assert_eq!(Value::Text("x".to_owned()).to_string(), "x");
}
