#![allow(clippy::unwrap_used, clippy::expect_used)]

use gdvalue::{ErrorCode, GdvInteger, Value};
use num_bigint::BigInt;

fn int(digits: &str) -> GdvInteger {
    GdvInteger::from_digits(digits).unwrap()
}

#[test]
fn digits_with_prefixes() {
    assert_eq!(int("123"), GdvInteger::from(123));
    assert_eq!(int("-123"), GdvInteger::from(-123));
    assert_eq!(int("0x7b"), GdvInteger::from(123));
    assert_eq!(int("0X7B"), GdvInteger::from(123));
    assert_eq!(int("0o173"), GdvInteger::from(123));
    assert_eq!(int("0b1111011"), GdvInteger::from(123));
    assert_eq!(int("-0x7B"), GdvInteger::from(-123));
    assert_eq!(int(""), GdvInteger::ZERO);
    assert_eq!(int("0"), GdvInteger::ZERO);
}

#[test]
fn bad_digits() {
    for bad in ["-", "0x", "-0b", "12a", "0b102", "1_000", " 1"] {
        let err = GdvInteger::from_digits(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDigits, "{bad}");
    }
}

#[test]
fn large_hex_literal() {
    let v = int("0x1234567890ABCDEF1234567890ABCDEF");
    assert!(!v.is_small());
    assert_eq!(v.get_as_opt::<i64>(), None);
    assert_eq!(
        v.get_as_opt::<u128>(),
        Some(0x1234_5678_90AB_CDEF_1234_5678_90AB_CDEF)
    );
    assert_eq!(int(&v.to_string()), v);
    assert_eq!(format!("{v:#X}"), "0x1234567890ABCDEF1234567890ABCDEF");
    assert_eq!(format!("{v:x}"), "1234567890abcdef1234567890abcdef");
}

#[test]
fn representation_switches_at_i64_bounds() {
    let max = GdvInteger::from(i64::MAX);
    let min = GdvInteger::from(i64::MIN);
    assert!(max.is_small());
    assert!(min.is_small());

    let above = &max + &GdvInteger::from(1);
    let below = &min - &GdvInteger::from(1);
    assert!(!above.is_small());
    assert!(!below.is_small());
    assert_eq!(above.get_as_big(), BigInt::from(i64::MAX) + 1);
    assert_eq!(below.get_as_big(), BigInt::from(i64::MIN) - 1);

    assert!(below < min);
    assert!(min < max);
    assert!(max < above);

    // Arithmetic back into range returns to the small form.
    let back = &above - &GdvInteger::from(1);
    assert!(back.is_small());
    assert_eq!(back, max);
    assert_eq!(GdvInteger::from_big(BigInt::from(5)).get_as_small(), Some(5));
}

#[test]
fn boundary_values_round_trip_through_gdvn() {
    for text in [
        "9223372036854775807",
        "9223372036854775808",
        "-9223372036854775808",
        "-9223372036854775809",
    ] {
        let v = Value::read_from_str(text).unwrap();
        let expected = int(text);
        assert_eq!(v.integer_get().unwrap(), &expected, "{text}");
        let back = Value::read_from_str(&v.as_string()).unwrap();
        assert_eq!(back, v, "{text}");
    }
    assert_eq!(
        Value::read_from_str("-9223372036854775809").unwrap().as_string(),
        "-0x8000000000000001"
    );
}

#[test]
fn narrowing_conversions() {
    let v = GdvInteger::from(300);
    assert_eq!(v.get_as_opt::<u8>(), None);
    assert_eq!(v.get_as_opt::<u16>(), Some(300));
    assert_eq!(GdvInteger::from(-1).get_as_opt::<u32>(), None);
    assert_eq!(GdvInteger::from(u64::MAX).get_as_opt::<u64>(), Some(u64::MAX));
    assert_eq!(GdvInteger::from(u64::MAX).get_as_opt::<i64>(), None);
}

#[test]
fn radix_rendering() {
    let v = GdvInteger::from(-255);
    assert_eq!(v.to_radix_digits(16, true).unwrap(), "-0xFF");
    assert_eq!(v.to_radix_digits(2, false).unwrap(), "-11111111");
    assert_eq!(v.to_radix_digits(36, true).unwrap(), "-73");
    assert_eq!(
        GdvInteger::from(i64::MIN).to_radix_digits(16, true).unwrap(),
        "-0x8000000000000000"
    );
    let err = v.to_radix_digits(37, false).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOptions);

    assert_eq!(
        GdvInteger::from_radix_digits("zz", 36).unwrap(),
        GdvInteger::from(1295)
    );
    assert_eq!(
        GdvInteger::from_radix_digits("-101", 2).unwrap(),
        GdvInteger::from(-5)
    );
    assert_eq!(
        GdvInteger::from_radix_digits("1", 1).unwrap_err().code,
        ErrorCode::InvalidOptions
    );
}

#[test]
fn arithmetic() {
    let a = GdvInteger::from(17);
    let b = GdvInteger::from(5);
    assert_eq!(&a + &b, GdvInteger::from(22));
    assert_eq!(&a - &b, GdvInteger::from(12));
    assert_eq!(&a * &b, GdvInteger::from(85));
    assert_eq!(&a / &b, GdvInteger::from(3));
    assert_eq!(&a % &b, GdvInteger::from(2));
    assert_eq!(-a.clone(), GdvInteger::from(-17));

    let big = GdvInteger::from(u64::MAX);
    let squared = &big * &big;
    assert_eq!(
        squared.get_as_big(),
        BigInt::from(u64::MAX) * BigInt::from(u64::MAX)
    );
    assert_eq!(&squared / &big, big);

    assert_eq!(a.checked_div(&GdvInteger::ZERO), None);
    assert_eq!(a.checked_rem(&GdvInteger::ZERO), None);
    // i64::MIN / -1 overflows i64 and falls back to the wide path.
    let min = GdvInteger::from(i64::MIN);
    let q = min.checked_div(&GdvInteger::from(-1)).unwrap();
    assert_eq!(q.get_as_big(), -BigInt::from(i64::MIN));
    assert_eq!(-&min, q);
}

#[test]
fn parse_from_str() {
    let v: GdvInteger = "-0b101".parse().unwrap();
    assert_eq!(v, GdvInteger::from(-5));
    assert!(v.is_negative());
    assert!(!GdvInteger::ZERO.is_negative());
}
