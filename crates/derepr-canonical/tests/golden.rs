//! Golden fixtures: canonical text and digests pinned against the reference
//! store's output.

use derepr_canonical::{
    canonicalize_key, decode, digest, encode, to_value, CanonicalError, DigestAlg, Value,
    ValueKind,
};

struct Fixture {
    value: Value,
    text: &'static str,
    sha256: &'static str,
    md5: &'static str,
}

fn fixtures() -> Vec<Fixture> {
    vec![
        Fixture {
            value: Value::tuple([]),
            text: "()",
            sha256: "2e38e77b22c314a449e91fafed92a43826ac6aa403ae6a8acb6cf58239fbaf5d",
            md5: "bcd8b0c2eb1fce714eab6cef0d771acc",
        },
        Fixture {
            value: Value::bytes("hello"),
            text: "'hello'",
            sha256: "d543699194a3343443ab84395c0464b018f12e31df1b5e829d65c4440e90b9a5",
            md5: "bfa4e89e95bdf3b84dc5f59937ab9976",
        },
        Fixture {
            value: Value::text("hello"),
            text: "u'hello'",
            sha256: "043b03cd1ba44913e492ffd4491dfa9048011666ac4e1136a43f3e154604b092",
            md5: "24611859999a6d7b4a60641a30dc92f9",
        },
        Fixture {
            value: Value::tuple([Value::from(0), Value::from(1), Value::from(2)]),
            text: "(0, 1, 2)",
            sha256: "eae0f06c46ca0f14a374a87039c6d6a96af56215c1d208a1bf5776896e66137f",
            md5: "7ae3e68b70bbc7335b7e7bb290e8e2a3",
        },
        Fixture {
            value: Value::mapping([
                (Value::text("b"), Value::from(2)),
                (Value::text("a"), Value::from(1)),
            ]),
            text: "{u'a': 1, u'b': 2}",
            sha256: "c90c15b5e73f51a5c050a433709398d508058f05bae2064f93795ead683caf6c",
            md5: "9850892735f6690c699b736bdde5a9bc",
        },
        Fixture {
            value: Value::Unit,
            text: "None",
            sha256: "dc937b59892604f5a86ac96936cd7ff09e25f18ae6b758e8014a24c7fa039e91",
            md5: "6adf97f83acf6453d4a6a4b1070f3754",
        },
        Fixture {
            value: Value::from(0),
            text: "0",
            sha256: "5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9",
            md5: "cfcd208495d565ef66e7dff9f98764da",
        },
    ]
}

#[test]
fn canonical_text_matches_fixtures() {
    for fixture in fixtures() {
        assert_eq!(encode(&fixture.value).unwrap(), fixture.text);
        assert_eq!(decode(fixture.text).unwrap(), fixture.value);
    }
}

#[test]
fn sha256_digests_match_fixtures() {
    for fixture in fixtures() {
        let id = digest(&fixture.value, DigestAlg::Sha256).unwrap();
        assert_eq!(id.to_hex(), fixture.sha256, "sha-256 of {}", fixture.text);
    }
}

#[test]
fn legacy_md5_digests_match_fixtures() {
    for fixture in fixtures() {
        let id = digest(&fixture.value, DigestAlg::Md5).unwrap();
        assert_eq!(id.to_hex(), fixture.md5, "md5 of {}", fixture.text);
    }
}

#[test]
fn bytes_and_text_never_collide() {
    let bytes = Value::bytes("hello");
    let text = Value::text("hello");
    assert_ne!(encode(&bytes).unwrap(), encode(&text).unwrap());
    assert_ne!(
        digest(&bytes, DigestAlg::Sha256).unwrap(),
        digest(&text, DigestAlg::Sha256).unwrap()
    );
}

#[test]
fn non_ascii_text_and_its_utf8_bytes() {
    let s = "\u{a1}\u{2122}\u{a3}\u{a2}\u{221e}\u{a7}\u{b6}\u{2022}\u{aa}\u{ba}";

    let text = Value::text(s);
    let text_lit = r"u'\xa1\u2122\xa3\xa2\u221e\xa7\xb6\u2022\xaa\xba'";
    assert_eq!(encode(&text).unwrap(), text_lit);
    assert_eq!(
        digest(&text, DigestAlg::Sha256).unwrap().to_hex(),
        "102c62a1344954e7b13d9e095981097fa0bb78f8de55f08f02ee24c8a4ce2663"
    );

    let bytes = Value::bytes(s.as_bytes());
    let bytes_lit =
        r"'\xc2\xa1\xe2\x84\xa2\xc2\xa3\xc2\xa2\xe2\x88\x9e\xc2\xa7\xc2\xb6\xe2\x80\xa2\xc2\xaa\xc2\xba'";
    assert_eq!(encode(&bytes).unwrap(), bytes_lit);
    assert_eq!(
        digest(&bytes, DigestAlg::Sha256).unwrap().to_hex(),
        "00215a72d7fb547a0bff833394007d3993636ef3bc7e47cadc8c80a8af7f2674"
    );
}

#[test]
fn quotes_and_nul() {
    let raw = "both quotes '\"\0 and junk";
    assert_eq!(
        encode(&Value::bytes(raw)).unwrap(),
        r#"'both quotes \'"\x00 and junk'"#
    );
    assert_eq!(
        encode(&Value::text(raw)).unwrap(),
        r#"u'both quotes \'"\x00 and junk'"#
    );
}

#[test]
fn integer_magnitude_is_the_identity() {
    let small = to_value(&42u8).unwrap();
    let wide = to_value(&42i128).unwrap();
    assert_eq!(encode(&small).unwrap(), encode(&wide).unwrap());
    assert_eq!(
        digest(&small, DigestAlg::Sha256).unwrap(),
        digest(&wide, DigestAlg::Sha256).unwrap()
    );
    assert_eq!(encode(&Value::from(1u64 << 32)).unwrap(), "4294967296");
    assert_eq!(encode(&Value::from(u64::MAX)).unwrap(), "18446744073709551615");
}

#[test]
fn decode_mixed_tuple() {
    assert_eq!(
        decode("(1, 'x', [2, 3])").unwrap(),
        Value::tuple([
            Value::from(1),
            Value::bytes("x"),
            Value::list([Value::from(2), Value::from(3)]),
        ])
    );
}

#[test]
fn list_key_is_rejected() {
    assert_eq!(
        canonicalize_key(&Value::list([Value::from(1)])),
        Err(CanonicalError::NonDeterministicKey {
            kind: ValueKind::List
        })
    );
}

#[test]
fn float_is_unsupported() {
    assert!(matches!(
        to_value(&2.5f64),
        Err(CanonicalError::UnsupportedType(_))
    ));
}
