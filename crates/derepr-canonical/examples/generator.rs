use derepr_canonical::{decode, digest, encode, DigestAlg, Value};

fn main() {
    let samples = vec![
        Value::from(0),
        Value::from(1u64 << 32),
        Value::from(u64::MAX),
        Value::bytes("hello"),
        Value::text("hello"),
        Value::bytes("single'quote"),
        Value::text("double\"quote"),
        Value::bytes((0..=255).collect::<Vec<u8>>()),
        Value::tuple([Value::from(0), Value::from(1), Value::from(2)]),
        Value::tuple([]),
        Value::list((0..5).map(Value::from)),
        Value::mapping([
            (Value::bytes("a"), Value::from(1)),
            (Value::bytes("b"), Value::from(2)),
            (Value::bytes("list"), Value::list((0..5).map(Value::from))),
        ]),
        Value::tuple([
            Value::from(true),
            Value::from(false),
            Value::tuple([Value::from(1), Value::from(2), Value::Unit]),
        ]),
    ];

    for value in &samples {
        let text = match encode(value) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("encoding failed: {}", err);
                std::process::exit(1);
            }
        };
        println!("{}", text);
        match (decode(&text), digest(value, DigestAlg::Sha256)) {
            (Ok(back), Ok(id)) => {
                assert_eq!(&back, value);
                println!("  sha-256 {}", id);
            }
            (Err(err), _) | (_, Err(err)) => {
                eprintln!("round trip failed: {}", err);
                std::process::exit(1);
            }
        }
    }
}
