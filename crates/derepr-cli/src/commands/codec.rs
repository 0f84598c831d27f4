//! Encode, decode, digest and key commands.

use super::read_input;
use crate::output;
use derepr_canonical::{Canonicalizer, DigestAlg, Value};

fn read_value(
    input: Option<String>,
    json: bool,
    canonicalizer: Canonicalizer,
) -> Result<Value, Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    if json {
        let doc: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| format!("Invalid JSON: {}", e))?;
        Ok(canonicalizer.from_json(&doc)?)
    } else {
        Ok(canonicalizer
            .decode(&text)
            .map_err(|e| format!("Invalid literal: {}", e))?)
    }
}

pub fn encode(
    input: Option<String>,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_value(input, true, canonicalizer)?;
    println!("{}", canonicalizer.encode(&value)?);
    Ok(())
}

pub fn decode(
    input: Option<String>,
    json: bool,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_value(input, false, canonicalizer)?;
    if json {
        println!("{}", output::format_json(&value)?);
    } else {
        println!("{}", canonicalizer.encode(&value)?);
    }
    Ok(())
}

pub fn digest(
    input: Option<String>,
    alg: DigestAlg,
    from_json: bool,
    b64: bool,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_value(input, from_json, canonicalizer)?;
    let digest = canonicalizer.digest(&value, alg)?;
    if b64 {
        println!("{}", digest.to_b64());
    } else {
        println!("{}", digest.to_hex());
    }
    Ok(())
}

pub fn key(
    input: Option<String>,
    from_json: bool,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_value(input, from_json, canonicalizer)?;
    println!("{}", canonicalizer.canonicalize_key(&value)?);
    Ok(())
}
