//! Journal store commands.

use crate::output;
use crate::path;
use derepr_canonical::{Canonicalizer, Value};
use derepr_store::{JournalBackend, LiteMap, ReadMode, ReprCodec, StoreOptions};
use tracing::debug;

pub type Map = LiteMap<JournalBackend, ReprCodec>;

pub fn open(
    journal: &str,
    permissive: bool,
    sync: bool,
    canonicalizer: Canonicalizer,
) -> Result<Map, Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(journal)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let options = StoreOptions {
        read_mode: if permissive {
            ReadMode::Permissive
        } else {
            ReadMode::Strict
        },
        sync,
    };
    let backend = JournalBackend::open(&journal_path, options).map_err(|e| {
        format!(
            "Failed to open journal file: {}: {}",
            path::sanitize_path_for_error(&journal_path),
            e
        )
    })?;
    Ok(LiteMap::new(backend, ReprCodec::new(canonicalizer)))
}

fn parse(text: &str, what: &str, canonicalizer: Canonicalizer) -> Result<Value, String> {
    canonicalizer
        .decode(text)
        .map_err(|e| format!("Invalid {}: {}", what, e))
}

pub fn put(
    map: &Map,
    key: &str,
    value: &str,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = parse(key, "key", canonicalizer)?;
    let value = parse(value, "value", canonicalizer)?;
    map.insert(&key, &value)?;
    debug!(key = %canonicalizer.canonicalize_key(&key)?, "stored entry");
    Ok(())
}

pub fn get(
    map: &Map,
    key: &str,
    json: bool,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = parse(key, "key", canonicalizer)?;
    let value = map.get(&key)?;
    if json {
        println!("{}", output::format_json(&value)?);
    } else {
        println!("{}", canonicalizer.encode(&value)?);
    }
    Ok(())
}

pub fn delete(
    map: &Map,
    key: &str,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = parse(key, "key", canonicalizer)?;
    map.remove(&key)?;
    Ok(())
}

pub fn list(
    map: &Map,
    json: bool,
    canonicalizer: Canonicalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    if !json {
        output::print_table_header();
    }
    for (key, value) in map.entries()? {
        let key_text = canonicalizer.canonicalize_key(&key)?;
        if json {
            println!("{}", output::format_json_line(&key_text, &value)?);
        } else {
            println!(
                "{}",
                output::format_table_row(&key_text, &canonicalizer.encode(&value)?)
            );
        }
    }
    Ok(())
}

pub fn count(map: &Map) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", map.len()?);
    Ok(())
}

pub fn compact(map: &Map) -> Result<(), Box<dyn std::error::Error>> {
    let before = std::fs::metadata(map.backend().path())?.len();
    map.backend().compact()?;
    let after = std::fs::metadata(map.backend().path())?.len();
    println!("compacted {} -> {} bytes", before, after);
    Ok(())
}
