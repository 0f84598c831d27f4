//! Escape tables for the two string literal kinds.
//!
//! Bytes: printable ASCII is verbatim except `\` and `'`; tab, newline and
//! carriage return use their short escapes; every other byte is `\xhh`.
//!
//! Text: as bytes for code points below `0x100`, then `\uhhhh` up to the end
//! of the basic multilingual plane and `\Uhhhhhhhh` beyond it. Hex digits are
//! lowercase in both tables.

const HEX: &[u8; 16] = b"0123456789abcdef";

fn push_hex(out: &mut String, value: u32, width: u32) {
    for shift in (0..width).rev() {
        let nibble = (value >> (shift * 4)) & 0xf;
        out.push(HEX[nibble as usize] as char);
    }
}

/// Appends `'…'` for a byte string.
pub(crate) fn write_bytes_literal(bytes: &[u8], out: &mut String) {
    out.reserve(bytes.len() + 2);
    out.push('\'');
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                out.push_str("\\x");
                push_hex(out, u32::from(byte), 2);
            }
        }
    }
    out.push('\'');
}

/// Appends `u'…'` for a text string.
pub(crate) fn write_text_literal(text: &str, out: &mut String) {
    out.reserve(text.len() + 3);
    out.push_str("u'");
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' '..='~' => out.push(ch),
            _ => {
                let code = u32::from(ch);
                if code < 0x100 {
                    out.push_str("\\x");
                    push_hex(out, code, 2);
                } else if code < 0x1_0000 {
                    out.push_str("\\u");
                    push_hex(out, code, 4);
                } else {
                    out.push_str("\\U");
                    push_hex(out, code, 8);
                }
            }
        }
    }
    out.push('\'');
}
