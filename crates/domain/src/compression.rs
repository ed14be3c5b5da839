//! Per-record symbol table used to shrink repeated substrings inside a single
//! `Resource`. A compressed byte with the high bit set is an
//! index into the table; everything else is written out literally.

use crate::errors::DecodeError;

/// Dictionary entries shorter than this are never worth indexing.
const MIN_WORD_LEN: usize = 3;
/// Hard cap on the number of dictionary entries (7-bit index, and the wire
/// format reserves index 0x7F as a valid entry too, so this is the full 127).
const MAX_SYMBOLS: usize = 127;

/// A `(is_word, slice)` fragment produced by [`split_parts`].
type Part<'a> = (bool, &'a str);

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Splits `s` into character-class runs, special-casing the literal `://`
/// substring so URLs compress well even though `:` and `/` aren't word bytes.
fn split_parts(s: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if s[i..].starts_with("://") {
            parts.push((true, &s[i..i + 3]));
            i += 3;
            continue;
        }
        let want_word = is_word_byte(bytes[i]);
        let start = i;
        i += 1;
        while i < bytes.len() && !s[i..].starts_with("://") && is_word_byte(bytes[i]) == want_word
        {
            i += 1;
        }
        let slice = &s[start..i];
        let is_word = want_word && slice.len() >= MIN_WORD_LEN;
        parts.push((is_word, slice));
    }
    parts
}

fn is_valid_literal_byte(b: u8) -> bool {
    matches!(b, 0x09 | 0x0A | 0x0D) || (0x20..=0x7E).contains(&b)
}

/// A per-`Resource` dictionary of ≤127 ASCII substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionTable {
    symbols: Vec<String>,
}

impl CompressionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table by scanning every string that will be compressed with
    /// it, adding indexable words in first-seen order until the table fills.
    pub fn build<'a, I>(strings: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut symbols: Vec<String> = Vec::new();
        for s in strings {
            for (is_word, slice) in split_parts(s) {
                if !is_word || symbols.len() >= MAX_SYMBOLS {
                    continue;
                }
                if !symbols.iter().any(|w| w == slice) {
                    symbols.push(slice.to_string());
                }
            }
        }
        Self { symbols }
    }

    pub fn from_symbols(symbols: Vec<String>) -> Result<Self, DecodeError> {
        if symbols.len() > MAX_SYMBOLS {
            return Err(DecodeError::TooManySymbols(symbols.len()));
        }
        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn index_of(&self, word: &str) -> Option<u8> {
        self.symbols.iter().position(|w| w == word).map(|i| i as u8)
    }

    /// Byte length a compressed `s` would take, including its length prefix.
    pub fn compressed_len(&self, s: &str) -> Result<usize, DecodeError> {
        let body_len = self.compress_body(s)?.len();
        Ok(1 + body_len)
    }

    fn compress_body(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        let mut body = Vec::with_capacity(s.len());
        for (is_word, slice) in split_parts(s) {
            if is_word {
                if let Some(idx) = self.index_of(slice) {
                    body.push(0x80 | idx);
                    continue;
                }
            }
            body.extend_from_slice(slice.as_bytes());
        }
        if body.len() > 255 {
            return Err(DecodeError::FieldTooLarge {
                field: "compressed string",
                len: body.len(),
                limit: 255,
            });
        }
        Ok(body)
    }

    /// Appends the length-prefixed compressed encoding of `s` to `out`.
    pub fn write_string(&self, s: &str, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        let body = self.compress_body(s)?;
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        Ok(())
    }

    /// Reads a length-prefixed compressed string from `buf`, returning the
    /// decoded string and the number of bytes consumed.
    pub fn read_string(&self, buf: &[u8]) -> Result<(String, usize), DecodeError> {
        let len = *buf.first().ok_or(DecodeError::Truncated("string length"))? as usize;
        let body = buf
            .get(1..1 + len)
            .ok_or(DecodeError::Truncated("string body"))?;

        let mut out = String::with_capacity(len);
        let mut i = 0;
        while i < body.len() {
            let b = body[i];
            i += 1;
            if b & 0x80 != 0 {
                let idx = (b & 0x7F) as usize;
                let symbol = self.symbols.get(idx).ok_or(DecodeError::BadSymbolIndex {
                    index: b,
                    table_len: self.symbols.len(),
                })?;
                out.push_str(symbol);
            } else {
                if !is_valid_literal_byte(b) {
                    return Err(DecodeError::NonPrintable(b));
                }
                out.push(b as char);
            }
        }
        if out.len() > 255 {
            return Err(DecodeError::StringTooLarge(out.len()));
        }
        Ok((out, 1 + len))
    }

    /// Writes the `u8 count` + `(u8 length, ASCII bytes)*` symbol table
    /// preamble.
    pub fn encode_table(&self) -> Result<Vec<u8>, DecodeError> {
        if self.symbols.len() > MAX_SYMBOLS {
            return Err(DecodeError::TooManySymbols(self.symbols.len()));
        }
        let mut out = Vec::with_capacity(1 + self.symbols.len() * 8);
        out.push(self.symbols.len() as u8);
        for sym in &self.symbols {
            if sym.len() > 255 {
                return Err(DecodeError::FieldTooLarge {
                    field: "symbol",
                    len: sym.len(),
                    limit: 255,
                });
            }
            for &b in sym.as_bytes() {
                if !is_valid_literal_byte(b) {
                    return Err(DecodeError::NonPrintable(b));
                }
            }
            out.push(sym.len() as u8);
            out.extend_from_slice(sym.as_bytes());
        }
        Ok(out)
    }

    /// Reads the symbol table preamble, returning the table and bytes consumed.
    pub fn decode_table(buf: &[u8]) -> Result<(Self, usize), DecodeError> {
        let count = *buf.first().ok_or(DecodeError::Truncated("symbol count"))? as usize;
        if count > MAX_SYMBOLS {
            return Err(DecodeError::TooManySymbols(count));
        }
        let mut pos = 1;
        let mut symbols = Vec::with_capacity(count);
        for _ in 0..count {
            let len = *buf.get(pos).ok_or(DecodeError::Truncated("symbol length"))? as usize;
            pos += 1;
            let slice = buf
                .get(pos..pos + len)
                .ok_or(DecodeError::Truncated("symbol bytes"))?;
            for &b in slice {
                if !is_valid_literal_byte(b) {
                    return Err(DecodeError::NonPrintable(b));
                }
            }
            symbols.push(String::from_utf8_lossy(slice).into_owned());
            pos += len;
        }
        Ok((Self { symbols }, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_demotes_short_runs() {
        let parts = split_parts("go to http://example.com now");
        let words: Vec<&str> = parts
            .iter()
            .filter(|(is_word, _)| *is_word)
            .map(|(_, s)| *s)
            .collect();
        assert!(words.contains(&"http"));
        assert!(words.contains(&"://"));
        assert!(words.contains(&"example"));
        assert!(words.contains(&"com"));
        // "go" and "to" and "now" are < 3 chars or short, so not promoted... "now" is 3 chars though.
        assert!(!words.contains(&"go"));
    }

    #[test]
    fn round_trips_through_a_shared_table() {
        let s = "http://example.com/http://example.com";
        let table = CompressionTable::build([s]);
        let mut buf = Vec::new();
        table.write_string(s, &mut buf).unwrap();
        let (decoded, consumed) = table.read_string(&buf).unwrap();
        assert_eq!(decoded, s);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn rejects_del_byte() {
        let table = CompressionTable::empty();
        let mut buf = vec![1u8, 0x7F];
        // Manually craft: length=1, body=[0x7F]
        buf[0] = 1;
        assert_eq!(
            table.read_string(&buf),
            Err(DecodeError::NonPrintable(0x7F))
        );
    }

    #[test]
    fn table_round_trips() {
        let table = CompressionTable::build(["one two three four"]);
        let encoded = table.encode_table().unwrap();
        let (decoded, consumed) = CompressionTable::decode_table(&encoded).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn bad_symbol_index_is_rejected() {
        let table = CompressionTable::empty();
        let buf = [1u8, 0x80];
        assert_eq!(
            table.read_string(&buf),
            Err(DecodeError::BadSymbolIndex {
                index: 0x80,
                table_len: 0
            })
        );
    }
}
