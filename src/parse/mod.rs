//! CSV export parsing.
//!
//! The export's text encoding depends on the plugin version and site
//! settings: Shift_JIS (CP932) for Excel compatibility, or UTF-8 with or
//! without a BOM. Encodings are tried in a fixed order (BOM, UTF-8, CP932)
//! and the first strict decode wins.

use std::borrow::Cow;

use log::{debug, warn};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::models::{Record, Submissions};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings accepted for the export, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum TextEncoding {
    /// UTF-8 with a byte order mark; only tried when the BOM is present.
    Utf8Sig,
    /// Plain UTF-8. Tried before CP932: Shift_JIS accepts most UTF-8
    /// Japanese byte sequences as mojibake, the reverse almost never holds.
    Utf8,
    /// Windows-31J, the Shift_JIS variant Excel writes.
    Cp932,
}

impl TextEncoding {
    /// Decodes `bytes` strictly; `None` on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextEncoding::Utf8Sig => bytes.strip_prefix(UTF8_BOM).and_then(|rest| {
                encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(rest)
            }),
            TextEncoding::Cp932 => {
                encoding_rs::SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Utf8 => {
                encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }
}

/// Decodes the export with the first encoding that accepts it, falling back
/// to lossy UTF-8.
pub fn decode_export(bytes: &[u8]) -> (Cow<'_, str>, Option<TextEncoding>) {
    for encoding in TextEncoding::iter() {
        if let Some(text) = encoding.decode(bytes) {
            debug!("Decoded export as {:?}", encoding);
            return (text, Some(encoding));
        }
    }
    warn!("Export matches no known encoding, decoding as UTF-8 with replacement");
    (String::from_utf8_lossy(bytes), None)
}

/// Parses a CSV export into entries keyed by `ID`.
///
/// The first row is the header. Rows shorter than the header simply lack the
/// trailing columns; cells beyond the header are ignored. Rows with a
/// missing or empty `ID` are dropped, and a repeated `ID` keeps the last row.
pub fn parse_export(bytes: &[u8]) -> Submissions {
    let (text, _) = decode_export(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            warn!("Could not read CSV header: {}", e);
            return Submissions::new();
        }
    };

    let mut submissions = Submissions::new();
    for (row, result) in reader.records().enumerate() {
        let row_record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed CSV row {}: {}", row + 1, e);
                continue;
            }
        };
        let record = Record::from_fields(headers.iter().zip(row_record.iter()));
        match record.id() {
            Some(id) if !id.is_empty() => {
                submissions.insert(id.to_string(), record);
            }
            _ => debug!("Skipping CSV row {} without ID", row + 1),
        }
    }

    submissions
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\"ID\",\"post_date\",\"お名前\",\"お問い合わせ内容\"\r\n\
\"3\",\"2024-05-01 10:00:00\",\"山田太郎\",\"資料請求\"\r\n\
\"\",\"2024-05-02 10:00:00\",\"名無し\",\"IDなし\"\r\n\
\"6\",\"2024-05-03 10:00:00\",\"佐藤花子\",\"見積もり\r\nお願いします\"\r\n";

    fn shift_jis(s: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(s);
        assert!(!had_errors);
        bytes.into_owned()
    }

    fn utf8_sig(s: &str) -> Vec<u8> {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(s.as_bytes());
        bytes
    }

    #[test]
    fn test_parse_export_drops_empty_id() {
        let records = parse_export(&utf8_sig(SAMPLE));
        assert_eq!(records.len(), 2);
        assert!(records.contains_key("3"));
        assert!(records.contains_key("6"));
        assert_eq!(records["3"].get("お名前"), Some("山田太郎"));
        assert_eq!(
            records["6"].get("お問い合わせ内容"),
            Some("見積もり\r\nお願いします")
        );
    }

    #[test]
    fn test_encodings_yield_identical_records() {
        let from_sjis = parse_export(&shift_jis(SAMPLE));
        let from_bom = parse_export(&utf8_sig(SAMPLE));
        assert_eq!(from_sjis, from_bom);
        assert_eq!(from_sjis.len(), 2);
    }

    #[test]
    fn test_ascii_is_identical_in_every_encoding() {
        let csv = "ID,name\n1,alice\n2,bob\n";
        let plain = parse_export(csv.as_bytes());
        assert_eq!(plain, parse_export(&utf8_sig(csv)));
        assert_eq!(plain, parse_export(&shift_jis(csv)));
        assert_eq!(plain["2"].get("name"), Some("bob"));
    }

    #[test]
    fn test_decode_export_order() {
        assert_eq!(
            decode_export(&utf8_sig("ID")).1,
            Some(TextEncoding::Utf8Sig)
        );
        assert_eq!(
            decode_export(&shift_jis("お名前")).1,
            Some(TextEncoding::Cp932)
        );
        assert_eq!(decode_export(b"ID").1, Some(TextEncoding::Utf8));
        assert_eq!(
            decode_export("メールアドレス".as_bytes()).1,
            Some(TextEncoding::Utf8)
        );
    }

    #[test]
    fn test_japanese_header_identical_in_every_encoding() {
        let csv = "ID,メールアドレス,電話番号\n2,a@example.com,0312345678\n";
        let plain = parse_export(csv.as_bytes());
        assert_eq!(plain, parse_export(&utf8_sig(csv)));
        assert_eq!(plain, parse_export(&shift_jis(csv)));
        assert_eq!(plain["2"].get("メールアドレス"), Some("a@example.com"));
        assert_eq!(plain["2"].get("電話番号"), Some("0312345678"));
    }

    #[test]
    fn test_utf8_without_bom_matches_sample() {
        let from_plain = parse_export(SAMPLE.as_bytes());
        assert_eq!(from_plain, parse_export(&utf8_sig(SAMPLE)));
        assert_eq!(from_plain["3"].get("お名前"), Some("山田太郎"));
    }

    #[test]
    fn test_decode_export_lossy_fallback() {
        // 0xFF is invalid in both Shift_JIS and UTF-8
        let (text, encoding) = decode_export(b"ID\xFF");
        assert_eq!(encoding, None);
        assert_eq!(text, "ID\u{FFFD}");
    }

    #[test]
    fn test_short_and_long_rows() {
        let csv = "ID,a,b\n1,x\n2,y,z,extra\n";
        let records = parse_export(csv.as_bytes());
        assert_eq!(records["1"].get("a"), Some("x"));
        assert_eq!(records["1"].get("b"), None);
        assert_eq!(records["2"].get("b"), Some("z"));
        assert_eq!(records["2"].len(), 3);
    }

    #[test]
    fn test_missing_id_column() {
        let records = parse_export(b"name,email\nalice,a@example.com\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_repeated_id_keeps_last_row() {
        let records = parse_export(b"ID,v\n1,old\n1,new\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records["1"].get("v"), Some("new"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_export(b"").is_empty());
    }
}
