//! Line-delimited JSON decoding.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

use crate::error::SourceError;
use crate::record::RawRecord;

/// Buffer size for `BufReader` (64KB for optimal performance on large files)
const BUFFER_SIZE: usize = 64 * 1024;

/// Records decoded from one source, in source order.
#[derive(Debug, Default)]
pub struct Decoded {
    pub records: Vec<RawRecord>,
    /// Non-blank lines that were not a JSON object.
    pub malformed_lines: usize,
}

/// Decode every line of `reader`.
///
/// Invalid UTF-8 is replaced rather than rejected. Blank lines are ignored;
/// lines that are not a JSON object are skipped and counted. A read error
/// mid-stream is reported so the caller can treat the source as unreadable.
pub fn decode_reader<R: BufRead>(reader: R) -> std::io::Result<Decoded> {
    let mut decoded = Decoded::default();

    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => decoded.records.push(RawRecord::from_object(map)),
            Ok(_) => {
                tracing::trace!("skipping non-object JSON line");
                decoded.malformed_lines += 1;
            }
            Err(e) => {
                tracing::trace!(error = %e, "skipping malformed JSON line");
                decoded.malformed_lines += 1;
            }
        }
    }

    Ok(decoded)
}

/// Open and decode a session file.
pub fn read_source(path: &Path) -> Result<Decoded, SourceError> {
    let unreadable = |source| SourceError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let decoded = decode_reader(reader).map_err(unreadable)?;

    tracing::debug!(
        path = ?path,
        records = decoded.records.len(),
        malformed = decoded.malformed_lines,
        "decoded session file"
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_preserves_order_and_skips_bad_lines() {
        let input = concat!(
            r#"{"type":"user","uuid":"u1"}"#,
            "\n",
            "not json\n",
            "\n",
            "   \n",
            r#"[1,2,3]"#,
            "\n",
            r#"{"type":"assistant","uuid":"a1"}"#,
            "\n",
        );

        let decoded = decode_reader(input.as_bytes()).unwrap();

        let uuids: Vec<_> = decoded
            .records
            .iter()
            .map(|r| r.uuid.as_deref().unwrap())
            .collect();
        assert_eq!(uuids, vec!["u1", "a1"]);
        assert_eq!(decoded.malformed_lines, 2);
    }

    #[test]
    fn test_decode_incomplete_last_line() {
        let input = concat!(
            r#"{"type":"user","uuid":"u1"}"#,
            "\n",
            r#"{"type":"user","message":{"content":"incompl"#,
        );

        let decoded = decode_reader(input.as_bytes()).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.malformed_lines, 1);
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        let mut input = br#"{"type":"user","message":{"content":"caf"#.to_vec();
        input.push(0xff);
        input.extend_from_slice(br#""}}"#);
        input.push(b'\n');

        let decoded = decode_reader(input.as_slice()).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.malformed_lines, 0);
    }

    #[test]
    fn test_decode_handles_crlf_line_endings() {
        let input = "{\"type\":\"user\"}\r\n{\"type\":\"system\"}\r\n";
        let decoded = decode_reader(input.as_bytes()).unwrap();
        assert_eq!(decoded.records.len(), 2);
    }

    #[test]
    fn test_read_source_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type":"user","timestamp":"2026-01-29T10:00:00Z"}}"#).unwrap();
        writeln!(file, "garbage").unwrap();

        let decoded = read_source(file.path()).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.malformed_lines, 1);
    }

    #[test]
    fn test_read_source_missing_file_is_unreadable() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.jsonl");

        let err = read_source(&path).unwrap_err();
        assert!(matches!(err, SourceError::Unreadable { .. }));
        assert_eq!(err.path(), path.as_path());
    }
}
