// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Decoding and encoding of `---` separated manifest streams.

use crate::constants::stream::DOCUMENT_SEPARATOR;
use crate::error::{OutfitterError, Result};
use crate::manifest::document::Document;
use crate::manifest::value::Value;

/// Split a stream into its raw document segments.
///
/// A separator is a line starting with `---` followed by nothing but
/// whitespace or a comment. Segments with no content are dropped, so leading,
/// trailing and consecutive separators are harmless.
pub fn split_documents(stream: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in stream.split_inclusive('\n') {
        if is_separator(line) {
            segments.push(&stream[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    segments.push(&stream[start..]);

    segments.into_iter().filter(|s| has_content(s)).collect()
}

fn is_separator(line: &str) -> bool {
    let Some(rest) = line.trim_end().strip_prefix(DOCUMENT_SEPARATOR) else {
        return false;
    };
    rest.is_empty() || (rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with('#'))
}

fn has_content(segment: &str) -> bool {
    segment.lines().any(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !trimmed.starts_with('#')
    })
}

/// Decode every non-empty document in the stream, in order.
pub fn decode(stream: &str) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for (index, segment) in split_documents(stream).into_iter().enumerate() {
        let value: Value = serde_yaml::from_str(segment)
            .map_err(|source| OutfitterError::ManifestDecode { index, source })?;
        // A document consisting only of `~` or `null` carries no object
        if value.is_null() {
            continue;
        }
        documents.push(Document::new(value));
    }
    Ok(documents)
}

/// Encode documents back into a single stream joined by separators.
pub fn encode(documents: &[Document]) -> Result<String> {
    let mut out = String::new();
    for (i, document) in documents.iter().enumerate() {
        if i > 0 {
            out.push_str(DOCUMENT_SEPARATOR);
            out.push('\n');
        }
        let rendered = serde_yaml::to_string(document).map_err(OutfitterError::ManifestEncode)?;
        out.push_str(&rendered);
        if !rendered.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skips_empty_segments() {
        let stream = "---\n\n---\nkind: A\n---\n---\n  \nkind: B\n---\n";
        let segments = split_documents(stream);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].contains("kind: A"));
        assert!(segments[1].contains("kind: B"));
    }

    #[test]
    fn test_split_empty_stream() {
        assert!(split_documents("").is_empty());
        assert!(split_documents("\n\n---\n").is_empty());
    }

    #[test]
    fn test_split_handles_separator_with_comment() {
        let stream = "kind: A\n--- # Source: chart/templates/b.yaml\nkind: B\n";
        assert_eq!(split_documents(stream).len(), 2);
    }

    #[test]
    fn test_split_ignores_separator_inside_value() {
        let stream = "kind: A\ndata:\n  text: |\n    ---x\n";
        assert_eq!(split_documents(stream).len(), 1);
    }

    #[test]
    fn test_split_comment_only_segment_is_skipped() {
        let stream = "# Source: chart/templates/empty.yaml\n---\nkind: A\n";
        assert_eq!(split_documents(stream).len(), 1);
    }

    #[test]
    fn test_split_without_trailing_newline() {
        let stream = "kind: A\n---\nkind: B";
        let segments = split_documents(stream);
        assert_eq!(segments, vec!["kind: A\n", "kind: B"]);
    }

    #[test]
    fn test_decode_skips_null_documents() {
        let docs = decode("---\n~\n---\nkind: A\nmetadata:\n  name: a\n").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name(), "a");
    }

    #[test]
    fn test_decode_reports_failing_index() {
        let err = decode("kind: A\n---\nkind: [unclosed\n").unwrap_err();
        assert!(matches!(err, OutfitterError::ManifestDecode { index: 1, .. }));
    }

    #[test]
    fn test_encode_round_trip() {
        let stream = "kind: A\nmetadata:\n  name: a\n---\nkind: B\nmetadata:\n  name: b\n";
        let docs = decode(stream).unwrap();
        let encoded = encode(&docs).unwrap();
        assert_eq!(encoded, stream);
        assert_eq!(decode(&encoded).unwrap(), docs);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap(), "");
    }
}
