//! Unit tests for the streaming document decoder

#[cfg(test)]
mod tests {
    use crate::decode::decode_documents;
    use crate::error::ReconcileError;

    #[test]
    fn multi_document_blob_decodes_in_order() {
        let blob = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: first
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: second
";
        let documents: Vec<_> = decode_documents(blob)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].name().unwrap(), "first");
        assert_eq!(documents[1].name().unwrap(), "second");
    }

    #[test]
    fn empty_input_yields_no_documents() {
        assert_eq!(decode_documents("").count(), 0);
        assert_eq!(decode_documents("\n\n").count(), 0);
    }

    #[test]
    fn blank_segments_are_not_emitted() {
        // Leading separator, an empty document in the middle, and a
        // trailing separator must all disappear
        let blob = "\
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: only
---
---
";
        let documents: Vec<_> = decode_documents(blob)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name().unwrap(), "only");
    }

    #[test]
    fn trailing_whitespace_after_last_document_is_tolerated() {
        let blob = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: tail\n---\n   \n";
        let documents: Vec<_> = decode_documents(blob)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name().unwrap(), "tail");
    }

    #[test]
    fn single_json_document_is_accepted() {
        let blob = r#"{"apiVersion": "v1", "kind": "ConfigMap", "metadata": {"name": "from-json"}}"#;
        let documents: Vec<_> = decode_documents(blob)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name().unwrap(), "from-json");
        assert_eq!(documents[0].kind().unwrap(), "ConfigMap");
    }

    #[test]
    fn malformed_document_fails_with_its_position_and_fuses_the_stream() {
        // The unclosed flow mapping makes the second document malformed;
        // the first was already yielded and remains intact
        let blob = "kind: First\n---\n{ broken\n---\nkind: Third\n";
        let mut stream = decode_documents(blob);

        let first = stream.next().unwrap().unwrap();
        assert_eq!(first.kind().unwrap(), "First");

        let err = stream.next().unwrap().unwrap_err();
        assert!(matches!(err, ReconcileError::Decode { index: 2, .. }));

        // Fail-fast: nothing after the malformed document is yielded
        assert!(stream.next().is_none());
    }
}
