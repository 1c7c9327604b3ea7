use crate::errors::DocError;

/// Convert a serde_json::Value that must be an object into a bson::Document.
pub fn json_value_to_bson_document(val: serde_json::Value) -> Result<bson::Document, DocError> {
    match val {
        serde_json::Value::Object(obj) => {
            bson::Document::try_from(obj).map_err(|e| DocError::Bson(e.to_string()))
        }
        other => Err(DocError::Bson(format!("expected JSON object, got {other}"))),
    }
}

/// Parse a JSON string into a bson::Document. The JSON must be a top-level object.
pub fn parse_json_to_bson_document(json: &str) -> Result<bson::Document, DocError> {
    let val: serde_json::Value = serde_json::from_str(json)?;
    json_value_to_bson_document(val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_to_bson_success() {
        let d = parse_json_to_bson_document("{\"a\":1,\"b\":\"x\",\"c\":{\"d\":[1,2]}}").unwrap();
        assert_eq!(d.get_i32("a").unwrap(), 1);
        assert_eq!(d.get_str("b").unwrap(), "x");
        assert_eq!(d.get_document("c").unwrap().get_array("d").unwrap().len(), 2);
    }

    #[test]
    fn json_to_bson_rejects_array() {
        let e = parse_json_to_bson_document("[1,2,3]").unwrap_err();
        assert!(matches!(e, DocError::Bson(_)));
    }

    #[test]
    fn json_to_bson_reports_syntax_errors() {
        let e = parse_json_to_bson_document("{\"a\":").unwrap_err();
        assert!(matches!(e, DocError::Json(_)));
    }
}
