use serde_json::Value;
use starload_core::Batch;

use crate::error::ExtractError;

/// Parse a JSON document into a raw batch.
///
/// Accepts an array of records, a column-oriented object
/// (`{"column": {"0": value}}`) or a single record.
pub fn parse_json_batch(value: &Value) -> Result<Batch, ExtractError> {
    match value {
        Value::Array(records) => Ok(Batch::from_json_records(records)?),
        Value::Object(object) if !object.is_empty() && object.values().all(Value::is_object) => {
            Ok(Batch::from_json_columns(object)?)
        }
        Value::Object(_) => Ok(Batch::from_json_records(std::slice::from_ref(value))?),
        other => Err(ExtractError::UnexpectedPayload(format!(
            "expected a JSON array or object, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use starload_core::CellValue;

    #[test]
    fn column_oriented_documents_are_pivoted() {
        let batch = parse_json_batch(&json!({
            "timestamp": {"0": "22:00:06", "1": "17:24:46"},
            "month": {"0": "9", "1": "2"}
        }))
        .expect("batch");
        assert_eq!(batch.columns(), ["timestamp", "month"]);
        assert_eq!(batch.cell(1, "timestamp"), Some(&CellValue::text("17:24:46")));
    }

    #[test]
    fn scalar_documents_are_rejected() {
        assert!(matches!(
            parse_json_batch(&json!(42)),
            Err(ExtractError::UnexpectedPayload(_))
        ));
    }
}
