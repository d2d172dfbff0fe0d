//! Outbound envelopes: the table payload and the error body.

use crate::error::DtError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A result row keyed by UI field, in column declaration order. SQL NULL is `None`.
pub type RowObject = IndexMap<String, Option<String>>;

/// The response the widget expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub draw: i64,
    /// Rows before search filtering.
    pub records_total: i64,
    /// Rows after search filtering, before paging.
    pub records_filtered: i64,
    pub data: Vec<RowObject>,
}

/// `{"error": "..."}`, sent instead of [`Output`] when a request cannot be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&DtError> for ErrorBody {
    fn from(err: &DtError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl From<DtError> for ErrorBody {
    fn from(err: DtError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_uses_widget_field_names() {
        let mut row = RowObject::new();
        row.insert("name".into(), Some("Ann".into()));
        row.insert("note".into(), None);
        let out = Output {
            draw: 2,
            records_total: 10,
            records_filtered: 1,
            data: vec![row],
        };
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({
                "draw": 2,
                "recordsTotal": 10,
                "recordsFiltered": 1,
                "data": [{"name": "Ann", "note": null}]
            })
        );
    }

    #[test]
    fn row_keys_keep_declaration_order() {
        let mut row = RowObject::new();
        row.insert("z".into(), Some("1".into()));
        row.insert("a".into(), Some("2".into()));
        let text = serde_json::to_string(&row).unwrap();
        assert_eq!(text, r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorBody::from(DtError::unknown_column("UI field 'x'"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "Unknown column: UI field 'x'"})
        );
    }
}
