use serde::{Deserialize, Serialize};

/// Envelope for every successful JSON response: `{success: true, data?, message}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope without a `data` field.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shapes() {
        let with_data = serde_json::to_value(ApiResponse::ok(json!({"total": 3}), "3 produit(s) en base"))
            .unwrap();
        assert_eq!(
            with_data,
            json!({"success": true, "data": {"total": 3}, "message": "3 produit(s) en base"})
        );

        let without_data = serde_json::to_value(ApiResponse::message("supprimé")).unwrap();
        assert_eq!(without_data, json!({"success": true, "message": "supprimé"}));
    }
}
