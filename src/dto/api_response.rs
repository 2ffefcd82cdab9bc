use serde::Serialize;

// Envelope for successful responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            count: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// List payload with its `count`
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(data.len()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_envelope_carries_count() {
        let body = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2, 3], "count": 3 }));
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Visitor deleted")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Visitor deleted" }));
    }
}
