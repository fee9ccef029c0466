use serde::{Deserialize, Serialize};

/// Outcome of one extraction request.
///
/// This is the value carried back across the extraction boundary, so it is
/// plain serializable data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ExtractionResult {
    Success {
        title: String,
        /// Well-formed HTML fragment
        content: String,
    },
    Failure {
        message: String,
    },
}

impl ExtractionResult {
    pub fn success(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Success {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(ExtractionResult::success("T", "<p>x</p>")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "outcome": "success", "title": "T", "content": "<p>x</p>" })
        );

        let json = serde_json::to_value(ExtractionResult::failure("gone")).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "failure", "message": "gone" }));
    }
}
