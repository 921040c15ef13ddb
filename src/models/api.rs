use serde::{ Serialize, Deserialize };

/// Body of `POST /api/chat`. `message` is optional here so that an absent
/// field maps to a validation error rather than a decode failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReply {
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_rejects_unknown_fields() {
        assert!(serde_json::from_str::<ChatRequest>(r#"{"message":"hi","extra":1}"#).is_err());
    }

    #[test]
    fn chat_request_message_may_be_absent() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_none());
    }
}
