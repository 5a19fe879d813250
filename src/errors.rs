use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("API Key is missing.")] MissingCredential,
    #[error("authentication failed: {0}")] Auth(String),
    #[error("network error: {0}")] Network(String),
    #[error("API error ({status}): {message}")] Api { status: u16, message: String },
    #[error("could not parse lesson plan: {0}")] Parse(String),
}

impl From<reqwest::Error> for PlannerError {
    fn from(e: reqwest::Error) -> Self {
        PlannerError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_message_is_fixed() {
        assert_eq!(PlannerError::MissingCredential.to_string(), "API Key is missing.");
    }

    #[test]
    fn api_error_carries_status() {
        let e = PlannerError::Api { status: 429, message: "quota".into() };
        assert_eq!(e.to_string(), "API error (429): quota");
    }
}
