//! Boundary envelope
//!
//! Every [`Engine`](crate::engine::Engine) operation answers with a
//! [`Response`]. Errors are flattened to a short message here; store details
//! go to the log instead of the caller.

use serde::Serialize;
use tracing::{debug, error};

use crate::error::{ErrorKind, LedgerError, LedgerResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failure carrying `message` as is
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn failure(err: &LedgerError) -> Self {
        match err.kind() {
            ErrorKind::Store => error!(error = %err, "ledger storage failure"),
            kind => debug!(?kind, error = %err, "request rejected"),
        }
        Self::error(err.user_message())
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(message)) => Err(message),
            (None, None) => Err("empty response".to_string()),
        }
    }
}

impl<T> From<LedgerResult<T>> for Response<T> {
    fn from(result: LedgerResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_ok_envelope() {
        let response: Response<u32> = Ok(7).into();
        assert!(response.success);
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"success":true,"data":7}"#);
    }

    #[test]
    fn test_validation_message_is_kept() {
        let response: Response<()> = Err(LedgerError::from(ValidationError::MissingCategory)).into();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("category required"));
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"success":false,"error":"category required"}"#
        );
    }

    #[test]
    fn test_store_details_are_hidden() {
        let err = LedgerError::Storage("Failed to write /home/ana/.config/ahorra: EACCES".into());
        let response = Response::<()>::failure(&err);
        assert_eq!(response.error.as_deref(), Some("could not access ledger storage"));
        assert_eq!(response.into_result(), Err("could not access ledger storage".to_string()));
    }
}
