use thiserror::Error;

/// Text shown whenever the backend rejects the caller's credential.
pub const UNAUTHORIZED_MESSAGE: &str = "User can't perform this action";

/// How a failed response is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 401/403: the credential is missing, invalid, or insufficient.
    Unauthorized,
    /// Anything else, including transport failures with no status at all.
    Other,
}

/// Transport-neutral failure returned by every API transport.
///
/// `status` is `None` when the request never produced a response (network
/// error, aborted fetch, request build failure).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn classify(&self) -> FailureClass {
        match self.status {
            Some(status) => classify_status(status),
            None => FailureClass::Other,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.classify() == FailureClass::Unauthorized
    }

    /// True when the server answered with a non-2xx status, as opposed to the
    /// request failing in transit or the body failing to decode.
    #[must_use]
    pub fn is_rejected_status(&self) -> bool {
        self.status.is_some_and(|status| !is_success_status(status))
    }
}

#[must_use]
pub fn classify_status(status: u16) -> FailureClass {
    match status {
        401 | 403 => FailureClass::Unauthorized,
        _ => FailureClass::Other,
    }
}

#[must_use]
pub fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_classify_as_unauthorized() {
        assert!(ApiError::http(401, "unauthorized").is_unauthorized());
        assert!(ApiError::http(403, "forbidden").is_unauthorized());
    }

    #[test]
    fn other_statuses_and_transport_errors_classify_as_other() {
        for status in [400, 404, 409, 422, 500, 503] {
            assert_eq!(ApiError::http(status, "nope").classify(), FailureClass::Other);
        }
        assert_eq!(
            ApiError::transport("connection refused").classify(),
            FailureClass::Other
        );
    }

    #[test]
    fn rejected_status_excludes_transport_and_decode_failures() {
        assert!(ApiError::http(500, "boom").is_rejected_status());
        assert!(!ApiError::http(200, "bad json").is_rejected_status());
        assert!(!ApiError::transport("offline").is_rejected_status());
    }
}
