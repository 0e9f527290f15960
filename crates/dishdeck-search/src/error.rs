use thiserror::Error;
pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search service error: {0}")]
    Domain(#[from] SearchDomainError),
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[cfg(feature = "yelp")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Decoding error: {0}")]
    Decoding(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// True when the failure happened before a usable response arrived
    /// (connect failure, request timeout, non-2xx status without a domain code).
    #[must_use]
    pub fn is_network(&self) -> bool {
        match self {
            Self::Network(_) => true,
            #[cfg(feature = "yelp")]
            Self::Http(err) => !err.is_decode(),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_decoding(&self) -> bool {
        match self {
            Self::Decoding(_) => true,
            #[cfg(feature = "yelp")]
            Self::Http(err) => err.is_decode(),
            _ => false,
        }
    }
}

/// Errors reported by the search service itself, keyed by its error code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchDomainError {
    #[error("Request was invalid")]
    InvalidRequest,
    #[error("API key is not authorized")]
    Unauthorized,
    #[error("Access token is invalid")]
    InvalidToken,
    #[error("Authorization error")]
    AuthorizationError,
    #[error("Resource not found")]
    NotFound,
    #[error("Request payload too large")]
    PayloadTooLarge,
    #[error("Too many requests per second")]
    RateLimited,
    #[error("Internal server error")]
    InternalServerError,
    #[error("Service unavailable")]
    ServiceUnavailable,
    #[error("Validation error")]
    Validation,
    #[error("Unknown error with code: {0}")]
    Unknown(String),
}

impl SearchDomainError {
    /// Map a server-provided error code, falling back to [`Self::Unknown`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "INVALID_REQUEST" => Self::InvalidRequest,
            "UNAUTHORIZED_API_KEY" => Self::Unauthorized,
            "TOKEN_INVALID" => Self::InvalidToken,
            "AUTHORIZATION_ERROR" => Self::AuthorizationError,
            "NOT_FOUND" => Self::NotFound,
            "PAYLOAD_TOO_LARGE" => Self::PayloadTooLarge,
            "TOO_MANY_REQUESTS_PER_SECOND" => Self::RateLimited,
            "INTERNAL_ERROR" => Self::InternalServerError,
            "SERVICE_UNAVAILABLE" => Self::ServiceUnavailable,
            "VALIDATION_ERROR" => Self::Validation,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Map a bare HTTP status for responses that carry no error body.
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        Some(match status {
            400 => Self::InvalidRequest,
            401 => Self::Unauthorized,
            403 => Self::AuthorizationError,
            404 => Self::NotFound,
            413 => Self::PayloadTooLarge,
            429 => Self::RateLimited,
            500 => Self::InternalServerError,
            503 => Self::ServiceUnavailable,
            _ => return None,
        })
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Request failed with status code: {0}")]
    HttpStatus(u16),
}

/// Failure to parse a wire tag such as a sort key or category.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(
            SearchDomainError::from_code("NOT_FOUND"),
            SearchDomainError::NotFound
        );
        assert_eq!(
            SearchDomainError::from_code("TOO_MANY_REQUESTS_PER_SECOND"),
            SearchDomainError::RateLimited
        );
        assert_eq!(
            SearchDomainError::from_code("TOKEN_INVALID"),
            SearchDomainError::InvalidToken
        );
        assert_eq!(
            SearchDomainError::from_code("VALIDATION_ERROR"),
            SearchDomainError::Validation
        );
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        assert_eq!(
            SearchDomainError::from_code("BUSINESS_UNAVAILABLE"),
            SearchDomainError::Unknown("BUSINESS_UNAVAILABLE".to_string())
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SearchDomainError::from_status(429),
            Some(SearchDomainError::RateLimited)
        );
        assert_eq!(
            SearchDomainError::from_status(500),
            Some(SearchDomainError::InternalServerError)
        );
        assert_eq!(SearchDomainError::from_status(502), None);
    }

    #[test]
    fn test_error_classification() {
        let err: SearchError = NetworkError::HttpStatus(502).into();
        assert!(err.is_network());
        assert!(!err.is_decoding());

        let err: SearchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_decoding());
        assert!(!err.is_network());

        let err: SearchError = SearchDomainError::NotFound.into();
        assert!(!err.is_network());
    }
}
