use dishdeck_search::{SearchDomainError, SearchError};
use thiserror::Error;

use crate::location::LocationError;

const CONNECTION_MESSAGE: &str = "Please check your internet connection and try again.";
const DECODING_MESSAGE: &str =
    "Something went wrong while processing the data. Please try again later.";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Anything that can end a fetch chain.
#[derive(Error, Debug)]
pub enum BrowseError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl BrowseError {
    /// The sentence shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Location(err) => location_message(*err).to_string(),
            Self::Search(SearchError::Domain(err)) => domain_message(err),
            Self::Search(err) if err.is_network() => CONNECTION_MESSAGE.to_string(),
            Self::Search(err) if err.is_decoding() => DECODING_MESSAGE.to_string(),
            Self::Search(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}

fn location_message(err: LocationError) -> &'static str {
    match err {
        LocationError::PermissionDenied => {
            "Allow location services for the app in settings and try again."
        }
        LocationError::Timeout => "Retrieving your location is taking too long. Please try again later.",
        LocationError::Unknown => "Unknown error while getting location. Please try again later.",
        LocationError::NoNearbyResults => "No nearby restaurants found. Please try again later.",
        LocationError::LocationUnknown => "Unable to retrieve location. Please try again later.",
    }
}

fn domain_message(err: &SearchDomainError) -> String {
    match err {
        SearchDomainError::InvalidRequest => "Request was invalid.".to_string(),
        SearchDomainError::Unauthorized
        | SearchDomainError::InvalidToken
        | SearchDomainError::AuthorizationError
        | SearchDomainError::Validation => {
            "Unable to fulfill request, check authorization and try again.".to_string()
        }
        SearchDomainError::NotFound => "Resource not found.".to_string(),
        SearchDomainError::PayloadTooLarge => "Request was too large, try a smaller radius.".to_string(),
        SearchDomainError::RateLimited => "Too many frequent requests, try again later.".to_string(),
        SearchDomainError::InternalServerError => "Internal server error, try again later.".to_string(),
        SearchDomainError::ServiceUnavailable => "Service unavailable, try again later.".to_string(),
        SearchDomainError::Unknown(code) => format!("Unknown error with code: {code}"),
    }
}

#[cfg(test)]
mod tests {
    use dishdeck_search::NetworkError;

    use super::*;

    #[test]
    fn test_location_messages() {
        let message = BrowseError::from(LocationError::PermissionDenied).user_message();
        assert!(message.contains("Allow location services"));

        let message = BrowseError::from(LocationError::NoNearbyResults).user_message();
        assert!(message.starts_with("No nearby restaurants"));
    }

    #[test]
    fn test_domain_messages() {
        let err = BrowseError::from(SearchError::from(SearchDomainError::RateLimited));
        assert_eq!(
            err.user_message(),
            "Too many frequent requests, try again later."
        );

        let err = BrowseError::from(SearchError::from(SearchDomainError::InvalidToken));
        assert!(err.user_message().contains("check authorization"));

        let err = BrowseError::from(SearchError::from(SearchDomainError::Unknown(
            "ODD_CODE".to_string(),
        )));
        assert_eq!(err.user_message(), "Unknown error with code: ODD_CODE");
    }

    #[test]
    fn test_generic_messages() {
        let err = BrowseError::from(SearchError::from(NetworkError::HttpStatus(502)));
        assert_eq!(err.user_message(), CONNECTION_MESSAGE);

        let decoding = serde_json::from_str::<u8>("x").unwrap_err();
        let err = BrowseError::from(SearchError::from(decoding));
        assert_eq!(err.user_message(), DECODING_MESSAGE);

        let err = BrowseError::from(SearchError::Config("missing key".to_string()));
        assert_eq!(err.user_message(), UNEXPECTED_MESSAGE);
    }
}
