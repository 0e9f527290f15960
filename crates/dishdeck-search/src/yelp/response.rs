use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{NetworkError, Result, SearchDomainError},
    model::Restaurant,
};

/// Body of a search response; exactly one of the fields is expected.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    businesses: Option<Vec<Restaurant>>,
    error: Option<ServiceErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    code: String,
    description: Option<String>,
}

/// Turn a raw status and body into restaurants or a classified error.
///
/// Non-2xx responses prefer the server's structured error code, then a
/// well-known status mapping, and finally [`NetworkError::HttpStatus`].
/// A 2xx body without `businesses` is treated as a service error.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<Vec<Restaurant>> {
    if !(200..=299).contains(&status) {
        if let Ok(SearchResponse {
            error: Some(error), ..
        }) = serde_json::from_slice::<SearchResponse>(body)
        {
            debug!(status, code = %error.code, description = ?error.description, "Search service rejected request");
            return Err(SearchDomainError::from_code(&error.code).into());
        }
        return Err(SearchDomainError::from_status(status)
            .map_or_else(|| NetworkError::HttpStatus(status).into(), Into::into));
    }

    match serde_json::from_slice::<SearchResponse>(body)? {
        SearchResponse {
            businesses: Some(businesses),
            ..
        } => Ok(businesses),
        SearchResponse {
            error: Some(error), ..
        } => {
            debug!(code = %error.code, description = ?error.description, "Search service returned an error body");
            Err(SearchDomainError::from_code(&error.code).into())
        }
        SearchResponse { .. } => Err(SearchDomainError::Unknown("Unknown Error".to_string()).into()),
    }
}
