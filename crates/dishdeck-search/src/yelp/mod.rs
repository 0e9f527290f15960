//! Client for the Yelp Fusion business search endpoint.

mod fetch;
mod response;

pub use fetch::YelpClient;
pub use response::interpret_response;
