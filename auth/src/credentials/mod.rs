pub mod errors;
pub mod extractor;

pub use errors::AuthHeaderError;
pub use extractor::api_key;
pub use extractor::bearer_token;
pub use extractor::constant_time_eq;
