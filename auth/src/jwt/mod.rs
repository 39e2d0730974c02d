pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::AccessClaims;
pub use claims::TokenIssuer;
pub use errors::TokenError;
pub use handler::AccessTokenHandler;
