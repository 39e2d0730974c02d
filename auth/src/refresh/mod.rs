pub mod errors;
pub mod manager;
pub mod memory;
pub mod store;
pub mod token;

pub use errors::RefreshTokenError;
pub use manager::RefreshTokenManager;
pub use memory::MemoryRefreshTokenStore;
pub use store::RefreshTokenStore;
pub use token::generate;
pub use token::RefreshTokenRecord;
