pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

// Re-export commonly used types
pub use domain::chirp::service::ChirpService;
pub use domain::user::service::UserService;
pub use inbound::http::router::create_router;
pub use inbound::http::router::AppState;
