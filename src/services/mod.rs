pub mod api_client;
pub mod appointment_service;
pub mod auth_service;
pub mod chatbot_service;
pub mod contact_service;
pub mod error;
pub mod rating_service;
pub mod session;

pub use error::{ApiError, AuthError};
pub use session::SessionStore;
