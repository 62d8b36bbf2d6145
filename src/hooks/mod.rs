pub mod auth_context;

pub use auth_context::{use_auth, AuthHandle, AuthProvider};
