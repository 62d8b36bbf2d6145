pub mod session_controller;

pub use session_controller::{AuthPhase, SessionController};
