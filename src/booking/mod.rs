pub mod dialogue;
pub mod draft;

pub use dialogue::{DialogueEngine, EngineAction};
pub use draft::DraftManager;
