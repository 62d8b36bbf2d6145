pub mod app;
pub mod appointments;
pub mod auth_modal;
pub mod booking_form;
pub mod chatbot;
pub mod contact;
pub mod rating_form;

pub use app::App;
pub use appointments::MyAppointments;
pub use auth_modal::AuthModal;
pub use booking_form::BookingForm;
pub use chatbot::Chatbot;
pub use contact::ContactSection;
pub use rating_form::RatingForm;
