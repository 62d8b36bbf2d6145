pub mod appointment;
pub mod auth;
pub mod chat;
pub mod rating;

pub use appointment::{
    ApiEnvelope, Appointment, AppointmentStatus, BookingDraft, ChatBookingRequest, VehicleDetails,
};
pub use auth::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, Session, TokenClaims, User,
};
pub use chat::{ChatMessage, ChatTurn, ChatbotQueryRequest, ChatbotReply, Speaker};
pub use rating::RatingRequest;
