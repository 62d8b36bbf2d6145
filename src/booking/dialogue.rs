use crate::config::CONFIG;
use crate::models::{Appointment, ChatBookingRequest, ChatMessage, ChatTurn, ChatbotReply, Speaker, User};
use crate::services::error::ApiError;
use crate::utils::time::{today_iso, tomorrow_iso};
use crate::utils::validation::{
    validate_date, validate_email, validate_name, validate_phone, validate_service, validate_time,
};

const GREETING: &str = "Hi! I'm Revvy, your car service assistant. How can I help you today?";

const MAIN_MENU: [&str; 5] = [
    "Book a Service",
    "View Services",
    "Check Spare Parts",
    "Contact Information",
    "Operating Hours",
];

const SERVICE_MENU: [&str; 4] = [
    "Oil Change Service - $49.99",
    "Brake Service - $129.99",
    "Tire Rotation - $39.99",
    "Full Car Inspection - $89.99",
];

const DATE_MENU: [&str; 3] = ["Today", "Tomorrow", "Select Different Date"];
const TIME_MENU: [&str; 4] = ["9:00 AM", "11:00 AM", "2:00 PM", "4:00 PM"];
const NOTES_MENU: [&str; 1] = ["No additional notes"];
const CONFIRM_MENU: [&str; 2] = ["Confirm Booking", "Cancel"];
const RETRY_MENU: [&str; 2] = ["Try Again", "Cancel Booking"];
const FAILURE_MENU: [&str; 2] = ["Try Again", "Contact Support"];
const SUCCESS_MENU: [&str; 2] = ["Book Another Service", "Main Menu"];

const OPTION_BOOK: &str = "Book a Service";
const OPTION_CONFIRM: &str = "Confirm Booking";
const OPTION_RETRY: &str = "Try Again";
const OPTION_SUPPORT: &str = "Contact Support";
const OPTION_NO_NOTES: &str = "No additional notes";
const OPTION_CUSTOM_DATE: &str = "Select Different Date";
const OPTION_MAIN_MENU: &str = "Main Menu";

const SUPPORT_INFO: &str =
    "You can reach our service desk at (555) 012-3456 or support@autocare.example.com, \
     Monday to Saturday, 9 AM to 5 PM.";

/// One discrete state of the scripted booking conversation. The numeric
/// index only advances on valid input for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    /// Service menu shown to guests.
    Service,
    Name,
    Email,
    Phone,
    /// Service selection for the authenticated fast path.
    ServiceSelect,
    Date,
    Time,
    Notes,
    Confirm,
}

impl BookingStep {
    pub fn index(self) -> u8 {
        match self {
            BookingStep::Service => 0,
            BookingStep::Name => 1,
            BookingStep::Email => 2,
            BookingStep::Phone => 3,
            BookingStep::ServiceSelect => 4,
            BookingStep::Date => 5,
            BookingStep::Time => 6,
            BookingStep::Notes => 7,
            BookingStep::Confirm => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DialogueState {
    MainMenu,
    /// Free-form Q&A against the remote NLU endpoint.
    OpenChat,
    Booking(BookingStep),
    /// An NLU query is in flight.
    AwaitingReply,
    /// A booking submission is in flight.
    Submitting,
}

/// The booking fields collected conversationally: a BookingDraft minus
/// the vehicle details.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedFields {
    pub customer_name: String,
    pub email: String,
    pub phone_number: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub message: String,
}

impl CollectedFields {
    fn to_request(&self, user_id: Option<String>) -> ChatBookingRequest {
        ChatBookingRequest {
            customer_name: self.customer_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            service: self.service.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            message: self.message.clone(),
            user_id,
        }
    }
}

/// Side effect the caller must run after a transition. Network calls are
/// never issued from inside the engine; the widget performs them and
/// feeds the outcome back through resolve_submit / resolve_query.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction {
    None,
    SubmitBooking(ChatBookingRequest),
    Query(String),
}

/// The scripted multi-step booking dialogue. A step-indexed state machine
/// that collects booking fields, validates each step, and culminates in a
/// booking submission; invalid input re-prompts the same step.
pub struct DialogueEngine {
    state: DialogueState,
    fields: CollectedFields,
    transcript: Vec<ChatMessage>,
    user: Option<User>,
    last_query: Option<String>,
}

impl DialogueEngine {
    pub fn new(user: Option<User>) -> Self {
        Self {
            state: DialogueState::MainMenu,
            fields: CollectedFields::default(),
            transcript: vec![ChatMessage::bot(GREETING, &MAIN_MENU)],
            user,
            last_query: None,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Current step index 0..=7. The root menu and open Q&A count as 0.
    pub fn step_index(&self) -> u8 {
        match self.state {
            DialogueState::Booking(step) => step.index(),
            DialogueState::Submitting => 7,
            _ => 0,
        }
    }

    /// True while a triggered network call is unresolved; the widget
    /// disables input so transitions stay strictly sequential.
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, DialogueState::AwaitingReply | DialogueState::Submitting)
    }

    pub fn collected(&self) -> &CollectedFields {
        &self.fields
    }

    /// Updates the authenticated user mid-conversation (login/logout in
    /// another part of the app). The transcript and any collected fields
    /// are left untouched; the fast path applies from the next booking.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Recent conversation turns for the NLU endpoint.
    pub fn context(&self) -> Vec<ChatTurn> {
        let window = CONFIG.chat_config.context_window;
        let start = self.transcript.len().saturating_sub(window);
        self.transcript[start..]
            .iter()
            .map(|m| ChatTurn {
                role: match m.speaker {
                    Speaker::User => "user".to_string(),
                    Speaker::Bot => "assistant".to_string(),
                },
                content: m.text.clone(),
            })
            .collect()
    }

    /// Processes one user input or option selection.
    pub fn handle_input(&mut self, input: &str) -> EngineAction {
        let input = input.trim();
        if input.is_empty() || self.is_waiting() {
            return EngineAction::None;
        }

        self.push(ChatMessage::user(input));

        match self.state.clone() {
            DialogueState::MainMenu | DialogueState::OpenChat => self.handle_menu_input(input),
            DialogueState::Booking(step) => self.handle_booking_input(step, input),
            // Unreachable thanks to the is_waiting gate above.
            DialogueState::AwaitingReply | DialogueState::Submitting => EngineAction::None,
        }
    }

    /// Outcome of the booking submission triggered at the confirm step.
    pub fn resolve_submit(&mut self, result: Result<Appointment, ApiError>) {
        match result {
            Ok(appointment) => {
                self.push(ChatMessage::bot(
                    format!(
                        "Your appointment is booked! 🎉 Reference {}. We'll see you on {} at {}.",
                        appointment.id, appointment.date, appointment.time
                    ),
                    &SUCCESS_MENU,
                ));
                self.fields = CollectedFields::default();
                self.state = DialogueState::MainMenu;
            }
            Err(error) => {
                // Collected fields stay intact for a retry.
                self.push(ChatMessage::bot(
                    format!("Sorry, I couldn't book your appointment. {}", error),
                    &FAILURE_MENU,
                ));
                self.state = DialogueState::Booking(BookingStep::Confirm);
            }
        }
    }

    /// Outcome of a free-form NLU query.
    pub fn resolve_query(&mut self, result: Result<ChatbotReply, ApiError>) {
        match result {
            Ok(reply) => {
                let opts: Vec<&str> = reply.options.iter().map(String::as_str).collect();
                self.push(ChatMessage::bot(reply.response.clone(), &opts));
            }
            Err(_) => {
                self.push(ChatMessage::bot(
                    "I'm sorry, but I'm having trouble connecting to the server. \
                     Please try again later.",
                    &FAILURE_MENU,
                ));
            }
        }
        self.state = DialogueState::OpenChat;
    }

    fn handle_menu_input(&mut self, input: &str) -> EngineAction {
        if input == OPTION_BOOK {
            return self.start_booking();
        }
        if input == OPTION_MAIN_MENU {
            self.push(ChatMessage::bot("What else can I help you with?", &MAIN_MENU));
            self.state = DialogueState::MainMenu;
            return EngineAction::None;
        }
        if input == OPTION_SUPPORT {
            self.push(ChatMessage::bot(SUPPORT_INFO, &MAIN_MENU));
            self.state = DialogueState::MainMenu;
            return EngineAction::None;
        }

        let query = if input == OPTION_RETRY {
            self.last_query.clone().unwrap_or_else(|| input.to_string())
        } else {
            input.to_string()
        };
        self.last_query = Some(query.clone());
        self.state = DialogueState::AwaitingReply;
        EngineAction::Query(query)
    }

    /// Entry into the booking flow. Authenticated users skip the contact
    /// collection steps and land on the service sub-menu directly.
    fn start_booking(&mut self) -> EngineAction {
        match &self.user {
            Some(user) => {
                self.fields = CollectedFields {
                    customer_name: user.name.clone(),
                    email: user.email.clone(),
                    phone_number: user.phone.clone().unwrap_or_default(),
                    ..CollectedFields::default()
                };
                self.state = DialogueState::Booking(BookingStep::ServiceSelect);
                self.push(ChatMessage::bot(
                    format!(
                        "Welcome back, {}! Please select the service you need:",
                        user.name
                    ),
                    &SERVICE_MENU,
                ));
            }
            None => {
                self.fields = CollectedFields::default();
                self.state = DialogueState::Booking(BookingStep::Service);
                self.push(ChatMessage::bot(
                    "Please select the service you need:",
                    &SERVICE_MENU,
                ));
            }
        }
        EngineAction::None
    }

    fn handle_booking_input(&mut self, step: BookingStep, input: &str) -> EngineAction {
        // Cancellation is available at every step and has no side effects.
        if input == "Cancel" || input == "Cancel Booking" {
            self.reset_booking("No problem, I've cancelled the booking. Anything else I can help you with?");
            return EngineAction::None;
        }
        if input == OPTION_SUPPORT {
            self.fields = CollectedFields::default();
            self.state = DialogueState::MainMenu;
            self.push(ChatMessage::bot(SUPPORT_INFO, &MAIN_MENU));
            return EngineAction::None;
        }
        if input == OPTION_RETRY && step != BookingStep::Confirm {
            self.prompt(step);
            return EngineAction::None;
        }

        match step {
            BookingStep::Service | BookingStep::ServiceSelect => {
                match validate_service(input) {
                    Ok(()) => {
                        self.fields.service = input.to_string();
                        if step == BookingStep::ServiceSelect && !self.fields.phone_number.is_empty()
                        {
                            self.advance(BookingStep::Date);
                        } else if step == BookingStep::ServiceSelect {
                            // Profile has no phone number on record.
                            self.advance(BookingStep::Phone);
                        } else {
                            self.advance(BookingStep::Name);
                        }
                    }
                    Err(message) => self.reject(step, &message),
                }
                EngineAction::None
            }
            BookingStep::Name => {
                match validate_name(input) {
                    Ok(()) => {
                        self.fields.customer_name = input.to_string();
                        self.advance(BookingStep::Email);
                    }
                    Err(message) => self.reject(step, &message),
                }
                EngineAction::None
            }
            BookingStep::Email => {
                match validate_email(input) {
                    Ok(()) => {
                        self.fields.email = input.to_string();
                        self.advance(BookingStep::Phone);
                    }
                    Err(message) => self.reject(step, &message),
                }
                EngineAction::None
            }
            BookingStep::Phone => {
                match validate_phone(input) {
                    Ok(()) => {
                        self.fields.phone_number = input.to_string();
                        self.advance(BookingStep::Date);
                    }
                    Err(message) => self.reject(step, &message),
                }
                EngineAction::None
            }
            BookingStep::Date => {
                let date = match input {
                    "Today" => today_iso(),
                    "Tomorrow" => tomorrow_iso(),
                    OPTION_CUSTOM_DATE => {
                        self.push(ChatMessage::bot(
                            "Please type your preferred date (YYYY-MM-DD):",
                            &[],
                        ));
                        return EngineAction::None;
                    }
                    other => other.to_string(),
                };
                match validate_date(&date) {
                    Ok(()) => {
                        self.fields.date = date;
                        self.advance(BookingStep::Time);
                    }
                    Err(message) => self.reject(step, &message),
                }
                EngineAction::None
            }
            BookingStep::Time => {
                match validate_time(input) {
                    Ok(()) => {
                        self.fields.time = input.to_string();
                        self.advance(BookingStep::Notes);
                    }
                    Err(message) => self.reject(step, &message),
                }
                EngineAction::None
            }
            BookingStep::Notes => {
                self.fields.message = if input == OPTION_NO_NOTES {
                    String::new()
                } else {
                    input.to_string()
                };
                self.advance(BookingStep::Confirm);
                EngineAction::None
            }
            BookingStep::Confirm => {
                if input == OPTION_CONFIRM || input == OPTION_RETRY {
                    self.push(ChatMessage::bot("One moment while I book that for you…", &[]));
                    self.state = DialogueState::Submitting;
                    let user_id = self.user.as_ref().map(|u| u.id.clone());
                    EngineAction::SubmitBooking(self.fields.to_request(user_id))
                } else {
                    // Anything else re-shows the summary.
                    self.prompt(BookingStep::Confirm);
                    EngineAction::None
                }
            }
        }
    }

    /// Valid input: move forward and issue the next step's prompt.
    fn advance(&mut self, next: BookingStep) {
        self.state = DialogueState::Booking(next);
        self.prompt(next);
    }

    /// Invalid input: re-prompt the same step without advancing.
    fn reject(&mut self, step: BookingStep, message: &str) {
        self.state = DialogueState::Booking(step);
        self.push(ChatMessage::bot(message, &RETRY_MENU));
    }

    fn reset_booking(&mut self, message: &str) {
        self.fields = CollectedFields::default();
        self.state = DialogueState::MainMenu;
        self.push(ChatMessage::bot(message, &MAIN_MENU));
    }

    fn prompt(&mut self, step: BookingStep) {
        let message = match step {
            BookingStep::Service | BookingStep::ServiceSelect => {
                ChatMessage::bot("Please select the service you need:", &SERVICE_MENU)
            }
            BookingStep::Name => ChatMessage::bot(
                "Great! Let's get you booked in. What's your full name?",
                &[],
            ),
            BookingStep::Email => ChatMessage::bot("Please enter your email address:", &[]),
            BookingStep::Phone => ChatMessage::bot("Please enter your phone number:", &[]),
            BookingStep::Date => ChatMessage::bot("Please select your preferred date:", &DATE_MENU),
            BookingStep::Time => ChatMessage::bot("Please select your preferred time:", &TIME_MENU),
            BookingStep::Notes => ChatMessage::bot(
                "Any additional notes or special requirements?",
                &NOTES_MENU,
            ),
            BookingStep::Confirm => ChatMessage::bot(self.summary(), &CONFIRM_MENU),
        };
        self.push(message);
    }

    fn summary(&self) -> String {
        let notes = if self.fields.message.is_empty() {
            "—".to_string()
        } else {
            self.fields.message.clone()
        };
        format!(
            "Please confirm your booking details:\n\
             Service: {}\nName: {}\nEmail: {}\nPhone: {}\nDate: {}\nTime: {}\nNotes: {}",
            self.fields.service,
            self.fields.customer_name,
            self.fields.email,
            self.fields.phone_number,
            self.fields.date,
            self.fields.time,
            notes,
        )
    }

    /// Appends to the transcript, dropping the oldest entries beyond the
    /// configured cap.
    fn push(&mut self, message: ChatMessage) {
        self.transcript.push(message);
        let cap = CONFIG.chat_config.transcript_cap;
        if self.transcript.len() > cap {
            let excess = self.transcript.len() - cap;
            self.transcript.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;

    fn guest_engine() -> DialogueEngine {
        DialogueEngine::new(None)
    }

    fn user() -> User {
        User {
            id: "u42".into(),
            name: "Sam Carter".into(),
            email: "sam@example.com".into(),
            phone: Some("9876543210".into()),
        }
    }

    fn appointment() -> Appointment {
        Appointment {
            id: "apt-1".into(),
            customer_name: "Sam Carter".into(),
            service: SERVICE_MENU[0].into(),
            date: "2030-06-01".into(),
            time: "9:00 AM".into(),
            status: AppointmentStatus::Pending,
            message: None,
            vehicle_details: None,
        }
    }

    fn last_bot(engine: &DialogueEngine) -> &ChatMessage {
        engine
            .transcript()
            .iter()
            .rev()
            .find(|m| m.speaker == Speaker::Bot)
            .expect("no bot message")
    }

    #[test]
    fn greeting_opens_with_the_main_menu() {
        let engine = guest_engine();
        assert_eq!(engine.transcript().len(), 1);
        assert_eq!(engine.transcript()[0].options, MAIN_MENU.to_vec());
        assert_eq!(engine.step_index(), 0);
    }

    #[test]
    fn guest_flow_walks_steps_in_order() {
        let mut engine = guest_engine();
        assert_eq!(engine.handle_input("Book a Service"), EngineAction::None);
        assert_eq!(engine.step_index(), 0);

        engine.handle_input(SERVICE_MENU[1]);
        assert_eq!(engine.step_index(), 1);
        engine.handle_input("Sam Carter");
        assert_eq!(engine.step_index(), 2);
        engine.handle_input("sam@example.com");
        assert_eq!(engine.step_index(), 3);
        engine.handle_input("9876543210");
        assert_eq!(engine.step_index(), 5);
        engine.handle_input("Tomorrow");
        assert_eq!(engine.step_index(), 6);
        engine.handle_input("2:00 PM");
        assert_eq!(engine.step_index(), 7);
        engine.handle_input("No additional notes");
        assert_eq!(engine.step_index(), 7);
        assert!(last_bot(&engine).text.contains("confirm your booking"));

        let action = engine.handle_input("Confirm Booking");
        match action {
            EngineAction::SubmitBooking(request) => {
                assert_eq!(request.customer_name, "Sam Carter");
                assert_eq!(request.service, SERVICE_MENU[1]);
                assert_eq!(request.time, "2:00 PM");
                assert_eq!(request.user_id, None);
                assert_eq!(request.message, "");
            }
            other => panic!("expected submit action, got {:?}", other),
        }
        assert!(engine.is_waiting());
    }

    #[test]
    fn invalid_email_reprompts_without_advancing() {
        let mut engine = guest_engine();
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        engine.handle_input("Sam Carter");
        assert_eq!(engine.step_index(), 2);

        engine.handle_input("not-an-email");
        assert_eq!(engine.step_index(), 2);
        assert!(last_bot(&engine).text.contains("valid email"));
        assert_eq!(last_bot(&engine).options, RETRY_MENU.to_vec());

        engine.handle_input("sam@example.com");
        assert_eq!(engine.step_index(), 3);
    }

    #[test]
    fn authenticated_user_skips_contact_collection() {
        let mut engine = DialogueEngine::new(Some(user()));
        engine.handle_input("Book a Service");
        assert_eq!(engine.step_index(), 4);

        engine.handle_input(SERVICE_MENU[2]);
        // Straight to date selection: steps 1-3 skipped.
        assert_eq!(engine.step_index(), 5);
        assert_eq!(engine.collected().customer_name, "Sam Carter");
        assert_eq!(engine.collected().email, "sam@example.com");

        engine.handle_input("Today");
        engine.handle_input("11:00 AM");
        engine.handle_input("No additional notes");
        let action = engine.handle_input("Confirm Booking");
        match action {
            EngineAction::SubmitBooking(request) => {
                assert_eq!(request.user_id, Some("u42".to_string()));
                assert_eq!(request.phone_number, "9876543210");
            }
            other => panic!("expected submit action, got {:?}", other),
        }
    }

    #[test]
    fn authenticated_user_without_phone_is_asked_for_one() {
        let mut engine = DialogueEngine::new(Some(User {
            phone: None,
            ..user()
        }));
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        assert_eq!(engine.step_index(), 3);

        engine.handle_input("9876543210");
        assert_eq!(engine.step_index(), 5);
    }

    #[test]
    fn cancel_resets_and_discards_fields_at_any_step() {
        let mut engine = guest_engine();
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        engine.handle_input("Sam Carter");
        assert!(!engine.collected().customer_name.is_empty());

        engine.handle_input("Cancel Booking");
        assert_eq!(engine.step_index(), 0);
        assert_eq!(engine.collected(), &CollectedFields::default());
        assert_eq!(last_bot(&engine).options, MAIN_MENU.to_vec());
    }

    #[test]
    fn declining_the_summary_returns_to_the_menu() {
        let mut engine = DialogueEngine::new(Some(user()));
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        engine.handle_input("Today");
        engine.handle_input("9:00 AM");
        engine.handle_input("No additional notes");
        assert_eq!(engine.step_index(), 7);

        engine.handle_input("Cancel");
        assert_eq!(engine.step_index(), 0);
        assert_eq!(engine.collected(), &CollectedFields::default());
    }

    #[test]
    fn submit_failure_keeps_fields_and_offers_retry() {
        let mut engine = DialogueEngine::new(Some(user()));
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        engine.handle_input("Today");
        engine.handle_input("9:00 AM");
        engine.handle_input("No additional notes");
        engine.handle_input("Confirm Booking");

        engine.resolve_submit(Err(ApiError::Conflict));
        assert!(!engine.is_waiting());
        assert_eq!(engine.step_index(), 7);
        assert_eq!(engine.collected().service, SERVICE_MENU[0]);
        assert_eq!(last_bot(&engine).options, FAILURE_MENU.to_vec());

        // Retry resubmits the same collected fields.
        match engine.handle_input("Try Again") {
            EngineAction::SubmitBooking(request) => {
                assert_eq!(request.service, SERVICE_MENU[0])
            }
            other => panic!("expected submit action, got {:?}", other),
        }
    }

    #[test]
    fn submit_success_clears_fields_and_returns_to_menu() {
        let mut engine = DialogueEngine::new(Some(user()));
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        engine.handle_input("Today");
        engine.handle_input("9:00 AM");
        engine.handle_input("No additional notes");
        engine.handle_input("Confirm Booking");

        engine.resolve_submit(Ok(appointment()));
        assert_eq!(engine.step_index(), 0);
        assert_eq!(engine.collected(), &CollectedFields::default());
        assert!(last_bot(&engine).text.contains("apt-1"));
    }

    #[test]
    fn input_is_ignored_while_a_submission_is_in_flight() {
        let mut engine = DialogueEngine::new(Some(user()));
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        engine.handle_input("Today");
        engine.handle_input("9:00 AM");
        engine.handle_input("No additional notes");
        engine.handle_input("Confirm Booking");

        let before = engine.transcript().len();
        assert_eq!(engine.handle_input("hello?"), EngineAction::None);
        assert_eq!(engine.transcript().len(), before);
    }

    #[test]
    fn free_form_input_routes_to_the_nlu_endpoint() {
        let mut engine = guest_engine();
        let action = engine.handle_input("What are your operating hours?");
        assert_eq!(
            action,
            EngineAction::Query("What are your operating hours?".to_string())
        );
        assert!(engine.is_waiting());

        engine.resolve_query(Ok(ChatbotReply {
            response: "We're open 9 to 5, Monday through Saturday.".to_string(),
            options: vec!["Book a Service".to_string()],
        }));
        assert!(!engine.is_waiting());
        assert!(last_bot(&engine).text.contains("9 to 5"));

        // An option offered by the NLU reply can start the booking flow.
        engine.handle_input("Book a Service");
        assert_eq!(engine.step_index(), 0);
        assert!(last_bot(&engine).options.contains(&SERVICE_MENU[0].to_string()));
    }

    #[test]
    fn failed_query_offers_retry_of_the_same_question() {
        let mut engine = guest_engine();
        engine.handle_input("Do you stock brake pads?");
        engine.resolve_query(Err(ApiError::Connection));
        assert_eq!(last_bot(&engine).options, FAILURE_MENU.to_vec());

        let action = engine.handle_input("Try Again");
        assert_eq!(
            action,
            EngineAction::Query("Do you stock brake pads?".to_string())
        );
    }

    #[test]
    fn custom_date_entry_validates_and_rejects_the_past() {
        let mut engine = DialogueEngine::new(Some(user()));
        engine.handle_input("Book a Service");
        engine.handle_input(SERVICE_MENU[0]);
        assert_eq!(engine.step_index(), 5);

        engine.handle_input("Select Different Date");
        assert_eq!(engine.step_index(), 5);

        engine.handle_input("2001-01-01");
        assert_eq!(engine.step_index(), 5);
        assert!(last_bot(&engine).text.contains("future date"));

        engine.handle_input(&crate::utils::time::tomorrow_iso());
        assert_eq!(engine.step_index(), 6);
    }

    #[test]
    fn transcript_is_capped() {
        let mut engine = guest_engine();
        for i in 0..300 {
            engine.handle_input(&format!("question {}", i));
            engine.resolve_query(Ok(ChatbotReply {
                response: format!("answer {}", i),
                options: vec![],
            }));
        }
        assert!(engine.transcript().len() <= CONFIG.chat_config.transcript_cap);
    }

    #[test]
    fn context_window_is_bounded() {
        let mut engine = guest_engine();
        for i in 0..40 {
            engine.handle_input(&format!("question {}", i));
            engine.resolve_query(Ok(ChatbotReply {
                response: format!("answer {}", i),
                options: vec![],
            }));
        }
        let context = engine.context();
        assert_eq!(context.len(), CONFIG.chat_config.context_window);
        assert_eq!(context.last().unwrap().role, "assistant");
    }
}
