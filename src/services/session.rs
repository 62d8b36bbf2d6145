use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::rc::Rc;

use crate::config::{
    CHAT_SESSION_KEY, CONFIG, PENDING_BOOKING_KEY, TOKEN_EXPIRY_KEY, TOKEN_KEY, USER_KEY,
};
use crate::models::{Session, TokenClaims, User};
use crate::utils::storage::{BrowserStore, KeyValueStore};

/// Wraps the persisted credential material (token + user record) and the
/// session-scoped keys tied to it. Malformed persisted data never
/// surfaces to the caller; it reads as "no session" and is cleared.
pub struct SessionStore {
    persistent: Rc<dyn KeyValueStore>,
    session_scoped: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(persistent: Rc<dyn KeyValueStore>, session_scoped: Rc<dyn KeyValueStore>) -> Self {
        Self {
            persistent,
            session_scoped,
        }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStore::local()), Rc::new(BrowserStore::session()))
    }

    /// Reads the persisted token and user. Returns None (and wipes the
    /// persisted keys) unless both are present, the token is structurally
    /// valid and its expiry is still outside the safety buffer.
    pub fn init_session(&self) -> Option<Session> {
        let token = self.persistent.get(TOKEN_KEY);
        let user_json = self.persistent.get(USER_KEY);

        let (Some(token), Some(user_json)) = (token, user_json) else {
            self.clear_session();
            return None;
        };

        if !is_valid_token(&token) || is_token_expired(&token) {
            log::info!("🔒 Stored token is invalid or expired, clearing session");
            self.clear_session();
            return None;
        }

        let Ok(user) = serde_json::from_str::<User>(&user_json) else {
            log::warn!("🔒 Stored user record is malformed, clearing session");
            self.clear_session();
            return None;
        };

        let Some(expires_at) = token_expiry(&token) else {
            self.clear_session();
            return None;
        };

        Some(Session {
            token,
            user,
            expires_at,
        })
    }

    /// Replaces the persisted session wholesale.
    pub fn persist(&self, session: &Session) {
        self.persistent.set(TOKEN_KEY, &session.token);
        if let Ok(user_json) = serde_json::to_string(&session.user) {
            self.persistent.set(USER_KEY, &user_json);
        }
        self.persistent
            .set(TOKEN_EXPIRY_KEY, &session.expires_at.timestamp().to_string());
    }

    /// Idempotently removes all persisted session keys and any
    /// session-scoped draft data.
    pub fn clear_session(&self) {
        self.persistent.remove(TOKEN_KEY);
        self.persistent.remove(USER_KEY);
        self.persistent.remove(TOKEN_EXPIRY_KEY);
        self.session_scoped.remove(PENDING_BOOKING_KEY);
        self.session_scoped.remove(CHAT_SESSION_KEY);
    }

    pub fn stored_token(&self) -> Option<String> {
        self.persistent.get(TOKEN_KEY)
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    if segment.is_empty() {
        return None;
    }
    URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| STANDARD.decode(segment))
        .ok()
}

/// Structural check: three dot-separated segments, each independently
/// decodable. The signature is not verified client-side.
pub fn is_valid_token(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return false;
    }
    parts.iter().all(|part| decode_segment(part).is_some())
}

/// Decodes the expiry instant out of the token payload.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = decode_segment(payload)?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    Utc.timestamp_opt(claims.exp, 0).single()
}

/// Any decode failure counts as expired. A 5-minute buffer guards
/// against using a token that expires mid-request.
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Some(expiry) => {
            let buffer = Duration::seconds(CONFIG.auth_config.token_expiry_buffer_secs);
            expiry <= now + buffer
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::memory::MemoryStore;

    fn encode(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    fn make_token(exp: i64) -> String {
        format!(
            "{}.{}.{}",
            encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            encode(&format!(r#"{{"exp":{}}}"#, exp)),
            encode("signature")
        )
    }

    fn store_with(
        token: Option<&str>,
        user: Option<&str>,
    ) -> (SessionStore, Rc<MemoryStore>, Rc<MemoryStore>) {
        let persistent = Rc::new(MemoryStore::new());
        let scoped = Rc::new(MemoryStore::new());
        if let Some(t) = token {
            persistent.set(TOKEN_KEY, t);
        }
        if let Some(u) = user {
            persistent.set(USER_KEY, u);
        }
        let store = SessionStore::new(persistent.clone(), scoped.clone());
        (store, persistent, scoped)
    }

    const USER_JSON: &str =
        r#"{"id":"u1","name":"Sam Carter","email":"sam@example.com","phone":"9876543210"}"#;

    #[test]
    fn valid_token_and_user_yield_a_session() {
        let exp = Utc::now().timestamp() + 3600;
        let token = make_token(exp);
        let (store, _, _) = store_with(Some(&token), Some(USER_JSON));

        let session = store.init_session().expect("session should load");
        assert_eq!(session.user.name, "Sam Carter");
        assert_eq!(session.expires_at.timestamp(), exp);
    }

    #[test]
    fn missing_third_segment_clears_everything() {
        let token = format!("{}.{}", encode("{}"), encode(r#"{"exp":99999999999}"#));
        let (store, persistent, _) = store_with(Some(&token), Some(USER_JSON));

        assert!(store.init_session().is_none());
        assert!(persistent.get(TOKEN_KEY).is_none());
        assert!(persistent.get(USER_KEY).is_none());
    }

    #[test]
    fn undecodable_segment_clears_everything() {
        let token = format!("{}.***.{}", encode("{}"), encode("sig"));
        let (store, persistent, _) = store_with(Some(&token), Some(USER_JSON));

        assert!(store.init_session().is_none());
        assert!(persistent.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn expiry_inside_buffer_counts_as_expired() {
        // 200 seconds out: inside the 5-minute safety buffer.
        let token = make_token(Utc::now().timestamp() + 200);
        let (store, _, _) = store_with(Some(&token), Some(USER_JSON));
        assert!(store.init_session().is_none());
    }

    #[test]
    fn token_without_user_is_a_partial_state_and_clears() {
        let token = make_token(Utc::now().timestamp() + 3600);
        let (store, persistent, _) = store_with(Some(&token), None);

        assert!(store.init_session().is_none());
        assert!(persistent.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn malformed_user_json_clears() {
        let token = make_token(Utc::now().timestamp() + 3600);
        let (store, persistent, _) = store_with(Some(&token), Some("{not json"));

        assert!(store.init_session().is_none());
        assert!(persistent.get(USER_KEY).is_none());
    }

    #[test]
    fn clear_session_also_drops_session_scoped_draft_data() {
        let (store, _, scoped) = store_with(None, None);
        scoped.set(PENDING_BOOKING_KEY, "{}");
        scoped.set(CHAT_SESSION_KEY, "abc");

        store.clear_session();
        store.clear_session(); // idempotent

        assert!(scoped.get(PENDING_BOOKING_KEY).is_none());
        assert!(scoped.get(CHAT_SESSION_KEY).is_none());
    }

    #[test]
    fn persist_then_init_round_trips() {
        let (store, _, _) = store_with(None, None);
        let exp = Utc::now().timestamp() + 7200;
        let session = Session {
            token: make_token(exp),
            user: serde_json::from_str(USER_JSON).unwrap(),
            expires_at: Utc.timestamp_opt(exp, 0).single().unwrap(),
        };

        store.persist(&session);
        assert_eq!(store.init_session(), Some(session));
    }

    #[test]
    fn structural_checks() {
        assert!(is_valid_token(&make_token(0)));
        assert!(!is_valid_token("only.two"));
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("a.b.c.d"));
    }

    #[test]
    fn decode_failure_counts_as_expired() {
        assert!(is_token_expired("junk"));
        let no_exp = format!("{}.{}.{}", encode("{}"), encode("{}"), encode("sig"));
        assert!(is_token_expired(&no_exp));
    }

    #[test]
    fn expiry_beyond_buffer_is_not_expired() {
        let token = make_token(Utc::now().timestamp() + 3600);
        assert!(!is_token_expired(&token));
    }
}
