use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use halalan_auth::domain::repository::{
    Mailer, OtpRepository, RegistrationCache, SessionRepository, UserRepository,
};
use halalan_auth::domain::types::{
    AuthProvider, OTP_TTL_SECS, OneTimeCode, PendingRegistration, Session, User,
};
use halalan_auth::error::AuthServiceError;
use halalan_auth::usecase::password::hash_password;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn credentials_user(email: &str, password: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        name: "Juan".to_owned(),
        password_hash: Some(hash_password(password).unwrap()),
        provider: AuthProvider::Credentials,
        provider_id: None,
        image: None,
        is_admin: false,
        email_verified_at: Some(now),
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn google_user(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        name: "Maria".to_owned(),
        password_hash: None,
        provider: AuthProvider::Google,
        provider_id: Some("google-sub-1".to_owned()),
        image: None,
        is_admin: false,
        email_verified_at: Some(now),
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn live_code(email: &str, code: &str) -> OneTimeCode {
    let now = Utc::now();
    OneTimeCode {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        code: code.to_owned(),
        expires_at: now + Duration::seconds(OTP_TTL_SECS),
        created_at: now,
    }
}

pub fn expired_code(email: &str, code: &str) -> OneTimeCode {
    let now = Utc::now();
    OneTimeCode {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        code: code.to_owned(),
        expires_at: now - Duration::seconds(1),
        created_at: now - Duration::seconds(OTP_TTL_SECS + 1),
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthServiceError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.last_login_at = Some(at);
            u.updated_at = at;
        }
        Ok(())
    }

    async fn record_oauth_login(
        &self,
        id: Uuid,
        image: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.last_login_at = Some(at);
            u.updated_at = at;
            if let Some(image) = image {
                u.image = Some(image.to_owned());
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOtpRepo {
    pub codes: Arc<Mutex<Vec<OneTimeCode>>>,
}

impl MockOtpRepo {
    pub fn new(codes: Vec<OneTimeCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn codes_handle(&self) -> Arc<Mutex<Vec<OneTimeCode>>> {
        Arc::clone(&self.codes)
    }
}

impl OtpRepository for MockOtpRepo {
    async fn replace_for_email(&self, code: &OneTimeCode) -> Result<(), AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        codes.retain(|c| c.email != code.email);
        codes.push(code.clone());
        Ok(())
    }

    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<OneTimeCode>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email == email && c.code == code)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        self.codes.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AuthServiceError> {
        let now = Utc::now();
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.expires_at > now);
        Ok((before - codes.len()) as u64)
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl MockSessionRepo {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn sessions_handle(&self) -> Arc<Mutex<Vec<Session>>> {
        Arc::clone(&self.sessions)
    }
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_valid_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Session>, AuthServiceError> {
        let now = Utc::now();
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token == token && s.expires_at > now)
            .cloned())
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, AuthServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.token != token);
        Ok(sessions.len() < before)
    }
}

// ── MockCache ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCache {
    pub attempts: Arc<Mutex<HashMap<String, u32>>>,
    pub last_sent: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    pub pending: Arc<Mutex<HashMap<String, PendingRegistration>>>,
}

impl MockCache {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Preload rate-limit state, as if `attempts` sends happened with the
    /// last one at `last_sent`.
    pub fn with_rate_state(email: &str, attempts: u32, last_sent: DateTime<Utc>) -> Self {
        let cache = Self::default();
        cache
            .attempts
            .lock()
            .unwrap()
            .insert(email.to_owned(), attempts);
        cache
            .last_sent
            .lock()
            .unwrap()
            .insert(email.to_owned(), last_sent);
        cache
    }

    pub fn set_last_sent(&self, email: &str, at: DateTime<Utc>) {
        self.last_sent.lock().unwrap().insert(email.to_owned(), at);
    }

    pub fn put_pending_sync(&self, email: &str, pending: PendingRegistration) {
        self.pending.lock().unwrap().insert(email.to_owned(), pending);
    }
}

impl RegistrationCache for MockCache {
    async fn attempts(&self, email: &str) -> Result<u32, AuthServiceError> {
        Ok(*self.attempts.lock().unwrap().get(email).unwrap_or(&0))
    }

    async fn last_sent_at(
        &self,
        email: &str,
    ) -> Result<Option<DateTime<Utc>>, AuthServiceError> {
        Ok(self.last_sent.lock().unwrap().get(email).copied())
    }

    async fn record_send(
        &self,
        email: &str,
        attempts: u32,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        self.attempts
            .lock()
            .unwrap()
            .insert(email.to_owned(), attempts);
        self.last_sent.lock().unwrap().insert(email.to_owned(), at);
        Ok(())
    }

    async fn clear_rate_limit(&self, email: &str) -> Result<(), AuthServiceError> {
        self.attempts.lock().unwrap().remove(email);
        self.last_sent.lock().unwrap().remove(email);
        Ok(())
    }

    async fn put_pending(
        &self,
        email: &str,
        pending: &PendingRegistration,
    ) -> Result<(), AuthServiceError> {
        self.pending
            .lock()
            .unwrap()
            .insert(email.to_owned(), pending.clone());
        Ok(())
    }

    async fn take_pending(
        &self,
        email: &str,
    ) -> Result<Option<PendingRegistration>, AuthServiceError> {
        Ok(self.pending.lock().unwrap().remove(email))
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMailer {
    pub configured: bool,
    pub fail: bool,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockMailer {
    pub fn working() -> Self {
        Self {
            configured: true,
            fail: false,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            fail: false,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn failing() -> Self {
        Self {
            configured: true,
            fail: true,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("connection refused");
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}
