//! In-memory repositories and a manual clock shared by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use storefront_auth::auth::{
    Credential, CredentialRepository, NewUser, User, UserRepository,
};
use storefront_auth::session::{Session, SessionRepository};
use storefront_auth::{
    AuthConfig, AuthService, Clock, PasswordResetService, RepoError, RepoResult, SessionService,
};

/// Test clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}

/// In-memory stand-in for the persistent store, implementing all three
/// repository traits. Active-email uniqueness mirrors the partial index.
#[derive(Default)]
pub struct MemStore {
    users: Mutex<HashMap<Uuid, User>>,
    credentials: Mutex<HashMap<Uuid, Credential>>,
    sessions: Mutex<HashMap<String, Session>>,
    /// When set, `find_active_by_email` sees nothing, emulating a reader
    /// racing a concurrent insert; the unique check in `create` still fires.
    blind_email_lookup: AtomicBool,
    /// When set, `touch_last_login` fails, for the best-effort path.
    fail_touch_last_login: AtomicBool,
}

impl MemStore {
    #[allow(dead_code)]
    pub fn blind_email_lookup(&self, on: bool) {
        self.blind_email_lookup.store(on, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn fail_touch_last_login(&self, on: bool) {
        self.fail_touch_last_login.store(on, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn credential(&self, user_id: Uuid) -> Option<Credential> {
        self.credentials.lock().unwrap().get(&user_id).cloned()
    }

    #[allow(dead_code)]
    pub fn soft_delete_user(&self, user_id: Uuid, at: OffsetDateTime) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.deleted_at = Some(at);
        }
    }
}

#[async_trait]
impl UserRepository for MemStore {
    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        if self.blind_email_lookup.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.email == new_user.email && u.deleted_at.is_none())
        {
            return Err(RepoError::UniqueViolation("users_email_active_idx".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            email_verified: false,
            created_at: OffsetDateTime::now_utc(),
            deleted_at: None,
        };
        self.credentials.lock().unwrap().insert(
            user.id,
            Credential {
                user_id: user.id,
                password_hash: new_user.password_hash,
                last_login_at: None,
                reset_token: None,
                reset_token_expires_at: None,
            },
        );
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CredentialRepository for MemStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> RepoResult<Option<Credential>> {
        Ok(self.credentials.lock().unwrap().get(&user_id).cloned())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> RepoResult<()> {
        if let Some(cred) = self.credentials.lock().unwrap().get_mut(&user_id) {
            cred.reset_token = Some(token.to_owned());
            cred.reset_token_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_hash: &str,
        now: OffsetDateTime,
    ) -> RepoResult<Option<Uuid>> {
        let mut credentials = self.credentials.lock().unwrap();
        for cred in credentials.values_mut() {
            if cred.reset_token.as_deref() == Some(token) {
                // Matches the store's conditional update: an expired token
                // simply does not match, nothing changes.
                if cred.reset_token_expires_at.map_or(false, |exp| exp > now) {
                    cred.password_hash = new_hash.to_owned();
                    cred.reset_token = None;
                    cred.reset_token_expires_at = None;
                    return Ok(Some(cred.user_id));
                }
                return Ok(None);
            }
        }
        Ok(None)
    }

    async fn touch_last_login(&self, user_id: Uuid, at: OffsetDateTime) -> RepoResult<()> {
        if self.fail_touch_last_login.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("induced failure".into()));
        }
        if let Some(cred) = self.credentials.lock().unwrap().get_mut(&user_id) {
            cred.last_login_at = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemStore {
    async fn create(&self, session: Session) -> RepoResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> RepoResult<()> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }
}

pub struct TestEnv {
    pub store: Arc<MemStore>,
    pub clock: Arc<ManualClock>,
    pub auth: AuthService<MemStore, MemStore>,
    pub sessions: SessionService<MemStore, MemStore>,
    pub resets: PasswordResetService<MemStore, MemStore>,
}

pub fn test_env() -> TestEnv {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("storefront_auth=debug")
        .with_test_writer()
        .try_init();

    let store = Arc::new(MemStore::default());
    let clock = Arc::new(ManualClock::new(datetime!(2026-03-01 12:00 UTC)));
    let config = AuthConfig::default();

    let auth = AuthService::new(store.clone(), store.clone(), clock.clone());
    let sessions = SessionService::new(store.clone(), store.clone(), clock.clone(), config.clone());
    let resets = PasswordResetService::new(store.clone(), store.clone(), clock.clone(), config);

    TestEnv {
        store,
        clock,
        auth,
        sessions,
        resets,
    }
}
