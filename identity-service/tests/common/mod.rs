use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Utc;
use identity_service::config::Config;
use identity_service::config::JwtConfig;
use identity_service::config::MailConfig;
use identity_service::config::PasswordResetConfig;
use identity_service::config::RedisConfig;
use identity_service::config::ThrottleConfig;
use identity_service::domain::auth::service::AuthService;
use identity_service::domain::cache::Cache;
use identity_service::domain::cache::CacheError;
use identity_service::domain::mail::MailError;
use identity_service::domain::mail::MailMessage;
use identity_service::domain::mail::Mailer;
use identity_service::domain::password_reset::ports::PasswordResetRepository;
use identity_service::outbound::mail::MailDispatcher;
use identity_service::outbound::mail::MailWorkers;
use identity_service::user::errors::StoreError;
use identity_service::user::models::EmailAddress;
use identity_service::user::models::RoleId;
use identity_service::user::models::User;
use identity_service::user::models::UserId;
use identity_service::user::ports::UserRepository;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

pub type TestAuthService =
    AuthService<InMemoryUserRepository, InMemoryPasswordResetRepository, InMemoryCache, MailDispatcher>;

/// Authentication core wired to in-memory collaborators and the real mail dispatcher.
pub struct TestApp {
    pub service: Arc<TestAuthService>,
    pub users: Arc<InMemoryUserRepository>,
    pub resets: Arc<InMemoryPasswordResetRepository>,
    pub cache: Arc<InMemoryCache>,
    pub mailer: Arc<RecordingMailer>,
    pub workers: MailWorkers,
}

impl TestApp {
    pub fn spawn() -> Self {
        identity_service::telemetry::init();

        let config = Config {
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
                expiration_hours: 7 * 24,
            },
            throttle: ThrottleConfig::default(),
            password_reset: PasswordResetConfig::default(),
            redis: RedisConfig {
                url: "redis://127.0.0.1:6379".to_string(),
                operation_timeout_ms: 2000,
            },
            mail: MailConfig {
                from: "noreply@example.com".to_string(),
                workers: 2,
                queue_capacity: 16,
            },
        };

        let users = Arc::new(InMemoryUserRepository::default());
        let resets = Arc::new(InMemoryPasswordResetRepository::default());
        let cache = Arc::new(InMemoryCache::default());
        let mailer = Arc::new(RecordingMailer::default());

        let (dispatcher, workers) = MailDispatcher::start(Arc::clone(&mailer), &config.mail);

        let service = Arc::new(AuthService::from_config(
            &config,
            Arc::clone(&users),
            Arc::clone(&resets),
            Arc::clone(&cache),
            Arc::new(dispatcher),
        ));

        Self {
            service,
            users,
            resets,
            cache,
            mailer,
            workers,
        }
    }

    /// Store a user whose password is `password`.
    pub fn seed_user(&self, email: &str, password: &str) -> User {
        let user = User {
            id: UserId::new(),
            name: "Alice".to_string(),
            email: email_address(email),
            password_hash: PasswordHasher::new()
                .hash(password)
                .expect("Failed to hash seed password"),
            role_id: RoleId(1),
        };
        self.users.insert(user.clone());
        user
    }

    /// Wait until at least `count` messages were delivered, or fail after a second.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<MailMessage> {
        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            let delivered = self.mailer.delivered();
            if delivered.len() >= count {
                return delivered;
            }
            assert!(Instant::now() < deadline, "Timed out waiting for mail");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

pub fn email_address(email: &str) -> EmailAddress {
    EmailAddress::new(email.to_string()).expect("Invalid test email")
}

/// Process-local cache with per-key expiry.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(value.clone()),
            Some(_) => {
                entries.remove(key);
                Err(CacheError::KeyNotFound)
            }
            None => Err(CacheError::KeyNotFound),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_vec(), Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn flush_all(&self) -> Result<(), CacheError> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.get(id))
    }

    async fn exists_by_email(
        &self,
        email: &EmailAddress,
        exclude: Option<UserId>,
    ) -> Result<bool, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|user| &user.email == email && Some(user.id) != exclude))
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Rejected("duplicate email".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(StoreError::Rejected("user not found".to_string())),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPasswordResetRepository {
    records: Mutex<HashMap<EmailAddress, (String, DateTime<Utc>)>>,
}

impl InMemoryPasswordResetRepository {
    /// Current token issued for `email`.
    pub fn token_for(&self, email: &EmailAddress) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(email)
            .map(|(token, _)| token.clone())
    }

    /// Move the record's creation time `by` into the past.
    pub fn backdate(&self, email: &EmailAddress, by: chrono::Duration) {
        if let Some((_, created_at)) = self.records.lock().unwrap().get_mut(email) {
            *created_at = *created_at - by;
        }
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    async fn store_or_update(&self, email: &EmailAddress, token: &str) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(email.clone(), (token.to_string(), Utc::now()));
        Ok(())
    }

    async fn find_email_by_token(
        &self,
        token: &str,
        not_before: DateTime<Utc>,
    ) -> Result<Option<EmailAddress>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|(_, (stored, created_at))| stored == token && *created_at >= not_before)
            .map(|(email, _)| email.clone()))
    }

    async fn delete(&self, email: &EmailAddress, token: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        if records.get(email).is_some_and(|(stored, _)| stored == token) {
            records.remove(email);
            return Ok(true);
        }
        Ok(false)
    }
}

/// Transport that keeps every delivered message.
#[derive(Default)]
pub struct RecordingMailer {
    delivered: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn delivered(&self) -> Vec<MailMessage> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }
}
