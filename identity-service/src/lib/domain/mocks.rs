use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use mockall::mock;

use crate::domain::cache::Cache;
use crate::domain::cache::CacheError;
use crate::domain::mail::MailMessage;
use crate::domain::mail::MailQueue;
use crate::domain::password_reset::ports::PasswordResetRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::StoreError;

mock! {
    pub TestCache {}

    #[async_trait]
    impl Cache for TestCache {
        async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError>;
        async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;
        async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;
        async fn flush_all(&self) -> Result<(), CacheError>;
        async fn increment(&self, key: &str, ttl: Duration) -> Result<i64, CacheError>;
    }
}

mock! {
    pub TestUserRepository {}

    #[async_trait]
    impl UserRepository for TestUserRepository {
        async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
        async fn exists_by_email(&self, email: &EmailAddress, exclude: Option<UserId>) -> Result<bool, StoreError>;
        async fn create(&self, user: User) -> Result<User, StoreError>;
        async fn update(&self, user: User) -> Result<User, StoreError>;
    }
}

mock! {
    pub TestPasswordResetRepository {}

    #[async_trait]
    impl PasswordResetRepository for TestPasswordResetRepository {
        async fn store_or_update(&self, email: &EmailAddress, token: &str) -> Result<(), StoreError>;
        async fn find_email_by_token(&self, token: &str, not_before: DateTime<Utc>) -> Result<Option<EmailAddress>, StoreError>;
        async fn delete(&self, email: &EmailAddress, token: &str) -> Result<bool, StoreError>;
    }
}

mock! {
    pub TestMailQueue {}

    impl MailQueue for TestMailQueue {
        fn submit(&self, message: MailMessage);
    }
}
