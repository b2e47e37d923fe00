use std::sync::Arc;

use nanoid::nanoid;

use crate::errors::ApiError;
use crate::models::User;
use crate::store::Store;

/// Signup and login. Email uniqueness is a check-then-insert, not a database
/// constraint, so a concurrent signup race can still slip through.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }
        let user = User {
            user_id: nanoid!(),
            name: name.to_string(),
            email: email.to_string(),
            password: bcrypt::hash(password, bcrypt::DEFAULT_COST)?,
            country: None,
            city: None,
            phone: None,
        };
        self.store.insert_user(&user).await?;
        Ok(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !bcrypt::verify(password, &user.password)? {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn register_hashes_password() {
        let accounts = service();
        let user = accounts
            .register("Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();
        assert_ne!(user.password, "hunter2");
        assert!(bcrypt::verify("hunter2", &user.password).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_rejected_and_first_record_kept() {
        let accounts = service();
        let first = accounts
            .register("Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();
        let err = accounts
            .register("Imposter", "ada@example.com", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail));

        let kept = accounts.authenticate("ada@example.com", "hunter2").await.unwrap();
        assert_eq!(kept.user_id, first.user_id);
        assert_eq!(kept.name, "Ada");
    }

    #[tokio::test]
    async fn bad_credentials_are_uniform() {
        let accounts = service();
        accounts
            .register("Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();

        let wrong_password = accounts
            .authenticate("ada@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = accounts
            .authenticate("nobody@example.com", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }
}
