//! Local accounts.

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::{self, LocalStore, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No account is registered with this email")]
    UserNotFound,
    #[error("Wrong password")]
    WrongPassword,
    #[error("An account with this email already exists")]
    EmailTaken,
    #[error("Account store unavailable: {0}")]
    Database(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub email: String,
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Signs users in against the accounts of a [`LocalStore`].
#[derive(Debug, Clone)]
pub struct LocalAuth {
    store: LocalStore,
}

impl LocalAuth {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub async fn sign_in(&self, email: String, password: String) -> Result<Session, AuthError> {
        let lookup = email.clone();
        let found = self.store.run(move |conn| db::find_user(conn, &lookup)).await?;
        let Some((name, stored_hash)) = found else {
            warn!("sign in for unknown account");
            return Err(AuthError::UserNotFound);
        };
        if stored_hash != hash_password(&password) {
            warn!("sign in with wrong password");
            return Err(AuthError::WrongPassword);
        }
        info!(%name, "signed in");
        Ok(Session { name, email: email.trim().to_string() })
    }

    pub async fn sign_up(&self, name: String, email: String, password: String) -> Result<Session, AuthError> {
        let hash = hash_password(&password);
        let (n, e) = (name.clone(), email.clone());
        let taken = self
            .store
            .run(move |conn| {
                if db::is_email_taken(conn, &e)? {
                    return Ok(true);
                }
                db::register_user(conn, &n, &e, &hash)?;
                Ok(false)
            })
            .await?;
        if taken {
            return Err(AuthError::EmailTaken);
        }
        info!(%name, "account registered");
        Ok(Session { name: name.trim().to_string(), email: email.trim().to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> LocalAuth {
        LocalAuth::new(LocalStore::in_memory().unwrap())
    }

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = auth();
        auth.sign_up("Priya".into(), "priya@school.in".into(), "s3cretpass".into()).await.unwrap();
        let session = auth.sign_in("priya@school.in".into(), "s3cretpass".into()).await.unwrap();
        assert_eq!(session.name, "Priya");
        assert!(matches!(
            auth.sign_in("priya@school.in".into(), "wrong-pass".into()).await,
            Err(AuthError::WrongPassword)
        ));
        assert!(matches!(
            auth.sign_in("nobody@school.in".into(), "s3cretpass".into()).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn email_must_be_unique() {
        let auth = auth();
        auth.sign_up("Priya".into(), "priya@school.in".into(), "s3cretpass".into()).await.unwrap();
        assert!(matches!(
            auth.sign_up("Other".into(), "PRIYA@school.in".into(), "another1".into()).await,
            Err(AuthError::EmailTaken)
        ));
    }
}
