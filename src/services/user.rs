//! User registry
//!
//! Registration, login and profile edits. Passwords are stored as salted
//! Argon2id PHC strings and never leave this module; callers get
//! [`UserProfile`] values back.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId, UserProfile};
use crate::storage::LedgerStore;
use crate::validation::{validate_new_password, validate_profile, validate_registration, RegistrationDraft};

use super::locks::CategoryLocks;

/// Lock key guarding username and email uniqueness
const REGISTRY_KEY: &str = "registry";

fn hash_password(password: &str) -> LedgerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LedgerError::Credential(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> LedgerResult<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| LedgerError::Credential(format!("Stored password hash is unreadable: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub struct UserService<'a> {
    store: &'a dyn LedgerStore,
    locks: &'a CategoryLocks,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn LedgerStore, locks: &'a CategoryLocks) -> Self {
        Self { store, locks }
    }

    fn require(&self, id: UserId) -> LedgerResult<User> {
        self.store
            .get_user(id)?
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))
    }

    fn find_by_username(&self, username: &str) -> LedgerResult<Option<User>> {
        let username = username.trim();
        Ok(self
            .store
            .list_users()?
            .into_iter()
            .find(|u| u.username == username))
    }

    /// Username and email must not belong to anyone but `except`
    fn ensure_available(&self, username: &str, email: &str, except: Option<UserId>) -> LedgerResult<()> {
        for user in self.store.list_users()? {
            if Some(user.id) == except {
                continue;
            }
            if user.username == username {
                return Err(LedgerError::Duplicate {
                    entity_type: "Username",
                    identifier: username.to_string(),
                });
            }
            if user.has_email(email) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Email",
                    identifier: email.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn register(&self, draft: &RegistrationDraft) -> LedgerResult<UserProfile> {
        let valid = validate_registration(draft)?;
        let password_hash = hash_password(&draft.password)?;

        self.locks.with_keys(&[REGISTRY_KEY.to_string()], || -> LedgerResult<UserProfile> {
            self.ensure_available(&valid.username, &valid.email, None)?;
            let user = User::new(valid.name.clone(), valid.email.clone(), valid.username.clone(), password_hash);
            self.store.insert_user(&user)?;
            info!(id = %user.id, username = %user.username, "user registered");
            Ok(user.profile())
        })
    }

    /// Check a username/password pair
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    pub fn login(&self, username: &str, password: &str) -> LedgerResult<UserProfile> {
        let Some(user) = self.find_by_username(username)? else {
            debug!(username = username.trim(), "login for unknown username");
            return Err(LedgerError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash)? {
            debug!(id = %user.id, "login with wrong password");
            return Err(LedgerError::InvalidCredentials);
        }
        Ok(user.profile())
    }

    /// First step of password recovery
    pub fn find_by_email(&self, email: &str) -> LedgerResult<UserProfile> {
        self.store
            .list_users()?
            .iter()
            .find(|u| u.has_email(email))
            .map(User::profile)
            .ok_or_else(|| LedgerError::user_not_found(email.trim().to_string()))
    }

    pub fn reset_password(&self, id: UserId, password: &str, confirm: &str) -> LedgerResult<()> {
        validate_new_password(password, confirm)?;
        let user = self.require(id)?;
        let updated = User {
            password_hash: hash_password(password)?,
            updated_at: Utc::now(),
            ..user
        };
        if self.store.update_user(&updated)? == 0 {
            return Err(LedgerError::user_not_found(id.to_string()));
        }
        info!(id = %id, "password reset");
        Ok(())
    }

    pub fn update_profile(
        &self,
        id: UserId,
        name: &str,
        email: &str,
        username: &str,
    ) -> LedgerResult<UserProfile> {
        let valid = validate_profile(name, email, username)?;
        self.locks.with_keys(&[REGISTRY_KEY.to_string()], || -> LedgerResult<UserProfile> {
            let user = self.require(id)?;
            self.ensure_available(&valid.username, &valid.email, Some(id))?;
            let updated = User {
                name: valid.name.clone(),
                email: valid.email.clone(),
                username: valid.username.clone(),
                updated_at: Utc::now(),
                ..user
            };
            if self.store.update_user(&updated)? == 0 {
                return Err(LedgerError::user_not_found(id.to_string()));
            }
            info!(id = %id, username = %updated.username, "profile updated");
            Ok(updated.profile())
        })
    }

    pub fn get(&self, id: UserId) -> LedgerResult<UserProfile> {
        Ok(self.require(id)?.profile())
    }
}
