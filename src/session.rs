//! In-memory account store and login session.
//!
//! Accounts live for the lifetime of the process only. Passwords are kept in
//! plain text because nothing here is persisted or meant to be secure.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Passwords must match")]
    PasswordMismatch,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("an account for {0} already exists")]
    DuplicateEmail(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: CurrentUser,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn current_student_name(&self) -> &str {
        &self.user.name
    }
}

#[derive(Debug, Default)]
pub struct UserStore {
    accounts: Vec<Account>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, form: RegisterForm) -> Result<CurrentUser, AuthError> {
        if form.password != form.password_confirmation {
            return Err(AuthError::PasswordMismatch);
        }

        let name = form.name.trim();
        let email = form.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if form.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if self.accounts.iter().any(|account| account.email == email) {
            return Err(AuthError::DuplicateEmail(email));
        }

        let account = Account {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email,
            password: form.password,
        };
        tracing::info!(account_id = %account.id, email = %account.email, "registered account");
        let user = CurrentUser {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
        };
        self.accounts.push(account);
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim().to_lowercase();
        let account = self
            .accounts
            .iter()
            .find(|account| account.email == email && account.password == password)
            .ok_or_else(|| {
                tracing::warn!(email = %email, "login rejected");
                AuthError::InvalidCredentials
            })?;

        Ok(Session {
            user: CurrentUser {
                id: account.id,
                name: account.name.clone(),
                email: account.email.clone(),
            },
            logged_in_at: Utc::now(),
        })
    }
}
