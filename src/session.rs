// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, sync::Arc};

use futures_util::lock::Mutex;
use log::{debug, warn};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq as _;

use crate::{
    error::Result,
    storage::{IsPersistent as _, Storage},
};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const KEYS: [&str; 2] = [TOKEN_KEY, USER_KEY];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum Role {
    Customer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Customer => f.write_str("Customer"),
            Self::Admin => f.write_str("Admin"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    pub(crate) id: u64,
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) first_name: String,
    #[serde(default)]
    pub(crate) last_name: String,
    pub(crate) role: Role,
}

impl User {
    pub(crate) fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub(crate) fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

/// An opaque bearer credential.
#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub(crate) struct Token(SecretString);

impl Token {
    pub(crate) fn new<S: Into<String>>(value: S) -> Self {
        Self(SecretString::new(value.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.expose()
            .as_bytes()
            .ct_eq(other.expose().as_bytes())
            .into()
    }
}

impl Eq for Token {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) token: Token,
    pub(crate) user: User,
}

/// The single accessor for the persisted session.
///
/// The token and the user record are written and removed together. Anything
/// short of both entries being present and readable loads as unauthenticated.
pub(crate) struct Store {
    storage: Arc<Mutex<Box<dyn Storage>>>,
}

impl Store {
    pub(crate) fn new<S: Storage + 'static>(storage: S) -> Self {
        Self {
            storage: Arc::new(Mutex::new(Box::new(storage))),
        }
    }

    pub(crate) async fn save(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)?;
        let mut storage = self.storage.lock().await;
        storage
            .update(&[(TOKEN_KEY, session.token.expose()), (USER_KEY, user.as_str())])
            .await?;
        debug!("Stored session for user {}", session.user.username);
        Ok(())
    }

    pub(crate) async fn load(&self) -> Option<Session> {
        let mut storage = self.storage.lock().await;
        read(&mut **storage).await
    }

    pub(crate) async fn clear(&self) -> Result<()> {
        let mut storage = self.storage.lock().await;
        storage.clear(&KEYS).await
    }

    /// Clears the stored session only while it still carries `token`, so a
    /// session saved in the meantime survives. Returns whether anything was
    /// removed.
    pub(crate) async fn clear_if_current(&self, token: &Token) -> Result<bool> {
        let mut storage = self.storage.lock().await;
        match read(&mut **storage).await {
            Some(ref current) if current.token == *token => {
                storage.clear(&KEYS).await?;
                Ok(true)
            }
            Some(_) | None => Ok(false),
        }
    }

    pub(crate) async fn is_persistent(&self) -> bool {
        self.storage.lock().await.is_persistent()
    }
}

// Both entries come from one storage read, so a concurrent save is seen
// entirely or not at all.
async fn read(storage: &mut dyn Storage) -> Option<Session> {
    let (token, user) = match storage.get_many(&KEYS).await.map(Vec::into_iter) {
        Ok(mut entries) => match (entries.next().flatten(), entries.next().flatten()) {
            (Some(token), Some(user)) if !token.is_empty() => (token, user),
            _ => return None,
        },
        Err(e) => {
            warn!("We could not read the stored session, so you are logged out: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<User>(&user) {
        Ok(user) => Some(Session {
            token: Token::new(token),
            user,
        }),
        Err(e) => {
            warn!("The stored user record is corrupt, so you are logged out: {}", e);
            None
        }
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}
