// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Logging in, registering, and logging out.
//!
//! Every path that changes who is logged in writes the [`Store`] first and
//! then publishes on the [`Bus`], so subscribers always observe a store that
//! already agrees with the event.

use async_trait::async_trait;
use log::{debug, info, warn};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    bus::{Bus, Event},
    classify::Context,
    error::{self, Error, Result},
    gateway::{Gateway, Request},
    session::{Role, Session, Store, Token, User},
};

pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: SecretString,
}

impl Credentials {
    pub(crate) fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// A registration form. The backend always assigns the customer role.
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: SecretString,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone_number: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<Token>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthResponse {
    fn into_session(self) -> Result<Session> {
        match (self.success, self.user, self.token) {
            (true, Some(user), Some(token)) if !token.expose().is_empty() => {
                Ok(Session { token, user })
            }
            (_, _, _) => Err(self
                .message
                .map_or(Error::InvalidCredentials, Error::Rejected)),
        }
    }
}

/// Recovers the backend's explanation from a rejected auth call. The backend
/// answers failed logins and registrations with a 400 carrying the same
/// envelope as a success.
fn rejection(failure: error::Api) -> Error {
    if let error::Api::Status { ref body, .. } = failure {
        if let Ok(response) = serde_json::from_str::<AuthResponse>(body) {
            if !response.success {
                return response
                    .message
                    .map_or(Error::InvalidCredentials, Error::Rejected);
            }
        }
    }
    failure.into()
}

#[async_trait]
pub(crate) trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session>;
}

/// The fixed accounts the web client shipped with for demonstrations.
pub(crate) struct DemoAccounts;

impl DemoAccounts {
    fn account(username: &str) -> Option<(&'static str, Session)> {
        let (password, token, user) = match username {
            "admin" => (
                "admin123",
                "mock-jwt-token-admin",
                User {
                    id: 1,
                    username: "admin".to_owned(),
                    first_name: "Admin".to_owned(),
                    last_name: "User".to_owned(),
                    role: Role::Admin,
                },
            ),
            "user" => (
                "user123",
                "mock-jwt-token-user",
                User {
                    id: 2,
                    username: "user".to_owned(),
                    first_name: "John".to_owned(),
                    last_name: "Doe".to_owned(),
                    role: Role::Customer,
                },
            ),
            _ => return None,
        };
        Some((
            password,
            Session {
                token: Token::new(token),
                user,
            },
        ))
    }
}

#[async_trait]
impl Authenticator for DemoAccounts {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        match Self::account(&credentials.username) {
            Some((password, session)) if credentials.password.expose_secret() == password => {
                Ok(session)
            }
            Some(_) | None => Err(Error::InvalidCredentials),
        }
    }
}

/// Authenticates against `POST /auth/login`.
pub(crate) struct Remote<'a> {
    gateway: &'a Gateway,
}

impl<'a> Remote<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Authenticator for Remote<'_> {
    // LINT: Only the rejection is rewritten.
    #[allow(clippy::wildcard_enum_match_arm)]
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let req = Request::post("/auth/login")
            .with_json(&LoginBody {
                username: &credentials.username,
                password: credentials.password.expose_secret(),
            })?
            .with_context(Context::Auth);
        let session = match self.gateway.send(req).await {
            Ok(response) => response.json::<AuthResponse>()?.into_session(),
            Err(failure) => Err(rejection(failure)),
        };
        // The backend only ever rejects a login for bad credentials.
        session.map_err(|e| match e {
            Error::Rejected(message) => {
                debug!("Login rejected by the server: {}", message);
                Error::InvalidCredentials
            }
            other => other,
        })
    }
}

async fn establish(store: &Store, bus: &Bus, session: Session) -> Result<Session> {
    store.save(&session).await?;
    info!(
        "Logged in as {} ({})",
        session.user.username, session.user.role
    );
    bus.publish(&Event::LoggedIn(session.clone()));
    Ok(session)
}

pub(crate) async fn login(
    authenticator: &dyn Authenticator,
    store: &Store,
    bus: &Bus,
    credentials: &Credentials,
) -> Result<Session> {
    let session = authenticator.authenticate(credentials).await.map_err(|e| {
        warn!("Login for {} failed: {}", credentials.username, e);
        e
    })?;
    establish(store, bus, session).await
}

pub(crate) async fn register(gateway: &Gateway, new_user: &NewUser) -> Result<Session> {
    let req = Request::post("/auth/register")
        .with_json(&RegisterBody {
            username: &new_user.username,
            email: &new_user.email,
            password: new_user.password.expose_secret(),
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
            phone_number: new_user.phone_number.as_deref(),
        })?
        .with_context(Context::Auth);
    let response = gateway.send(req).await.map_err(rejection)?;
    let session = response.json::<AuthResponse>()?.into_session()?;
    establish(gateway.store(), gateway.bus(), session).await
}

pub(crate) async fn logout(store: &Store, bus: &Bus) -> Result<()> {
    store.clear().await?;
    info!("Logged out");
    bus.publish(&Event::LoggedOut);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::{
        bus::EventKind,
        gateway::{Config, DEFAULT_TIMEOUT},
        session::tests::customer,
        storage,
    };

    use super::*;

    fn record(bus: &Bus) -> (Arc<Mutex<Vec<Event>>>, Vec<crate::bus::Subscription>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscriptions = [EventKind::LoggedIn, EventKind::LoggedOut]
            .into_iter()
            .map(|kind| {
                let seen = Arc::clone(&seen);
                bus.subscribe(kind, move |event| {
                    seen.lock()
                        .map_err(|_| Error::Command)?
                        .push(event.clone());
                    Ok(())
                })
            })
            .collect();
        (seen, subscriptions)
    }

    fn events(seen: &Arc<Mutex<Vec<Event>>>) -> Vec<Event> {
        seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn gateway(server: &MockServer, store: Store, bus: Bus) -> Result<Gateway> {
        Gateway::new(
            &Config {
                base_url: format!("{}/api", server.uri()).parse()?,
                timeout: DEFAULT_TIMEOUT,
            },
            store,
            bus,
        )
    }

    #[tokio::test]
    async fn demo_login_saves_then_publishes() -> Result<()> {
        let store = Store::new(storage::Memory::new());
        let bus = Bus::new();
        let (seen, _subscriptions) = record(&bus);

        let session = login(
            &DemoAccounts,
            &store,
            &bus,
            &Credentials::new("user", "user123"),
        )
        .await?;

        assert_eq!(session, customer());
        assert_eq!(session.user.id, 2);
        assert_eq!(session.token.expose(), "mock-jwt-token-user");
        assert_eq!(store.load().await, Some(customer()));
        assert_eq!(events(&seen), vec![Event::LoggedIn(customer())]);
        Ok(())
    }

    #[tokio::test]
    async fn demo_admin_account() -> Result<()> {
        let session = DemoAccounts
            .authenticate(&Credentials::new("admin", "admin123"))
            .await?;
        assert!(session.user.is_admin());
        assert_eq!(session.user.id, 1);
        assert_eq!(session.token.expose(), "mock-jwt-token-admin");
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_changes_nothing() -> Result<()> {
        let store = Store::new(storage::Memory::new());
        let bus = Bus::new();
        let (seen, _subscriptions) = record(&bus);

        for (username, password) in [("user", "admin123"), ("nobody", "user123")] {
            let result = login(
                &DemoAccounts,
                &store,
                &bus,
                &Credentials::new(username, password),
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidCredentials)));
        }
        assert_eq!(store.load().await, None);
        assert!(events(&seen).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_then_publishes() -> Result<()> {
        let store = Store::new(storage::Memory::new());
        let bus = Bus::new();
        store.save(&customer()).await?;
        let (seen, _subscriptions) = record(&bus);

        logout(&store, &bus).await?;
        assert_eq!(store.load().await, None);
        assert_eq!(events(&seen), vec![Event::LoggedOut]);
        Ok(())
    }

    #[tokio::test]
    async fn remote_login() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({"username": "user", "password": "user123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "token": "mock-jwt-token-2",
                "user": {
                    "id": 2,
                    "username": "user",
                    "email": "john@example.com",
                    "firstName": "John",
                    "lastName": "Doe",
                    "role": "CUSTOMER",
                },
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({"username": "user", "password": "nope"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Invalid credentials",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Store::new(storage::Memory::new());
        let bus = Bus::new();
        let gateway = gateway(&server, store.clone(), bus.clone())?;
        let remote = Remote::new(&gateway);

        let session = login(&remote, &store, &bus, &Credentials::new("user", "user123")).await?;
        assert_eq!(session.token.expose(), "mock-jwt-token-2");
        assert_eq!(session.user, customer().user);

        logout(&store, &bus).await?;
        let rejected = login(&remote, &store, &bus, &Credentials::new("user", "nope")).await;
        assert!(matches!(rejected, Err(Error::InvalidCredentials)));
        assert_eq!(store.load().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn registration_logs_in() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "token": "mock-jwt-token-9",
                "user": {"id": 9, "username": "nimal", "role": "CUSTOMER"},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Store::new(storage::Memory::new());
        let bus = Bus::new();
        let (seen, _subscriptions) = record(&bus);
        let gateway = gateway(&server, store.clone(), bus.clone())?;

        let session = register(
            &gateway,
            &NewUser {
                username: "nimal".to_owned(),
                email: "nimal@example.com".to_owned(),
                password: SecretString::new("hunter22".to_owned()),
                first_name: String::new(),
                last_name: String::new(),
                phone_number: None,
            },
        )
        .await?;

        assert_eq!(session.user.id, 9);
        assert_eq!(session.user.display_name(), "nimal");
        assert_eq!(store.load().await, Some(session.clone()));
        assert_eq!(events(&seen), vec![Event::LoggedIn(session)]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Username already exists",
            })))
            .mount(&server)
            .await;

        let store = Store::new(storage::Memory::new());
        let gateway = gateway(&server, store.clone(), Bus::new())?;
        let result = register(
            &gateway,
            &NewUser {
                username: "user".to_owned(),
                email: "john@example.com".to_owned(),
                password: SecretString::new("user123".to_owned()),
                first_name: "John".to_owned(),
                last_name: "Doe".to_owned(),
                phone_number: Some("0771234567".to_owned()),
            },
        )
        .await;

        assert!(matches!(result, Err(Error::Rejected(ref m)) if m == "Username already exists"));
        assert_eq!(store.load().await, None);
        Ok(())
    }
}
