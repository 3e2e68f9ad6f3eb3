// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;
use secrecy::{ExposeSecret as _, SecretString};

use crate::{
    api::auth::{self, Credentials, NewUser},
    classify::Context,
    error::{self, Result},
    password,
};

use super::App;

/// Log in and store the session.
#[derive(Debug, Parser)]
pub(crate) struct Login {
    /// The account to log in as.
    #[clap()]
    username: String,

    /// The password. Prompted for when left out.
    #[arg(long, env = "TABLETOP_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[async_trait]
impl super::Command for Login {
    fn context(&self) -> Context {
        Context::Auth
    }

    async fn execute(self, app: &App) -> Result<()> {
        let password = match self.password {
            Some(password) => SecretString::new(password),
            None => app.prompt.prompt(password::Request::new(&self.username)).await?,
        };
        let credentials = Credentials {
            username: self.username,
            password,
        };

        let authenticator = app.authenticator();
        let session = auth::login(
            authenticator.as_ref(),
            app.gateway.store(),
            app.gateway.bus(),
            &credentials,
        )
        .await?;
        println!("Welcome back, {}!", session.user.display_name());
        if !app.gateway.store().is_persistent().await {
            println!("This session ends when the program exits.");
        }
        Ok(())
    }
}

/// Forget the stored session.
#[derive(Debug, Parser)]
pub(crate) struct Logout;

#[async_trait]
impl super::Command for Logout {
    fn context(&self) -> Context {
        Context::Auth
    }

    async fn execute(self, app: &App) -> Result<()> {
        auth::logout(app.gateway.store(), app.gateway.bus()).await
    }
}

/// Create a customer account and log in as it.
#[derive(Debug, Parser)]
pub(crate) struct Register {
    #[clap()]
    username: String,

    #[arg(long)]
    email: String,

    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    #[arg(long)]
    phone_number: Option<String>,
}

#[async_trait]
impl super::Command for Register {
    fn context(&self) -> Context {
        Context::Auth
    }

    async fn execute(self, app: &App) -> Result<()> {
        let password = app.prompt.prompt(password::Request::new(&self.username)).await?;
        let confirmation = app
            .prompt
            .prompt(password::Request::confirm(&self.username))
            .await?;
        if password.expose_secret() != confirmation.expose_secret() {
            error!("The passwords entered do not match");
            return Err(error::Error::Command);
        }

        let session = auth::register(
            &app.gateway,
            &NewUser {
                username: self.username,
                email: self.email,
                password,
                first_name: self.first_name,
                last_name: self.last_name,
                phone_number: self.phone_number,
            },
        )
        .await?;
        println!("Welcome, {}!", session.user.display_name());
        Ok(())
    }
}

/// Show who is logged in.
#[derive(Debug, Parser)]
pub(crate) struct Whoami;

#[async_trait]
impl super::Command for Whoami {
    fn context(&self) -> Context {
        Context::General
    }

    async fn execute(self, app: &App) -> Result<()> {
        match app.gateway.store().load().await {
            Some(session) => println!(
                "{} (#{}, {})",
                session.user.username, session.user.id, session.user.role
            ),
            None => println!("Not logged in"),
        }
        Ok(())
    }
}
