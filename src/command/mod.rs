// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use clap::ValueEnum;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    api::auth::{Authenticator, DemoAccounts, Remote},
    classify::Context,
    error::Result,
    gateway::Gateway,
    password,
};

pub(crate) mod account;
pub(crate) mod bookings;
pub(crate) mod favorites;
pub(crate) mod restaurants;
pub(crate) mod reviews;
pub(crate) mod watch;

/// Where `login` checks credentials.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum AuthMode {
    /// The built-in demonstration accounts.
    #[default]
    Demo,
    /// The backend's `/auth/login` endpoint.
    Remote,
}

/// Everything a command runs against.
pub(crate) struct App {
    pub(crate) gateway: Gateway,
    pub(crate) auth: AuthMode,
    pub(crate) prompt: Box<dyn password::Prompt>,
    pub(crate) poll_interval: Duration,
}

impl App {
    pub(crate) fn authenticator(&self) -> Box<dyn Authenticator + '_> {
        match self.auth {
            AuthMode::Demo => Box::new(DemoAccounts),
            AuthMode::Remote => Box::new(Remote::new(&self.gateway)),
        }
    }
}

#[async_trait]
pub(crate) trait Command {
    /// The message table failures of this command are reported with.
    fn context(&self) -> Context;

    async fn execute(self, app: &App) -> Result<()>;
}

pub(crate) fn print_table<I, T>(rows: I, empty: &str)
where
    I: IntoIterator<Item = T>,
    T: Tabled,
{
    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        println!("{empty}");
    } else {
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
}
