// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::info;

use crate::{
    classify::Context,
    error::Result,
    session::Session,
    view::SessionView,
};

use super::App;

/// Print every login and logout until interrupted.
#[derive(Debug, Parser)]
pub(crate) struct Watch;

fn describe(session: Option<&Session>) -> String {
    session.map_or_else(
        || "Logged out".to_owned(),
        |session| format!("Logged in as {} ({})", session.user.username, session.user.role),
    )
}

#[async_trait]
impl super::Command for Watch {
    fn context(&self) -> Context {
        Context::General
    }

    async fn execute(self, app: &App) -> Result<()> {
        let mut view = SessionView::attach(
            app.gateway.store().clone(),
            app.gateway.bus(),
            app.poll_interval,
        )
        .await;
        println!("{}", describe(view.current().as_ref()));

        loop {
            tokio::select! {
                session = view.changed() => println!("{}", describe(session.as_ref())),
                interrupted = tokio::signal::ctrl_c() => {
                    interrupted?;
                    info!("Stopped watching the session");
                    break;
                }
            }
        }
        view.detach();
        Ok(())
    }
}
