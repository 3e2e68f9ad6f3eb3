// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Subcommand;

use crate::{
    api::{favorites, Executor as _},
    classify::Context,
    error::Result,
    favorites::{Favorites, Toggled},
};

use super::{print_table, App};

/// Keep a list of restaurants you like.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Your favorite restaurants.
    List,
    /// Add a restaurant to your favorites, or remove it if it is already
    /// there.
    Toggle { restaurant_id: u64 },
}

#[async_trait]
impl super::Command for Command {
    fn context(&self) -> Context {
        Context::Favorites
    }

    async fn execute(self, app: &App) -> Result<()> {
        let gateway = &app.gateway;
        match self {
            Self::List => {
                let session = gateway.require_session(Context::Favorites).await?;
                print_table(
                    favorites::ForUser {
                        user_id: session.user.id,
                    }
                    .execute(gateway)
                    .await?,
                    "You have no favorites yet",
                );
            }
            Self::Toggle { restaurant_id } => {
                let mut favorites = Favorites::load(gateway).await?;
                match favorites.toggle(gateway, restaurant_id).await? {
                    Toggled::Added => println!("Added restaurant {restaurant_id} to favorites"),
                    Toggled::Removed => {
                        println!("Removed restaurant {restaurant_id} from favorites");
                    }
                }
            }
        }
        Ok(())
    }
}
