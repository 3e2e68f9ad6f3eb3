// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The logged-in user's favorite restaurants.

use std::collections::HashSet;

use log::debug;

use crate::{
    api::{
        favorites::{Add, ForUser, Remove},
        Executor as _,
    },
    classify::Context,
    error::Result,
    gateway::Gateway,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Toggled {
    Added,
    Removed,
}

#[derive(Debug, Default)]
pub(crate) struct Favorites {
    restaurants: HashSet<u64>,
}

impl Favorites {
    /// Fetches the favorites of whoever is logged in. Logged out, the set is
    /// empty and nothing is requested.
    pub(crate) async fn load(gateway: &Gateway) -> Result<Self> {
        let Some(session) = gateway.store().load().await else {
            return Ok(Self::default());
        };
        let favorites = ForUser {
            user_id: session.user.id,
        }
        .execute(gateway)
        .await?;
        Ok(Self {
            restaurants: favorites.into_iter().map(|f| f.restaurant_id).collect(),
        })
    }

    pub(crate) fn contains(&self, restaurant_id: u64) -> bool {
        self.restaurants.contains(&restaurant_id)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.restaurants.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Adds or removes `restaurant_id`. Without a session this fails before
    /// anything is sent.
    pub(crate) async fn toggle(&mut self, gateway: &Gateway, restaurant_id: u64) -> Result<Toggled> {
        let session = gateway.require_session(Context::Favorites).await?;
        let user_id = session.user.id;

        if self.contains(restaurant_id) {
            Remove {
                user_id,
                restaurant_id,
            }
            .execute(gateway)
            .await?;
            let _ = self.restaurants.remove(&restaurant_id);
            debug!("Removed restaurant {} from favorites", restaurant_id);
            Ok(Toggled::Removed)
        } else {
            let _ = Add {
                user_id,
                restaurant_id,
            }
            .execute(gateway)
            .await?;
            let _ = self.restaurants.insert(restaurant_id);
            debug!("Added restaurant {} to favorites", restaurant_id);
            Ok(Toggled::Added)
        }
    }
}
