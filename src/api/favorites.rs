// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{classify::Context, error, gateway::Request};

use super::{display_option, Executor};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Favorite {
    #[tabled(skip)]
    pub(crate) id: u64,
    #[tabled(skip)]
    pub(crate) user_id: u64,
    #[tabled(rename = "Restaurant ID")]
    pub(crate) restaurant_id: u64,
    #[serde(default)]
    #[tabled(rename = "Name", display_with = "display_option")]
    pub(crate) restaurant_name: Option<String>,
    #[serde(default)]
    #[tabled(rename = "City", display_with = "display_option")]
    pub(crate) restaurant_city: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Cuisine", display_with = "display_option")]
    pub(crate) restaurant_cuisine: Option<String>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) restaurant_image_url: Option<String>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) created_at: Option<NaiveDateTime>,
}

pub(crate) struct ForUser {
    pub(crate) user_id: u64,
}

impl From<ForUser> for Request {
    fn from(value: ForUser) -> Self {
        Self::get(format!("/favorites/user/{}", value.user_id)).with_context(Context::Favorites)
    }
}

impl Executor for ForUser {
    type Response = Vec<Favorite>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Add {
    pub(crate) user_id: u64,
    pub(crate) restaurant_id: u64,
}

impl TryFrom<Add> for Request {
    type Error = error::Error;

    fn try_from(value: Add) -> Result<Self, Self::Error> {
        Ok(Self::post("/favorites")
            .with_json(&value)?
            .with_context(Context::Favorites))
    }
}

impl Executor for Add {
    type Response = Favorite;
}

pub(crate) struct Remove {
    pub(crate) user_id: u64,
    pub(crate) restaurant_id: u64,
}

impl From<Remove> for Request {
    fn from(value: Remove) -> Self {
        Self::delete(format!(
            "/favorites/user/{}/restaurant/{}",
            value.user_id, value.restaurant_id
        ))
        .with_context(Context::Favorites)
    }
}

impl Executor for Remove {
    type Response = ();
}

pub(crate) struct IsFavorited {
    pub(crate) user_id: u64,
    pub(crate) restaurant_id: u64,
}

impl From<IsFavorited> for Request {
    fn from(value: IsFavorited) -> Self {
        Self::get(format!(
            "/favorites/user/{}/restaurant/{}",
            value.user_id, value.restaurant_id
        ))
        .with_context(Context::Favorites)
    }
}

impl Executor for IsFavorited {
    type Response = bool;
}
