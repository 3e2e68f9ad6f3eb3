// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{classify::Context, error, gateway::Request};

use super::{display_option, Executor};

#[derive(Clone, Debug, PartialEq, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Review {
    #[tabled(rename = "ID")]
    pub(crate) id: u64,
    #[tabled(skip)]
    pub(crate) user_id: u64,
    #[tabled(rename = "Restaurant ID")]
    pub(crate) restaurant_id: u64,
    #[serde(default)]
    #[tabled(rename = "By", display_with = "display_option")]
    pub(crate) user_name: Option<String>,
    #[tabled(rename = "Rating")]
    pub(crate) rating: f64,
    #[serde(default)]
    #[tabled(rename = "Review", display_with = "display_option")]
    pub(crate) review_text: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Written", display_with = "display_option")]
    pub(crate) created_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewReview {
    pub(crate) user_id: u64,
    pub(crate) restaurant_id: u64,
    pub(crate) rating: f64,
    pub(crate) review_text: String,
}

pub(crate) struct GetAll;

impl From<GetAll> for Request {
    fn from(_: GetAll) -> Self {
        Self::get("/reviews").with_context(Context::Reviews)
    }
}

impl Executor for GetAll {
    type Response = Vec<Review>;
}

pub(crate) struct ForRestaurant {
    pub(crate) restaurant_id: u64,
}

impl From<ForRestaurant> for Request {
    fn from(value: ForRestaurant) -> Self {
        Self::get(format!("/reviews/restaurant/{}", value.restaurant_id))
            .with_context(Context::Reviews)
    }
}

impl Executor for ForRestaurant {
    type Response = Vec<Review>;
}

pub(crate) struct ForUser {
    pub(crate) user_id: u64,
}

impl From<ForUser> for Request {
    fn from(value: ForUser) -> Self {
        Self::get(format!("/reviews/user/{}", value.user_id)).with_context(Context::Reviews)
    }
}

impl Executor for ForUser {
    type Response = Vec<Review>;
}

pub(crate) struct Create {
    pub(crate) review: NewReview,
}

impl TryFrom<Create> for Request {
    type Error = error::Error;

    fn try_from(value: Create) -> Result<Self, Self::Error> {
        Ok(Self::post("/reviews")
            .with_json(&value.review)?
            .with_context(Context::Reviews))
    }
}

impl Executor for Create {
    type Response = Review;
}

pub(crate) struct Update {
    pub(crate) review_id: u64,
    pub(crate) review: NewReview,
}

impl TryFrom<Update> for Request {
    type Error = error::Error;

    fn try_from(value: Update) -> Result<Self, Self::Error> {
        Ok(Self::put(format!("/reviews/{}", value.review_id))
            .with_json(&value.review)?
            .with_context(Context::Reviews))
    }
}

impl Executor for Update {
    type Response = Review;
}

pub(crate) struct Delete {
    pub(crate) review_id: u64,
}

impl From<Delete> for Request {
    fn from(value: Delete) -> Self {
        Self::delete(format!("/reviews/{}", value.review_id)).with_context(Context::Reviews)
    }
}

impl Executor for Delete {
    type Response = ();
}
