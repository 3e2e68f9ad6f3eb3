// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{
    classify::Context,
    error,
    gateway::Request,
};

use super::{display_option, Executor};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Restaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "ID", display_with = "display_option")]
    pub(crate) id: Option<u64>,
    #[serde(default)]
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(skip)]
    pub(crate) description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(skip)]
    pub(crate) address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "City", display_with = "display_option")]
    pub(crate) city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "Cuisine", display_with = "display_option")]
    pub(crate) cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "Rating", display_with = "display_option")]
    pub(crate) rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "Price", display_with("Self::format_price", self))]
    pub(crate) price_range: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(skip)]
    pub(crate) phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(skip)]
    pub(crate) website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(skip)]
    pub(crate) image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(skip)]
    pub(crate) is_active: Option<bool>,
    #[serde(default, skip_serializing)]
    #[tabled(rename = "Bookings", display_with = "display_option")]
    pub(crate) total_bookings: Option<u64>,
    #[serde(default, skip_serializing)]
    #[tabled(rename = "Reviews", display_with = "display_option")]
    pub(crate) total_reviews: Option<u64>,
}

impl Restaurant {
    fn format_price(&self) -> String {
        self.price_range
            .map(|n| "$".repeat(usize::from(n.clamp(1, 4))))
            .unwrap_or_default()
    }
}

/// Filters for the structured search. Empty filters are left off the query.
#[derive(Clone, Debug, Default)]
pub(crate) struct Search {
    pub(crate) city: Option<String>,
    pub(crate) cuisine: Option<String>,
    pub(crate) min_rating: Option<f64>,
}

impl From<Search> for Request {
    fn from(value: Search) -> Self {
        let mut req = Self::get("/restaurants/search").with_context(Context::Restaurants);
        if let Some(city) = value.city.filter(|s| !s.is_empty()) {
            req = req.with_query("city", city);
        }
        if let Some(cuisine) = value.cuisine.filter(|s| !s.is_empty()) {
            req = req.with_query("cuisine", cuisine);
        }
        if let Some(min_rating) = value.min_rating {
            req = req.with_query("minRating", min_rating);
        }
        req
    }
}

impl Executor for Search {
    type Response = Vec<Restaurant>;
}

pub(crate) struct GetAll;

impl From<GetAll> for Request {
    fn from(_: GetAll) -> Self {
        Self::get("/restaurants").with_context(Context::Restaurants)
    }
}

impl Executor for GetAll {
    type Response = Vec<Restaurant>;
}

pub(crate) struct Get {
    pub(crate) id: u64,
}

impl From<Get> for Request {
    fn from(value: Get) -> Self {
        Self::get(format!("/restaurants/{}", value.id)).with_context(Context::Restaurants)
    }
}

impl Executor for Get {
    type Response = Restaurant;
}

pub(crate) struct SearchText {
    pub(crate) query: String,
}

impl From<SearchText> for Request {
    fn from(value: SearchText) -> Self {
        Self::get("/restaurants/search/text")
            .with_query("q", value.query)
            .with_context(Context::Restaurants)
    }
}

impl Executor for SearchText {
    type Response = Vec<Restaurant>;
}

pub(crate) struct TopRated;

impl From<TopRated> for Request {
    fn from(_: TopRated) -> Self {
        Self::get("/restaurants/top-rated").with_context(Context::Restaurants)
    }
}

impl Executor for TopRated {
    type Response = Vec<Restaurant>;
}

pub(crate) struct MostBooked;

impl From<MostBooked> for Request {
    fn from(_: MostBooked) -> Self {
        Self::get("/restaurants/most-booked").with_context(Context::Restaurants)
    }
}

impl Executor for MostBooked {
    type Response = Vec<Restaurant>;
}

pub(crate) struct Create {
    pub(crate) restaurant: Restaurant,
}

impl TryFrom<Create> for Request {
    type Error = error::Error;

    fn try_from(value: Create) -> Result<Self, Self::Error> {
        Ok(Self::post("/restaurants")
            .with_json(&value.restaurant)?
            .with_context(Context::Restaurants))
    }
}

impl Executor for Create {
    type Response = Restaurant;
}

pub(crate) struct Update {
    pub(crate) id: u64,
    pub(crate) restaurant: Restaurant,
}

impl TryFrom<Update> for Request {
    type Error = error::Error;

    fn try_from(value: Update) -> Result<Self, Self::Error> {
        Ok(Self::put(format!("/restaurants/{}", value.id))
            .with_json(&value.restaurant)?
            .with_context(Context::Restaurants))
    }
}

impl Executor for Update {
    type Response = Restaurant;
}

pub(crate) struct Delete {
    pub(crate) id: u64,
}

impl From<Delete> for Request {
    fn from(value: Delete) -> Self {
        Self::delete(format!("/restaurants/{}", value.id)).with_context(Context::Restaurants)
    }
}

impl Executor for Delete {
    type Response = ();
}
