// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Typed requests for every backend endpoint.
//!
//! Each endpoint is a struct that converts into a gateway [`Request`] and
//! names the type its response decodes to.

pub(crate) mod auth;
pub(crate) mod bookings;
pub(crate) mod favorites;
pub(crate) mod restaurants;
pub(crate) mod reviews;

use std::fmt::Display;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    error::{self, Result},
    gateway::{Gateway, Request},
};

#[async_trait]
pub(crate) trait Executor {
    type Response;

    async fn execute(self, gateway: &Gateway) -> Result<Self::Response>
    where
        Self: TryInto<Request> + Send + Sized,
        error::Error: From<<Self as TryInto<Request>>::Error>,
        Self::Response: DeserializeOwned,
    {
        let req = self.try_into()?;
        Ok(gateway.send(req).await?.json()?)
    }
}

pub(crate) fn display_option<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(String::new, ToString::to_string)
}
