// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Turns failed calls into messages that are safe to show to the user.
//!
//! Status codes are mapped to text through static tables, one per
//! [`Context`], with a shared default table behind them. Technical details of
//! the failure only ever go to the log.

use std::{fmt, str::FromStr};

use log::debug;
use reqwest::StatusCode;

use crate::error::{self, Error};

pub(crate) const CONNECTIVITY: &str = "Network error. Please check your connection and try again.";
pub(crate) const FALLBACK: &str = "Something went wrong. Please try again later.";
const BOOKING: &str = "Bookings not available at the moment. Please try again later.";

/// The caller-supplied label that selects a message table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Context {
    Booking,
    Favorites,
    Reviews,
    Restaurants,
    Auth,
    #[default]
    General,
}

impl Context {
    pub(crate) const fn tag(self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Favorites => "favorites",
            Self::Reviews => "reviews",
            Self::Restaurants => "restaurants",
            Self::Auth => "auth",
            Self::General => "general",
        }
    }

    const fn table(self) -> &'static [(StatusMatch, &'static str)] {
        match self {
            Self::Booking => &[(StatusMatch::Any, BOOKING)],
            Self::Favorites => &[
                (StatusMatch::Exact(400), "Unable to update favorites. Please try again later."),
                (StatusMatch::Exact(500), "Unable to update favorites. Please try again later."),
                (StatusMatch::Exact(401), "Please login to manage favorites"),
            ],
            Self::Reviews => &[
                (StatusMatch::Exact(400), "Unable to submit review. Please try again later."),
                (StatusMatch::Exact(500), "Unable to submit review. Please try again later."),
                (StatusMatch::Exact(401), "Please login to submit a review"),
            ],
            Self::Restaurants => &[
                (StatusMatch::Exact(400), "Unable to load restaurants. Please try again later."),
                (StatusMatch::Exact(500), "Unable to load restaurants. Please try again later."),
            ],
            Self::Auth => &[
                (
                    StatusMatch::Exact(401),
                    "Invalid credentials. Please check your login details.",
                ),
                (
                    StatusMatch::Exact(400),
                    "Invalid request. Please check your information.",
                ),
            ],
            Self::General => &[],
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Context {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "booking" => Self::Booking,
            "favorites" => Self::Favorites,
            "reviews" => Self::Reviews,
            "restaurants" => Self::Restaurants,
            "auth" => Self::Auth,
            _ => Self::General,
        })
    }
}

#[derive(Copy, Clone, Debug)]
enum StatusMatch {
    Any,
    Exact(u16),
    AtLeast(u16),
}

impl StatusMatch {
    const fn matches(self, status: u16) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(code) => status == code,
            Self::AtLeast(code) => status >= code,
        }
    }
}

const DEFAULT_TABLE: &[(StatusMatch, &str)] = &[
    (StatusMatch::AtLeast(500), "Server error. Please try again later."),
    (StatusMatch::Exact(404), "Requested resource not found."),
    (
        StatusMatch::Exact(403),
        "You do not have permission to perform this action.",
    ),
    (StatusMatch::Exact(401), "Please login to continue."),
    (StatusMatch::AtLeast(400), "Request failed. Please try again."),
];

fn lookup(table: &'static [(StatusMatch, &'static str)], status: u16) -> Option<&'static str> {
    table
        .iter()
        .find(|&&(matcher, _)| matcher.matches(status))
        .map(|&(_, message)| message)
}

fn message_for_status(status: StatusCode, context: Context) -> &'static str {
    let code = status.as_u16();
    lookup(context.table(), code)
        .or_else(|| lookup(DEFAULT_TABLE, code))
        .unwrap_or(FALLBACK)
}

/// The user-facing message for a failed gateway call.
pub(crate) fn classify(failure: &error::Api, context: Context) -> &'static str {
    debug!("Classifying failure in {} context: {}", context, failure);

    if failure.is_connectivity() {
        return CONNECTIVITY;
    }
    failure
        .status()
        .map_or(FALLBACK, |status| message_for_status(status, context))
}

/// The user-facing message for any error surfaced by a command.
pub(crate) fn message(error: &Error, context: Context) -> &'static str {
    // LINT: Every local error without a table entry shares the fallback.
    #[allow(clippy::wildcard_enum_match_arm)]
    match *error {
        Error::Api(ref failure) => classify(failure, context),
        Error::LoginRequired(required) => message_for_status(StatusCode::UNAUTHORIZED, required),
        Error::AdminRequired => message_for_status(StatusCode::FORBIDDEN, context),
        Error::InvalidCredentials => "Invalid username or password",
        Error::Rejected(_) => message_for_status(StatusCode::BAD_REQUEST, context),
        _ => FALLBACK,
    }
}

/// The error taxonomy, independent of any context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Category {
    Connectivity,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    ClientRequestError,
    Unclassified,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Connectivity => "Connectivity",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::ServerError => "Server",
            Self::ClientRequestError => "Client request",
            Self::Unclassified => "Unclassified",
        })
    }
}

impl Category {
    pub(crate) fn of(failure: &error::Api) -> Self {
        if failure.is_connectivity() {
            return Self::Connectivity;
        }
        match failure.status().map(|status| status.as_u16()) {
            Some(401) => Self::Unauthorized,
            Some(403) => Self::Forbidden,
            Some(404) => Self::NotFound,
            Some(code) if code >= 500 => Self::ServerError,
            Some(code) if code >= 400 => Self::ClientRequestError,
            Some(_) | None => Self::Unclassified,
        }
    }
}
