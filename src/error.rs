// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{convert::Infallible, io, result};

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::classify::Context;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API error: {0}")]
    Api(#[from] Api),
    #[error("storage error: {0}")]
    Storage(#[from] Storage),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    Rejected(String),
    #[error("you need to log in before using {0}")]
    LoginRequired(Context),
    #[error("this operation requires an administrator account")]
    AdminRequired,
    #[error("command execution failed")]
    Command,
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

impl From<Infallible> for Error {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

/// A failed call through the gateway.
#[derive(Error, Debug)]
pub(crate) enum Api {
    #[error("no response from {url}: {source}")]
    Connectivity {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status {
        status: StatusCode,
        url: Url,
        body: String,
    },
    #[error("could not build request: {0}")]
    Request(reqwest::Error),
    #[error("invalid request target {target}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

impl Api {
    /// The HTTP status of the failure, if the server responded at all.
    pub(crate) const fn status(&self) -> Option<StatusCode> {
        match *self {
            Self::Status { status, .. } => Some(status),
            Self::Connectivity { .. }
            | Self::Request(_)
            | Self::InvalidTarget { .. }
            | Self::Decode { .. } => None,
        }
    }

    pub(crate) const fn is_connectivity(&self) -> bool {
        matches!(*self, Self::Connectivity { .. })
    }
}

#[derive(Error, Debug)]
pub(crate) enum Storage {
    #[error("no data directory is available for this user")]
    NoDataDirectory,
    #[error("storage file {0} is not a JSON object")]
    Malformed(String),
}
