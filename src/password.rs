// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task;

use crate::error::Result;

#[derive(Debug, Clone)]
pub(crate) struct Request {
    label: String,
}

impl Request {
    pub(crate) fn new(username: &str) -> Self {
        Self {
            label: format!("Password for {username}: "),
        }
    }

    pub(crate) fn confirm(username: &str) -> Self {
        Self {
            label: format!("Confirm password for {username}: "),
        }
    }
}

#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, req: Request) -> Result<SecretString>;
}

/// Reads a password from the terminal without echoing it.
pub(crate) struct RpasswordPrompt;

#[async_trait]
impl Prompt for RpasswordPrompt {
    async fn prompt(&self, req: Request) -> Result<SecretString> {
        Ok(
            task::spawn_blocking(move || rpassword::prompt_password(req.label).map(SecretString::new))
                .await??,
        )
    }
}
