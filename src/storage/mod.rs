// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Durable key/value entries under a single storage domain.
//!
//! Every backend applies a batch of reads, writes or removals as one
//! operation, so readers (including other processes sharing a [`File`]) never
//! observe half of a batch.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub(crate) use file::File;
pub(crate) use memory::Memory;

pub(crate) trait IsPersistent {
    fn is_persistent(&self) -> bool;
}

impl<T: IsPersistent + ?Sized> IsPersistent for Box<T> {
    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }
}

#[async_trait]
pub(crate) trait Storage: Send + Sync + IsPersistent {
    async fn get(&mut self, key: &str) -> Result<Option<String>>;
    /// Reads every key in `keys` from one snapshot of the domain.
    async fn get_many(&mut self, keys: &[&str]) -> Result<Vec<Option<String>>>;
    async fn update(&mut self, entries: &[(&str, &str)]) -> Result<()>;
    async fn clear(&mut self, keys: &[&str]) -> Result<()>;
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Box<T> {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn get_many(&mut self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        (**self).get_many(keys).await
    }

    async fn update(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).update(entries).await
    }

    async fn clear(&mut self, keys: &[&str]) -> Result<()> {
        (**self).clear(keys).await
    }
}
