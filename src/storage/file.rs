// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::warn;
use tempfile::NamedTempFile;

use crate::{
    error::{self, Result},
    metadata,
};

use super::{IsPersistent, Storage};

type Entries = BTreeMap<String, String>;

/// Entries kept as a JSON object in a single file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a concurrent reader sees either the old or the new object.
pub(crate) struct File {
    path: PathBuf,
}

impl File {
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Option<Self> {
        metadata::PROJECT_DIRS.as_ref().map(|dirs| Self {
            path: dirs.data_dir().to_owned().join(file),
        })
    }

    pub(crate) fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Entries> {
        match fs::File::open(&self.path) {
            Ok(fp) => serde_json::from_reader::<fs::File, Entries>(fp).map_err(|e| {
                warn!("Session storage at {} is unreadable: {}", self.path.display(), e);
                error::Storage::Malformed(self.path.display().to_string()).into()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &Entries) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            Some(_) | None => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Every write stages through its own uniquely named sibling.
        let staging = NamedTempFile::new_in(parent)?;
        serde_json::to_writer(staging.as_file(), entries)?;
        staging.as_file().sync_all()?;
        let _ = staging.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl IsPersistent for File {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl Storage for File {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    async fn get_many(&mut self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let mut current = self.read()?;
        Ok(keys.iter().map(|key| current.remove(*key)).collect())
    }

    async fn update(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        // A malformed file is replaced rather than blocking every future login.
        let mut current = self.read().unwrap_or_default();
        for &(key, value) in entries {
            let _ = current.insert(key.to_owned(), value.to_owned());
        }
        self.write(&current)
    }

    async fn clear(&mut self, keys: &[&str]) -> Result<()> {
        let mut current = self.read().unwrap_or_default();
        for key in keys {
            let _ = current.remove(*key);
        }
        if current.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }
        self.write(&current)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Result;

    use super::*;

    #[tokio::test]
    async fn entries_survive_a_new_handle() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("session.json");

        File::at(&path)
            .update(&[("token", "abc"), ("user", "{}")])
            .await?;

        let mut reopened = File::at(&path);
        assert_eq!(reopened.get("token").await?.as_deref(), Some("abc"));
        assert_eq!(reopened.get("user").await?.as_deref(), Some("{}"));
        assert_eq!(reopened.get("missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn clearing_every_key_removes_the_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        let mut storage = File::at(&path);

        storage.update(&[("token", "abc"), ("user", "{}")]).await?;
        storage.clear(&["token"]).await?;
        assert!(path.exists());
        assert_eq!(storage.get("token").await?, None);

        storage.clear(&["user"]).await?;
        assert!(!path.exists());

        storage.clear(&["token", "user"]).await?;
        Ok(())
    }

    #[tokio::test]
    async fn batch_reads_come_from_one_snapshot() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        let mut storage = File::at(&path);

        storage.update(&[("token", "abc"), ("user", "{}")]).await?;
        assert_eq!(
            storage.get_many(&["user", "missing", "token"]).await?,
            vec![Some("{}".to_owned()), None, Some("abc".to_owned())]
        );
        Ok(())
    }

    #[test]
    fn concurrent_writers_in_one_process_do_not_collide() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");

        let results: Vec<Result<()>> = std::thread::scope(|scope| {
            let writers: Vec<_> = ["customer", "admin"]
                .into_iter()
                .map(|token| {
                    let storage = File::at(&path);
                    scope.spawn(move || {
                        let entries = Entries::from([("token".to_owned(), token.to_owned())]);
                        (0..50).try_for_each(|_| storage.write(&entries))
                    })
                })
                .collect();
            writers
                .into_iter()
                .map(|writer| writer.join().unwrap_or(Err(error::Error::Command)))
                .collect()
        });

        for result in results {
            result?;
        }
        let token = File::at(&path).read()?.remove("token");
        assert!(matches!(token.as_deref(), Some("customer" | "admin")));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_an_error_until_overwritten() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "not json")?;

        let mut storage = File::at(&path);
        assert!(storage.get("token").await.is_err());

        storage.update(&[("token", "abc")]).await?;
        assert_eq!(storage.get("token").await?.as_deref(), Some("abc"));
        Ok(())
    }
}
