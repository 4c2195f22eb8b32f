use std::{io::ErrorKind, path::PathBuf};

use crate::{Res, config, types::Credential};

/// Durable home of the bearer token.
///
/// The whole file content is the token; no expiry is stored because expiry is
/// only ever discovered through a rejected API call.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &config::Config) -> Self {
        Self::new(config.token_path.clone())
    }

    /// Reads the stored token. A missing or blank file yields `None`.
    pub async fn load(&self) -> Res<Option<Credential>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let token = content.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(Credential::new(token)))
    }

    pub async fn save(&self, credential: &Credential) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&self.path, credential.as_str()).await?;
        tracing::debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    /// Whether a usable token is stored. Read failures are reported, not hidden.
    pub async fn is_present(&self) -> Res<bool> {
        Ok(self.load().await?.is_some())
    }

    /// Forgets the stored token so it is never sent again.
    pub async fn clear(&self) -> Res<()> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
