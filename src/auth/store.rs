use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{Credential, Session};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a session credential survives between page loads or command runs.
pub trait TokenStore {
    fn load(&self) -> Result<Option<Credential>, StoreError>;

    fn save(&mut self, session: &Session) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    email: String,
}

/// JSON file holding the credential of the terminal client.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Email recorded alongside the stored credential, if any.
    pub fn email(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.map(|stored| stored.email))
    }

    fn read(&self) -> Result<Option<StoredToken>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.read()?.map(|stored| Credential::new(stored.token)))
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let stored = StoredToken {
            token: session.credential.as_str().to_string(),
            email: session.user.email.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Store that keeps the credential in memory only.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    credential: Option<Credential>,
}

#[cfg(test)]
impl MemoryTokenStore {
    pub fn with_credential(credential: Credential) -> Self {
        MemoryTokenStore {
            credential: Some(credential),
        }
    }
}

#[cfg(test)]
impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.credential.clone())
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        self.credential = Some(session.credential.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.credential = None;
        Ok(())
    }
}
