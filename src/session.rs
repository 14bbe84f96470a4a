use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::api::WarehousemanApi;
use crate::error::SessionError;
use crate::models::Session;

/// Signs a warehouseman in by matching their secret key against the roster.
pub async fn login<A>(api: &A, secret_key: &str) -> Result<Session, SessionError>
where
    A: WarehousemanApi + ?Sized,
{
    if secret_key.is_empty() {
        return Err(SessionError::InvalidSecretKey);
    }

    let warehousemen = api.list_warehousemen().await?;
    let warehouseman = warehousemen
        .into_iter()
        .find(|candidate| candidate.secret_key == secret_key)
        .ok_or_else(|| {
            warn!("Login attempt with unknown secret key");
            SessionError::InvalidSecretKey
        })?;

    info!(
        "Warehouseman {} signed in for warehouse {}",
        warehouseman.id, warehouseman.warehouse_id
    );
    Ok(Session::from(warehouseman))
}

/// Where the signed-in session survives between runs.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, bytes)?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
