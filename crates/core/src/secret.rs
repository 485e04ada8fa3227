//! Shared, rotatable API credentials.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::{AppError, AppResult};

/// A credential that can be replaced while clients holding it stay alive.
///
/// Clones share the same underlying value: rotating through one handle is
/// observed by every client on its next request.
#[derive(Clone)]
pub struct SharedSecret {
    inner: Arc<RwLock<String>>,
}

impl SharedSecret {
    /// Create a secret, rejecting empty values.
    pub fn new(value: impl Into<String>, label: &str) -> AppResult<Self> {
        let value = validate(value.into(), label)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(value)),
        })
    }

    /// Current value of the secret.
    pub fn get(&self) -> String {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the secret for all subsequent reads.
    pub fn rotate(&self, value: impl Into<String>, label: &str) -> AppResult<()> {
        let value = validate(value.into(), label)?;
        match self.inner.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
        tracing::debug!("Rotated {}", label);
        Ok(())
    }
}

fn validate(value: String, label: &str) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::Config(format!("Missing {}", label)));
    }
    Ok(value)
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}
