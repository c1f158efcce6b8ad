//! `SessionStore` capability and the in-memory implementation.

use std::sync::Mutex;

use anyhow::{Result, anyhow};

use super::GuestSession;

/// Persistent storage for the current guest session.
///
/// Implementations hold at most one session.
#[allow(clippy::module_name_repetitions)]
pub trait SessionStore {
    /// Reads the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn read(&self) -> Result<Option<GuestSession>>;

    /// Replaces the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn write(&self, session: &GuestSession) -> Result<()>;

    /// Removes the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<()>;
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct MemorySessionStore {
    session: Mutex<Option<GuestSession>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `session`.
    #[must_use]
    pub const fn with_session(session: GuestSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Result<Option<GuestSession>> {
        let guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn write(&self, session: &GuestSession) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
