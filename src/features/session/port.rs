//! Persistence port for timed sessions.
//!
//! The tracker talks to storage only through [`SessionStore`]. Any backend
//! (the local SQLite adapter, a hosted table store) implements it.

use super::model::{ActivityKind, NewSession, SessionId, SessionUpdate, TimedSession};
use crate::error::TrackError;

/// Record store for timed sessions, keyed by id and filterable by user and kind.
///
/// Implementations report transport and backend failures as
/// [`TrackError::StorageUnavailable`].
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Insert a new open session and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn create_session(&self, new: &NewSession) -> Result<SessionId, TrackError>;

    /// Apply a partial update to a session.
    ///
    /// Closed sessions accept only an update that reopens them.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::SessionClosed`] if the session was closed
    /// meanwhile, [`TrackError::NotFound`] if it does not exist, or a storage
    /// error.
    fn update_session(&self, id: SessionId, update: &SessionUpdate) -> Result<(), TrackError>;

    /// The most recent open session for `user_id` and `kind`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_open_session(
        &self,
        user_id: &str,
        kind: ActivityKind,
    ) -> Result<Option<TimedSession>, TrackError>;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be deleted or does not exist.
    fn delete_session(&self, id: SessionId) -> Result<(), TrackError>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn create_session(&self, new: &NewSession) -> Result<SessionId, TrackError> {
        (**self).create_session(new)
    }

    fn update_session(&self, id: SessionId, update: &SessionUpdate) -> Result<(), TrackError> {
        (**self).update_session(id, update)
    }

    fn find_open_session(
        &self,
        user_id: &str,
        kind: ActivityKind,
    ) -> Result<Option<TimedSession>, TrackError> {
        (**self).find_open_session(user_id, kind)
    }

    fn delete_session(&self, id: SessionId) -> Result<(), TrackError> {
        (**self).delete_session(id)
    }
}
