/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Error types for sequencer operations.
//!
//! Two families exist: invalid operations, which are rejected without
//! touching state and are safe for the caller to recover from, and fatal
//! errors, which indicate either a broken configuration or a listener
//! failure mid-dispatch. [`TurnError::is_invalid_operation`] and
//! [`TurnError::is_fatal`] distinguish them.

use super::event::TurnEventKind;
use super::participant::ListenerError;
use thiserror::Error;

/// Errors returned by [`TurnSequencer`] operations.
///
/// [`TurnSequencer`]: super::core::TurnSequencer
#[derive(Debug, Error)]
pub enum TurnError {
    /// Skip operations are not available under the free-initiative order,
    /// where the queue is re-sorted every round.
    #[error("cannot skip participants under the free-initiative order")]
    SkipUnsupported,

    /// The listener is still registered as a participant; unregister it
    /// from play before removing it from the listener registry.
    #[error("removing an active participant from the listener registry is not allowed")]
    ListenerStillActive,

    /// `begin` was called with no participants registered.
    #[error("no participants registered; cannot begin the turn sequence")]
    NoParticipants,

    /// A round rollover produced an empty queue: every participant was
    /// unregistered and nothing replaced them.
    #[error("no active participants left in the turn sequence")]
    NoActiveParticipants,

    /// The operation needs a current participant and there is none, either
    /// because the sequence has not begun or because the current
    /// participant was unregistered.
    #[error("no current participant")]
    NoCurrentParticipant,

    /// A listener reaction failed; the event was only partially delivered.
    #[error("listener failed while handling a {kind:?} event")]
    Listener {
        /// The kind of event being dispatched when the listener failed.
        kind: TurnEventKind,
        /// The listener's own error.
        #[source]
        source: ListenerError,
    },
}

impl TurnError {
    /// Returns `true` for rejected operations the caller can recover from.
    #[inline]
    #[must_use]
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            Self::SkipUnsupported | Self::ListenerStillActive | Self::NoCurrentParticipant
        )
    }

    /// Returns `true` for unrecoverable errors that must not be swallowed.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !self.is_invalid_operation()
    }
}
