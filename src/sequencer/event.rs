/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Turn lifecycle event types.
//!
//! This module defines the immutable event values emitted by the
//! [`TurnSequencer`] as the sequence advances: round, team and turn
//! boundaries plus skip notifications.
//!
//! [`TurnSequencer`]: super::core::TurnSequencer

use super::participant::{ParticipantId, TeamId};
use serde::{Deserialize, Serialize};

/// The kind of lifecycle event being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnEventKind {
    /// A new round has started.
    StartRound,

    /// The current round has ended.
    EndRound,

    /// The next participant's team is up; fired before each turn start
    /// as the sequence advances.
    StartTeam,

    /// The ending participant's team has no queued participants left.
    EndTeam,

    /// A participant's turn has started.
    StartTurn,

    /// A participant's turn has ended.
    EndTurn,

    /// The active order was changed by a skip operation. The subject is
    /// the participant whose turn it now is.
    SkipToNextParticipant,
}

/// Identity of the participant an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventSubject {
    /// Unique id of the subject participant.
    pub participant: ParticipantId,

    /// Team the subject participant belongs to.
    pub team: TeamId,
}

/// Immutable value describing a single lifecycle event.
///
/// Round-level events ([`StartRound`], [`EndRound`]) carry no subject;
/// all other kinds name the participant they concern.
///
/// # Examples
///
/// ```
/// use turnwheel::sequencer::{TurnEvent, TurnEventKind};
///
/// let event = TurnEvent::round_level(TurnEventKind::StartRound, 1);
/// assert!(event.is_round_level());
/// assert_eq!(event.round, 1);
/// ```
///
/// [`StartRound`]: TurnEventKind::StartRound
/// [`EndRound`]: TurnEventKind::EndRound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    /// What happened.
    pub kind: TurnEventKind,

    /// The round number the event belongs to.
    pub round: u32,

    /// The participant the event concerns, if any.
    pub subject: Option<EventSubject>,
}

impl TurnEvent {
    /// Creates an event with a subject participant.
    #[must_use]
    pub fn new(kind: TurnEventKind, round: u32, subject: EventSubject) -> Self {
        Self {
            kind,
            round,
            subject: Some(subject),
        }
    }

    /// Creates a round-level event with no subject.
    #[must_use]
    pub fn round_level(kind: TurnEventKind, round: u32) -> Self {
        Self {
            kind,
            round,
            subject: None,
        }
    }

    /// Returns `true` if the event carries no subject participant.
    #[inline]
    #[must_use]
    pub fn is_round_level(&self) -> bool {
        self.subject.is_none()
    }

    /// Returns `true` if the event's subject is the given participant.
    #[inline]
    #[must_use]
    pub fn concerns_participant(&self, id: ParticipantId) -> bool {
        self.subject.is_some_and(|s| s.participant == id)
    }

    /// Returns `true` if the event's subject belongs to the given team.
    #[inline]
    #[must_use]
    pub fn concerns_team(&self, team: TeamId) -> bool {
        self.subject.is_some_and(|s| s.team == team)
    }
}
