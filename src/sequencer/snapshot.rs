/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Serialization-friendly projection of sequencer state.
//!
//! [`TurnSnapshot`] is a plain, point-in-time copy of everything needed to
//! describe the sequence externally: the current participant and round, the
//! id counter, the ordering policy, the pending queue, and the team index,
//! all by participant id. It is a read-only projection; the sequencer has
//! no restore path.

use super::core::TurnOrder;
use super::participant::{ParticipantId, TeamId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Plain snapshot of a [`TurnSequencer`]'s state.
///
/// # Examples
///
/// ```
/// use turnwheel::sequencer::{TurnOrder, TurnSequencer};
///
/// let sequencer = TurnSequencer::new(TurnOrder::Default);
/// let snapshot = sequencer.snapshot();
/// assert_eq!(snapshot.current_round, 0);
/// assert!(snapshot.pending.is_empty());
/// ```
///
/// [`TurnSequencer`]: super::core::TurnSequencer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Id of the current participant, if a turn is in progress.
    pub current_participant_id: Option<ParticipantId>,

    /// The current round number.
    pub current_round: u32,

    /// Highest participant id assigned so far.
    pub max_id: u32,

    /// The ordering policy the sequencer was created with.
    pub turn_order: TurnOrder,

    /// Ids of the participants still owed a turn this round, in order.
    pub pending: Vec<ParticipantId>,

    /// Team index as ordered participant ids, in team insertion order.
    pub teams: IndexMap<TeamId, Vec<ParticipantId>>,
}

impl TurnSnapshot {
    /// Serializes the snapshot to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
