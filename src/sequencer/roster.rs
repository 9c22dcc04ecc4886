/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Ordered grouping of participants by team.
//!
//! [`TeamRoster`] owns the persistent team order: a mapping from team id to
//! an ordered sequence of participants, where the sequence order encodes
//! turn precedence within the team and survives across rounds. Team
//! iteration order is the insertion order of team ids.
//!
//! Invariant: a participant appears in at most one team's sequence, and at
//! most once within it. Membership is pointer identity of the shared
//! handle, so the invariant holds even before an id is assigned.

use super::participant::{Participant, ParticipantId, TeamId};
use indexmap::IndexMap;
use std::ptr;
use std::sync::Arc;

/// Returns `true` if both handles point at the same participant.
#[inline]
pub(super) fn same_participant(a: &Arc<dyn Participant>, b: &Arc<dyn Participant>) -> bool {
    ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Ordered index of participants grouped by team id.
#[derive(Default)]
pub struct TeamRoster {
    teams: IndexMap<TeamId, Vec<Arc<dyn Participant>>>,
}

impl TeamRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            teams: IndexMap::new(),
        }
    }

    /// Adds a participant to its team's sequence.
    ///
    /// Appends by default, or prepends when `insert_first` is set. Creates
    /// the team sequence if this is the first member of that team. No-op if
    /// the participant is already present in its team.
    pub fn add(&mut self, participant: Arc<dyn Participant>, insert_first: bool) {
        let team = self.teams.entry(participant.team_id()).or_default();
        if team.iter().any(|p| same_participant(p, &participant)) {
            return;
        }
        if insert_first {
            team.insert(0, participant);
        } else {
            team.push(participant);
        }
    }

    /// Removes a participant from whichever team sequence contains it.
    ///
    /// No-op if the participant is not in the roster. The team entry itself
    /// is kept even when it becomes empty, preserving team iteration order
    /// for later re-registrations.
    pub fn remove(&mut self, participant: &Arc<dyn Participant>) {
        for team in self.teams.values_mut() {
            team.retain(|p| !same_participant(p, participant));
        }
    }

    /// Finds a participant by its assigned id, scanning across teams.
    #[must_use]
    pub fn find(&self, id: ParticipantId) -> Option<Arc<dyn Participant>> {
        self.teams
            .values()
            .flatten()
            .find(|p| p.participant_id() == id)
            .cloned()
    }

    /// Returns `true` if the participant is present in any team.
    #[must_use]
    pub fn contains(&self, participant: &Arc<dyn Participant>) -> bool {
        self.teams
            .values()
            .flatten()
            .any(|p| same_participant(p, participant))
    }

    /// Flattens all teams into one sequence in team-then-position order.
    #[must_use]
    pub fn flatten(&self) -> Vec<Arc<dyn Participant>> {
        self.teams.values().flatten().cloned().collect()
    }

    /// Reverses the intra-team order of every team in place.
    pub fn reverse_all_teams(&mut self) {
        for team in self.teams.values_mut() {
            team.reverse();
        }
    }

    /// Iterates over teams in insertion order.
    pub fn teams(&self) -> impl Iterator<Item = (TeamId, &[Arc<dyn Participant>])> {
        self.teams.iter().map(|(id, members)| (*id, members.as_slice()))
    }

    /// Total number of participants across all teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.values().map(Vec::len).sum()
    }

    /// Returns `true` if no participants are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
