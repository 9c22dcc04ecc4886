/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Core turn sequencer implementation.
//!
//! [`TurnSequencer`] owns the current round and participant, the pending
//! queue, the team roster, and the listener registry. It implements
//! registration, turn advancement, round rollover, skip operations, and
//! priority-ordered event dispatch.

use super::error::TurnError;
use super::event::{EventSubject, TurnEvent, TurnEventKind};
use super::participant::{Participant, ParticipantId, TurnEventListener};
use super::roster::{TeamRoster, same_participant};
use super::snapshot::TurnSnapshot;
use serde::{Deserialize, Serialize};
use std::ptr;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Policy deciding the pending-queue order at each round rollover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOrder {
    /// Participants act grouped by team, in registration order, every round.
    #[default]
    Default,

    /// Like `Default`, but each team's intra-team order reverses every
    /// round after the first, so the last participant becomes first.
    PingPong,

    /// Participants act in ascending initiative order, re-sorted every
    /// round; team grouping is not preserved.
    FreeInitiative,
}

/// One priority-sorted slot in the listener registry.
///
/// The registry holds weak references: registered participants are kept
/// alive by the roster, observer-only listeners by their owner. Entries
/// whose listener has been released are pruned at the next dispatch.
struct ListenerEntry {
    priority: i32,
    listener: Weak<dyn TurnEventListener>,
}

impl ListenerEntry {
    fn points_to(&self, listener: &Arc<dyn TurnEventListener>) -> bool {
        ptr::addr_eq(self.listener.as_ptr(), Arc::as_ptr(listener))
    }
}

/// Sequences turns among teams of participants under a configurable
/// ordering policy, notifying listeners of lifecycle events in descending
/// priority order.
///
/// All operations run on a single logical thread of control: each public
/// operation completes, including every listener reaction it triggers,
/// before the next one is issued. Operations that fire events are `async`
/// because listener reactions may suspend; the sequencer awaits each
/// reaction to completion before invoking the next.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use turnwheel::sequencer::{
///     Participant, ParticipantCore, ParticipantHooks, TeamId, TurnOrder, TurnSequencer,
/// };
///
/// struct Fighter {
///     core: ParticipantCore,
/// }
///
/// #[async_trait::async_trait]
/// impl ParticipantHooks for Fighter {
///     fn core(&self) -> &ParticipantCore {
///         &self.core
///     }
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut sequencer = TurnSequencer::new(TurnOrder::PingPong);
/// let fighter: Arc<dyn Participant> = Arc::new(Fighter {
///     core: ParticipantCore::new(TeamId(1)),
/// });
/// sequencer.register_participant(fighter).await?;
/// sequencer.begin().await?;
/// sequencer.end_turn().await?;
/// # Ok(())
/// # }
/// ```
pub struct TurnSequencer {
    /// Current round number; 0 until `begin` rolls over to round 1.
    round: u32,

    /// The participant whose turn it is, the head of the pending queue.
    current: Option<Arc<dyn Participant>>,

    /// Participants still owed a turn this round, current one included.
    pending: Vec<Arc<dyn Participant>>,

    /// Persistent team order, surviving across rounds.
    roster: TeamRoster,

    /// Listener registry, sorted by descending priority.
    listeners: Vec<ListenerEntry>,

    /// The ordering policy, immutable for the sequencer's lifetime.
    turn_order: TurnOrder,

    /// Set by `begin`; events are not dispatched before it.
    has_begun: bool,

    /// Monotonic id counter; ids start at 1.
    max_id: u32,
}

fn subject_of(participant: &Arc<dyn Participant>) -> EventSubject {
    EventSubject {
        participant: participant.participant_id(),
        team: participant.team_id(),
    }
}

impl TurnSequencer {
    /// Creates a sequencer with the given ordering policy.
    #[must_use]
    pub fn new(turn_order: TurnOrder) -> Self {
        Self {
            round: 0,
            current: None,
            pending: Vec::new(),
            roster: TeamRoster::new(),
            listeners: Vec::new(),
            turn_order,
            has_begun: false,
            max_id: 0,
        }
    }

    /// The current round number; 0 before `begin`.
    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.round
    }

    /// The participant whose turn it is, if any.
    #[must_use]
    pub fn current_participant(&self) -> Option<Arc<dyn Participant>> {
        self.current.clone()
    }

    /// The ordering policy this sequencer was created with.
    #[must_use]
    pub fn turn_order(&self) -> TurnOrder {
        self.turn_order
    }

    /// Returns `true` once `begin` has run.
    #[must_use]
    pub fn has_begun(&self) -> bool {
        self.has_begun
    }

    fn next_unique_id(&mut self) -> ParticipantId {
        self.max_id += 1;
        ParticipantId(self.max_id)
    }

    /// Registers a participant, assigning it the next unique id.
    ///
    /// The participant is appended to its team in the roster and queued
    /// immediately after the last queued member of its team, preserving
    /// relative team ordering without disturbing other teams. With no
    /// queued teammate it goes to the back of the queue; if the queue was
    /// empty and the sequence has begun, it becomes current at once and a
    /// StartTurn fires. The participant also joins the listener registry.
    ///
    /// Registration is allowed at any time, including mid-round. Before
    /// `begin` it has no event side effects. Registering an already
    /// registered participant is a no-op returning its existing id.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Listener`] if the immediate StartTurn dispatch
    /// fails.
    pub async fn register_participant(
        &mut self,
        participant: Arc<dyn Participant>,
    ) -> Result<ParticipantId, TurnError> {
        if self.roster.contains(&participant) {
            return Ok(participant.participant_id());
        }

        let id = self.next_unique_id();
        participant.assign_id(id);
        let team = participant.team_id();
        self.roster.add(Arc::clone(&participant), false);

        match self.pending.iter().rposition(|p| p.team_id() == team) {
            Some(i) => self.pending.insert(i + 1, Arc::clone(&participant)),
            None => {
                let was_empty = self.pending.is_empty();
                self.pending.push(Arc::clone(&participant));
                if was_empty && self.has_begun {
                    self.current = Some(Arc::clone(&participant));
                    let event = TurnEvent::new(
                        TurnEventKind::StartTurn,
                        self.round,
                        subject_of(&participant),
                    );
                    self.dispatch(event).await?;
                }
            }
        }

        let listener: Arc<dyn TurnEventListener> = participant;
        self.add_listener(&listener);
        debug!(participant = %id, team = %team, "registered participant");
        Ok(id)
    }

    /// Unregisters a participant by id.
    ///
    /// No-op if the id is unknown. The participant leaves the pending
    /// queue, the roster, and the listener registry. When it is the
    /// current participant, an EndTurn fires for it first so downstream
    /// listeners observe a clean turn end; the sequencer is then left with
    /// no current participant. A participant registering into an emptied
    /// queue becomes current; until then `end_turn` reports
    /// [`TurnError::NoCurrentParticipant`].
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Listener`] if the EndTurn dispatch fails.
    pub async fn unregister_participant(&mut self, id: ParticipantId) -> Result<(), TurnError> {
        let Some(participant) = self.roster.find(id) else {
            return Ok(());
        };

        let is_current = self
            .current
            .as_ref()
            .is_some_and(|c| same_participant(c, &participant));
        self.pending.retain(|p| !same_participant(p, &participant));

        if is_current {
            let event =
                TurnEvent::new(TurnEventKind::EndTurn, self.round, subject_of(&participant));
            self.dispatch(event).await?;
            self.current = None;
        }

        self.roster.remove(&participant);
        let listener: Arc<dyn TurnEventListener> = participant;
        self.listeners.retain(|entry| !entry.points_to(&listener));
        debug!(participant = %id, "unregistered participant");
        Ok(())
    }

    /// Adds a listener to the registry.
    ///
    /// No-op if already present. The registry stays sorted by descending
    /// priority, stable for equal priorities in insertion order. The
    /// priority is read once, here; a later change to a listener's
    /// [`response_priority`] does not reorder the registry. Only a weak
    /// reference is held: the caller keeps observer-only listeners alive,
    /// and entries whose listener has been dropped are pruned at the next
    /// dispatch.
    ///
    /// [`response_priority`]: TurnEventListener::response_priority
    pub fn add_listener(&mut self, listener: &Arc<dyn TurnEventListener>) {
        if self.listeners.iter().any(|entry| entry.points_to(listener)) {
            return;
        }
        self.listeners.push(ListenerEntry {
            priority: listener.response_priority(),
            listener: Arc::downgrade(listener),
        });
        self.listeners.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Removes a listener from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::ListenerStillActive`] if the listener is still
    /// a registered participant; unregister it from play first.
    pub fn remove_listener(
        &mut self,
        listener: &Arc<dyn TurnEventListener>,
    ) -> Result<(), TurnError> {
        let still_active = self
            .roster
            .flatten()
            .iter()
            .any(|p| ptr::addr_eq(Arc::as_ptr(p), Arc::as_ptr(listener)));
        if still_active {
            return Err(TurnError::ListenerStillActive);
        }
        self.listeners.retain(|entry| !entry.points_to(listener));
        Ok(())
    }

    /// Starts the sequence: computes round 1's queue, fires StartRound,
    /// makes the queue head current, and fires StartTurn for it.
    ///
    /// # Errors
    ///
    /// - [`TurnError::NoParticipants`] if nothing is registered.
    /// - [`TurnError::Listener`] if a listener reaction fails.
    pub async fn begin(&mut self) -> Result<(), TurnError> {
        if self.roster.is_empty() {
            return Err(TurnError::NoParticipants);
        }

        self.prepare_for_next_round();
        self.has_begun = true;
        debug!(round = self.round, order = ?self.turn_order, "turn sequence begun");

        let event = TurnEvent::round_level(TurnEventKind::StartRound, self.round);
        self.dispatch(event).await?;

        let head = self
            .pending
            .first()
            .cloned()
            .ok_or(TurnError::NoParticipants)?;
        self.current = Some(Arc::clone(&head));
        let event = TurnEvent::new(TurnEventKind::StartTurn, self.round, subject_of(&head));
        self.dispatch(event).await
    }

    /// Rebuilds the pending queue for a new round and advances the round
    /// counter.
    fn prepare_for_next_round(&mut self) {
        self.pending.clear();

        match self.turn_order {
            TurnOrder::FreeInitiative => {
                let mut all = self.roster.flatten();
                // Stable sort: ties keep roster flatten order.
                all.sort_by_key(|p| p.initiative());
                self.pending = all;
            }
            TurnOrder::PingPong => {
                // Round 1 matches registration order; reversal starts at round 2.
                if self.round > 0 {
                    self.roster.reverse_all_teams();
                }
                self.pending = self.roster.flatten();
            }
            TurnOrder::Default => {
                self.pending = self.roster.flatten();
            }
        }

        self.round += 1;
    }

    /// Ends the current participant's turn and advances the sequence.
    ///
    /// Event order: EndTurn for the ending participant; EndRound, queue
    /// rebuild, and StartRound if the queue emptied; EndTeam if no queued
    /// participant shares the ending team, evaluated against the rebuilt
    /// queue after a rollover; StartTeam for the new head's team; StartTurn
    /// for the new head.
    ///
    /// # Errors
    ///
    /// - [`TurnError::NoCurrentParticipant`] if no turn is in progress.
    /// - [`TurnError::NoActiveParticipants`] if the rollover produced an
    ///   empty queue because every participant was unregistered.
    /// - [`TurnError::Listener`] if a listener reaction fails.
    pub async fn end_turn(&mut self) -> Result<(), TurnError> {
        let ending = self
            .current
            .clone()
            .ok_or(TurnError::NoCurrentParticipant)?;
        let team = ending.team_id();

        // Mark the participant as having played.
        self.pending.retain(|p| !same_participant(p, &ending));

        let event = TurnEvent::new(TurnEventKind::EndTurn, self.round, subject_of(&ending));
        self.dispatch(event).await?;

        if self.pending.is_empty() {
            self.end_round().await?;
        }

        if self.pending.is_empty() {
            return Err(TurnError::NoActiveParticipants);
        }

        if self.pending.iter().all(|p| p.team_id() != team) {
            let event = TurnEvent::new(TurnEventKind::EndTeam, self.round, subject_of(&ending));
            self.dispatch(event).await?;
        }

        let head = Arc::clone(&self.pending[0]);
        self.current = Some(Arc::clone(&head));
        let event = TurnEvent::new(TurnEventKind::StartTeam, self.round, subject_of(&head));
        self.dispatch(event).await?;
        let event = TurnEvent::new(TurnEventKind::StartTurn, self.round, subject_of(&head));
        self.dispatch(event).await
    }

    /// Fires EndRound, rebuilds the queue for the next round, and fires
    /// StartRound.
    async fn end_round(&mut self) -> Result<(), TurnError> {
        let event = TurnEvent::round_level(TurnEventKind::EndRound, self.round);
        self.dispatch(event).await?;

        self.prepare_for_next_round();
        debug!(round = self.round, queued = self.pending.len(), "round rollover");

        let event = TurnEvent::round_level(TurnEventKind::StartRound, self.round);
        self.dispatch(event).await
    }

    /// Moves the current participant to the back of its team's order for
    /// this round, making the next queued teammate current, and persists
    /// the reordering into the roster for future rounds.
    ///
    /// No-op if there is no current participant or fewer than two queued
    /// members of its team. Fires SkipToNextParticipant carrying the new
    /// queue head.
    ///
    /// # Errors
    ///
    /// - [`TurnError::SkipUnsupported`] under the free-initiative order.
    /// - [`TurnError::Listener`] if a listener reaction fails.
    pub async fn skip_participant(&mut self) -> Result<(), TurnError> {
        if self.turn_order == TurnOrder::FreeInitiative {
            return Err(TurnError::SkipUnsupported);
        }
        let Some(skipped) = self.current.clone() else {
            return Ok(());
        };
        let team = skipped.team_id();

        // Nothing to skip past without a second queued teammate.
        if self.pending.iter().filter(|p| p.team_id() == team).count() <= 1 {
            return Ok(());
        }

        self.pending.retain(|p| !same_participant(p, &skipped));
        match self.pending.iter().rposition(|p| p.team_id() == team) {
            Some(i) => self.pending.insert(i + 1, Arc::clone(&skipped)),
            None => self.pending.push(Arc::clone(&skipped)),
        }

        // Reorder the roster as well so the change persists across rounds.
        self.roster.remove(&skipped);
        self.roster.add(Arc::clone(&skipped), false);

        let head = Arc::clone(&self.pending[0]);
        self.current = Some(Arc::clone(&head));
        debug!(skipped = %skipped.participant_id(), now_current = %head.participant_id(), "skipped participant");

        let event = TurnEvent::new(
            TurnEventKind::SkipToNextParticipant,
            self.round,
            subject_of(&head),
        );
        self.dispatch(event).await
    }

    /// Moves the queued participant with the given id to the front of the
    /// queue and of its team's order, making it current, and persists the
    /// reordering into the roster.
    ///
    /// No-op if there is no current participant or the id is not queued.
    /// Fires SkipToNextParticipant carrying the promoted participant.
    ///
    /// # Errors
    ///
    /// - [`TurnError::SkipUnsupported`] under the free-initiative order.
    /// - [`TurnError::Listener`] if a listener reaction fails.
    pub async fn skip_to_participant(&mut self, id: ParticipantId) -> Result<(), TurnError> {
        if self.turn_order == TurnOrder::FreeInitiative {
            return Err(TurnError::SkipUnsupported);
        }
        if self.current.is_none() {
            return Ok(());
        }
        let Some(pos) = self.pending.iter().position(|p| p.participant_id() == id) else {
            return Ok(());
        };

        let target = self.pending.remove(pos);
        self.pending.insert(0, Arc::clone(&target));
        self.roster.remove(&target);
        self.roster.add(Arc::clone(&target), true);

        self.current = Some(Arc::clone(&target));
        debug!(now_current = %id, "skipped to participant");

        let event = TurnEvent::new(
            TurnEventKind::SkipToNextParticipant,
            self.round,
            subject_of(&target),
        );
        self.dispatch(event).await
    }

    /// Notifies every live listener of the event, in descending priority
    /// order, awaiting each reaction before invoking the next.
    ///
    /// Does nothing before `begin`. Entries whose listener has been
    /// released are pruned first.
    async fn dispatch(&mut self, event: TurnEvent) -> Result<(), TurnError> {
        if !self.has_begun {
            return Ok(());
        }

        self.listeners
            .retain(|entry| entry.listener.strong_count() > 0);

        let live: Vec<Arc<dyn TurnEventListener>> = self
            .listeners
            .iter()
            .filter_map(|entry| entry.listener.upgrade())
            .collect();

        trace!(kind = ?event.kind, round = event.round, listeners = live.len(), "dispatching event");

        for listener in live {
            listener
                .on_turn_event(&event)
                .await
                .map_err(|source| TurnError::Listener {
                    kind: event.kind,
                    source,
                })?;
        }
        Ok(())
    }

    /// Takes a point-in-time snapshot of the sequencer's state.
    #[must_use]
    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            current_participant_id: self.current.as_ref().map(|p| p.participant_id()),
            current_round: self.round,
            max_id: self.max_id,
            turn_order: self.turn_order,
            pending: self.pending.iter().map(|p| p.participant_id()).collect(),
            teams: self
                .roster
                .teams()
                .map(|(team, members)| {
                    (team, members.iter().map(|p| p.participant_id()).collect())
                })
                .collect(),
        }
    }
}
