/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Participant and listener capability traits.
//!
//! A [`Participant`] is a registered entity with a sequencer-assigned id, a
//! team, an initiative value, and an event-reaction callback. Every
//! participant is also a [`TurnEventListener`]; the listener registry may
//! additionally contain observer-only listeners that never take turns.
//!
//! [`ParticipantHooks`] plus [`ParticipantCore`] form a reusable adapter
//! that implements both traits on top of finer-grained per-event hooks,
//! so most implementors only override the hooks they care about.

use super::event::{TurnEvent, TurnEventKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Error type a listener reaction may fail with.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single listener reaction.
pub type ListenerResult = Result<(), ListenerError>;

/// Unique identifier assigned to a participant at registration.
///
/// Ids start at 1; `ParticipantId(0)` denotes a not-yet-registered
/// participant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(pub u32);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a team grouping participants.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity notified of turn lifecycle events.
///
/// Reactions are awaited to completion, one listener at a time, in
/// descending [`response_priority`] order (stable for ties). A reaction may
/// suspend; the sequencer waits for it before notifying the next listener.
///
/// [`response_priority`]: TurnEventListener::response_priority
#[async_trait]
pub trait TurnEventListener: Send + Sync {
    /// Reacts to a lifecycle event.
    ///
    /// # Errors
    ///
    /// A returned error aborts the dispatch in progress: listeners with a
    /// lower priority will not see the event, and the failure propagates to
    /// whoever triggered it.
    async fn on_turn_event(&self, event: &TurnEvent) -> ListenerResult;

    /// Dispatch priority; higher values are notified earlier.
    fn response_priority(&self) -> i32 {
        0
    }
}

/// The contract a registrant of the [`TurnSequencer`] must satisfy.
///
/// The sequencer assigns the id via [`assign_id`] during registration and
/// reads it back through [`participant_id`] afterwards, so implementors
/// need interior mutability for the id cell. [`ParticipantCore`] provides
/// exactly that storage.
///
/// [`TurnSequencer`]: super::core::TurnSequencer
/// [`assign_id`]: Participant::assign_id
/// [`participant_id`]: Participant::participant_id
pub trait Participant: TurnEventListener {
    /// The id assigned at registration, or `ParticipantId(0)` before it.
    fn participant_id(&self) -> ParticipantId;

    /// Stores the sequencer-assigned id. Called once, at registration.
    fn assign_id(&self, id: ParticipantId);

    /// The team this participant belongs to.
    fn team_id(&self) -> TeamId;

    /// Current initiative value, consulted once per round rollover under
    /// the free-initiative order. Lower values act earlier.
    fn initiative(&self) -> i32;
}

/// Identity, team and priority storage for participant implementations.
///
/// Embed one in your participant type and hand it out through
/// [`ParticipantHooks::core`]; the blanket impls take care of the rest.
#[derive(Debug)]
pub struct ParticipantCore {
    id: AtomicU32,
    team: TeamId,
    priority: i32,
}

impl ParticipantCore {
    /// Creates a core for the given team with priority 0.
    #[must_use]
    pub fn new(team: TeamId) -> Self {
        Self::with_priority(team, 0)
    }

    /// Creates a core for the given team with an explicit dispatch priority.
    #[must_use]
    pub fn with_priority(team: TeamId, priority: i32) -> Self {
        Self {
            id: AtomicU32::new(0),
            team,
            priority,
        }
    }

    /// The assigned participant id, or `ParticipantId(0)` before registration.
    #[must_use]
    pub fn id(&self) -> ParticipantId {
        ParticipantId(self.id.load(Ordering::Relaxed))
    }

    /// Stores the assigned id.
    pub fn assign_id(&self, id: ParticipantId) {
        self.id.store(id.0, Ordering::Relaxed);
    }

    /// The team this core belongs to.
    #[must_use]
    pub fn team(&self) -> TeamId {
        self.team
    }

    /// The dispatch priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

/// Per-event-kind hooks with subject filtering, the convenient way to
/// implement [`Participant`].
///
/// The blanket [`TurnEventListener`] impl routes each event to the matching
/// hook: round-level hooks fire unconditionally, turn hooks only when the
/// event's subject is this participant, team hooks only when the subject
/// shares this participant's team, and [`on_skip`] always. All hooks
/// default to doing nothing.
///
/// # Examples
///
/// ```
/// use turnwheel::sequencer::{
///     ListenerResult, ParticipantCore, ParticipantHooks, TeamId, TurnEvent,
/// };
///
/// struct Goblin {
///     core: ParticipantCore,
/// }
///
/// #[async_trait::async_trait]
/// impl ParticipantHooks for Goblin {
///     fn core(&self) -> &ParticipantCore {
///         &self.core
///     }
///
///     async fn on_turn_start(&self, _event: &TurnEvent) -> ListenerResult {
///         // act
///         Ok(())
///     }
/// }
///
/// let goblin = Goblin {
///     core: ParticipantCore::new(TeamId(2)),
/// };
/// ```
///
/// [`on_skip`]: ParticipantHooks::on_skip
#[async_trait]
pub trait ParticipantHooks: Send + Sync {
    /// Identity storage for this participant.
    fn core(&self) -> &ParticipantCore;

    /// Initiative value for free-initiative ordering. Defaults to 0.
    fn initiative(&self) -> i32 {
        0
    }

    /// A round has started.
    async fn on_round_start(&self, _event: &TurnEvent) -> ListenerResult {
        Ok(())
    }

    /// A round has ended.
    async fn on_round_end(&self, _event: &TurnEvent) -> ListenerResult {
        Ok(())
    }

    /// This participant's team is up; fires with each turn advancement
    /// into the team.
    async fn on_team_start(&self, _event: &TurnEvent) -> ListenerResult {
        Ok(())
    }

    /// This participant's team has no queued turns left.
    async fn on_team_end(&self, _event: &TurnEvent) -> ListenerResult {
        Ok(())
    }

    /// This participant's turn has started.
    async fn on_turn_start(&self, _event: &TurnEvent) -> ListenerResult {
        Ok(())
    }

    /// This participant's turn has ended.
    async fn on_turn_end(&self, _event: &TurnEvent) -> ListenerResult {
        Ok(())
    }

    /// The active order was changed by a skip.
    async fn on_skip(&self, _event: &TurnEvent) -> ListenerResult {
        Ok(())
    }
}

#[async_trait]
impl<T: ParticipantHooks> TurnEventListener for T {
    async fn on_turn_event(&self, event: &TurnEvent) -> ListenerResult {
        let core = self.core();
        match event.kind {
            TurnEventKind::StartRound => self.on_round_start(event).await,
            TurnEventKind::EndRound => self.on_round_end(event).await,
            TurnEventKind::StartTeam if event.concerns_team(core.team()) => {
                self.on_team_start(event).await
            }
            TurnEventKind::EndTeam if event.concerns_team(core.team()) => {
                self.on_team_end(event).await
            }
            TurnEventKind::StartTurn if event.concerns_participant(core.id()) => {
                self.on_turn_start(event).await
            }
            TurnEventKind::EndTurn if event.concerns_participant(core.id()) => {
                self.on_turn_end(event).await
            }
            TurnEventKind::SkipToNextParticipant => self.on_skip(event).await,
            _ => Ok(()),
        }
    }

    fn response_priority(&self) -> i32 {
        self.core().priority()
    }
}

impl<T: ParticipantHooks> Participant for T {
    fn participant_id(&self) -> ParticipantId {
        self.core().id()
    }

    fn assign_id(&self, id: ParticipantId) {
        self.core().assign_id(id);
    }

    fn team_id(&self) -> TeamId {
        self.core().team()
    }

    fn initiative(&self) -> i32 {
        ParticipantHooks::initiative(self)
    }
}
