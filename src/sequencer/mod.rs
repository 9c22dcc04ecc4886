/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Sequencer module for ordered turn-taking among teams of participants.
//!
//! This module provides a single-threaded [`TurnSequencer`] that advances a
//! turn-based sequence round by round under one of several ordering
//! policies, and notifies registered listeners of lifecycle events in a
//! deterministic priority order.
//!
//! # Architecture
//!
//! - Participants register into teams and receive a unique id
//! - A pending queue holds the participants still owed a turn this round
//!   and is rebuilt at every round boundary according to the [`TurnOrder`]
//! - Lifecycle events (round/team/turn start and end, skips) are dispatched
//!   to listeners sequentially, in descending priority order, awaiting each
//!   reaction before the next
//! - Skip operations reorder both the active queue and the persistent team
//!   order
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use turnwheel::sequencer::{
//!     Participant, ParticipantCore, ParticipantHooks, TeamId, TurnOrder, TurnSequencer,
//! };
//!
//! struct Soldier {
//!     core: ParticipantCore,
//! }
//!
//! #[async_trait::async_trait]
//! impl ParticipantHooks for Soldier {
//!     fn core(&self) -> &ParticipantCore {
//!         &self.core
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sequencer = TurnSequencer::new(TurnOrder::Default);
//!
//! let a: Arc<dyn Participant> = Arc::new(Soldier { core: ParticipantCore::new(TeamId(1)) });
//! let b: Arc<dyn Participant> = Arc::new(Soldier { core: ParticipantCore::new(TeamId(2)) });
//! sequencer.register_participant(a).await?;
//! sequencer.register_participant(b).await?;
//!
//! sequencer.begin().await?;
//! sequencer.end_turn().await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod event;
pub mod participant;
pub mod roster;
pub mod snapshot;


// Re-export main types
pub use self::core::{TurnOrder, TurnSequencer};
pub use error::TurnError;
pub use event::{EventSubject, TurnEvent, TurnEventKind};
pub use participant::{
    ListenerError, ListenerResult, Participant, ParticipantCore, ParticipantHooks, ParticipantId,
    TeamId, TurnEventListener,
};
pub use roster::TeamRoster;
pub use snapshot::TurnSnapshot;
