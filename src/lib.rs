/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! # turnwheel
//!
//! A reusable turn-sequencing engine for turn-based simulations: games,
//! scheduling demos, anything that passes turns among teams of
//! participants. The engine is decoupled from rendering and input
//! handling; a host loop drives it by calling [`TurnSequencer::end_turn`]
//! and the skip operations, and participants react to lifecycle events
//! through the listener contract.
//!
//! ## Features
//!
//! - Three ordering policies: team-grouped ([`TurnOrder::Default`]),
//!   per-round intra-team reversal ([`TurnOrder::PingPong`]), and
//!   per-round initiative sorting ([`TurnOrder::FreeInitiative`])
//! - Registration and unregistration at any time, including mid-round
//! - Skip operations that reorder both the active round and the
//!   persistent team order
//! - Priority-ordered, strictly sequential listener dispatch with
//!   suspendable reactions
//! - A plain, serialization-friendly [`TurnSnapshot`] of the full state

pub mod sequencer;

pub use sequencer::{
    EventSubject, ListenerError, ListenerResult, Participant, ParticipantCore, ParticipantHooks,
    ParticipantId, TeamId, TeamRoster, TurnError, TurnEvent, TurnEventKind, TurnEventListener,
    TurnOrder, TurnSequencer, TurnSnapshot,
};
