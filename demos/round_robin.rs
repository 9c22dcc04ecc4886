//! Minimal host loop: three participants on two teams under the ping-pong
//! order, with a round observer that simulates a slow reaction.
//!
//! Run with: `cargo run --example round_robin`

use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use turnwheel::{
    ListenerResult, ParticipantCore, ParticipantHooks, TeamId, TurnEvent, TurnEventKind,
    TurnEventListener, TurnOrder, TurnSequencer,
};

struct DemoParticipant {
    core: ParticipantCore,
}

impl DemoParticipant {
    fn new(team: TeamId) -> Arc<Self> {
        Arc::new(Self {
            core: ParticipantCore::new(team),
        })
    }
}

#[async_trait::async_trait]
impl ParticipantHooks for DemoParticipant {
    fn core(&self) -> &ParticipantCore {
        &self.core
    }

    async fn on_turn_start(&self, _event: &TurnEvent) -> ListenerResult {
        info!(participant = %self.core.id(), "starting turn");
        Ok(())
    }

    async fn on_turn_end(&self, _event: &TurnEvent) -> ListenerResult {
        info!(participant = %self.core.id(), "ending turn");
        Ok(())
    }

    async fn on_team_start(&self, event: &TurnEvent) -> ListenerResult {
        if let Some(subject) = event.subject {
            info!(team = %subject.team, "team starting");
        }
        Ok(())
    }

    async fn on_skip(&self, event: &TurnEvent) -> ListenerResult {
        if let Some(subject) = event.subject {
            info!(now_current = %subject.participant, "skip");
        }
        Ok(())
    }
}

/// Observer that only cares about round boundaries and takes its time.
struct RoundObserver;

#[async_trait::async_trait]
impl TurnEventListener for RoundObserver {
    async fn on_turn_event(&self, event: &TurnEvent) -> ListenerResult {
        match event.kind {
            TurnEventKind::StartRound | TurnEventKind::EndRound => {
                info!(kind = ?event.kind, round = event.round, "round boundary");
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            _ => {}
        }
        Ok(())
    }

    fn response_priority(&self) -> i32 {
        10
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut sequencer = TurnSequencer::new(TurnOrder::PingPong);
    sequencer
        .register_participant(DemoParticipant::new(TeamId(1)))
        .await?;
    sequencer
        .register_participant(DemoParticipant::new(TeamId(2)))
        .await?;
    sequencer
        .register_participant(DemoParticipant::new(TeamId(2)))
        .await?;

    let observer: Arc<dyn TurnEventListener> = Arc::new(RoundObserver);
    sequencer.add_listener(&observer);

    sequencer.begin().await?;

    // Two full rounds, skipping once mid-way.
    for turn in 0..6 {
        if turn == 1 {
            sequencer.skip_participant().await?;
        }
        sequencer.end_turn().await?;
    }

    let state = sequencer.snapshot().to_json()?;
    info!(%state, "final state");
    Ok(())
}
