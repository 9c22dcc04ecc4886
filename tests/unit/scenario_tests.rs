//! End-to-end scenario: two teams under the ping-pong order, driven
//! through two full rounds against the public API.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use turnwheel::{
    EventSubject, ListenerResult, Participant, ParticipantCore, ParticipantHooks, ParticipantId,
    TeamId, TurnEvent, TurnEventKind, TurnEventListener, TurnOrder, TurnSequencer,
};

struct Pawn {
    core: ParticipantCore,
}

impl Pawn {
    fn new(team: TeamId) -> Arc<Self> {
        Arc::new(Self {
            core: ParticipantCore::new(team),
        })
    }
}

#[async_trait]
impl ParticipantHooks for Pawn {
    fn core(&self) -> &ParticipantCore {
        &self.core
    }
}

struct Tape {
    events: Mutex<Vec<TurnEvent>>,
}

impl Tape {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    fn take(&self) -> Vec<TurnEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

#[async_trait]
impl TurnEventListener for Tape {
    async fn on_turn_event(&self, event: &TurnEvent) -> ListenerResult {
        self.events.lock().unwrap().push(*event);
        Ok(())
    }

    fn response_priority(&self) -> i32 {
        100
    }
}

fn on(kind: TurnEventKind, round: u32, participant: u32, team: u32) -> TurnEvent {
    TurnEvent::new(
        kind,
        round,
        EventSubject {
            participant: ParticipantId(participant),
            team: TeamId(team),
        },
    )
}

#[tokio::test]
async fn ping_pong_two_rounds_full_event_trace() {
    use TurnEventKind::*;

    let mut sequencer = TurnSequencer::new(TurnOrder::PingPong);
    let p1 = Pawn::new(TeamId(1));
    let p2 = Pawn::new(TeamId(2));
    let p3 = Pawn::new(TeamId(2));
    for p in [&p1, &p2, &p3] {
        sequencer.register_participant(p.clone()).await.unwrap();
    }

    let tape = Tape::new();
    let listener: Arc<dyn TurnEventListener> = tape.clone();
    sequencer.add_listener(&listener);

    // Round 1: registration order [P1 | P2, P3].
    sequencer.begin().await.unwrap();
    assert_eq!(sequencer.current_round(), 1);
    assert_eq!(
        sequencer.current_participant().unwrap().participant_id(),
        ParticipantId(1)
    );
    assert_eq!(
        tape.take(),
        vec![
            TurnEvent::round_level(StartRound, 1),
            on(StartTurn, 1, 1, 1),
        ]
    );

    // P1 ends: team 1 exhausted, team 2 starts with P2.
    sequencer.end_turn().await.unwrap();
    assert_eq!(
        sequencer.current_participant().unwrap().participant_id(),
        ParticipantId(2)
    );
    assert_eq!(
        tape.take(),
        vec![
            on(EndTurn, 1, 1, 1),
            on(EndTeam, 1, 1, 1),
            on(StartTeam, 1, 2, 2),
            on(StartTurn, 1, 2, 2),
        ]
    );

    // P2 ends: team 2 still has P3 queued, so no EndTeam, but the
    // advancement announces team 2 again before P3's turn.
    sequencer.end_turn().await.unwrap();
    assert_eq!(
        sequencer.current_participant().unwrap().participant_id(),
        ParticipantId(3)
    );
    assert_eq!(
        tape.take(),
        vec![
            on(EndTurn, 1, 2, 2),
            on(StartTeam, 1, 3, 2),
            on(StartTurn, 1, 3, 2),
        ]
    );

    // P3 ends: the round rolls over, team 2 reverses to [P3, P2], and
    // the new queue follows the roster flatten. Team 2 gets no EndTeam
    // since the rebuilt queue holds its members again.
    sequencer.end_turn().await.unwrap();
    assert_eq!(sequencer.current_round(), 2);
    assert_eq!(
        sequencer.snapshot().pending,
        vec![ParticipantId(1), ParticipantId(3), ParticipantId(2)]
    );
    assert_eq!(
        tape.take(),
        vec![
            on(EndTurn, 1, 3, 2),
            TurnEvent::round_level(EndRound, 1),
            TurnEvent::round_level(StartRound, 2),
            on(StartTeam, 2, 1, 1),
            on(StartTurn, 2, 1, 1),
        ]
    );

    // Round 2 runs P1, P3, P2; round 3 restores the original order.
    sequencer.end_turn().await.unwrap();
    assert_eq!(
        sequencer.current_participant().unwrap().participant_id(),
        ParticipantId(3)
    );
    sequencer.end_turn().await.unwrap();
    assert_eq!(
        sequencer.current_participant().unwrap().participant_id(),
        ParticipantId(2)
    );
    sequencer.end_turn().await.unwrap();
    assert_eq!(sequencer.current_round(), 3);
    assert_eq!(
        sequencer.snapshot().pending,
        vec![ParticipantId(1), ParticipantId(2), ParticipantId(3)]
    );
}

#[tokio::test]
async fn participants_hear_their_own_turns() {
    struct CountingPawn {
        core: ParticipantCore,
        turns: Mutex<u32>,
    }

    #[async_trait]
    impl ParticipantHooks for CountingPawn {
        fn core(&self) -> &ParticipantCore {
            &self.core
        }

        async fn on_turn_start(&self, _event: &TurnEvent) -> ListenerResult {
            *self.turns.lock().unwrap() += 1;
            Ok(())
        }
    }

    let mut sequencer = TurnSequencer::new(TurnOrder::Default);
    let pawns: Vec<Arc<CountingPawn>> = (0..3u32)
        .map(|i| {
            Arc::new(CountingPawn {
                core: ParticipantCore::new(TeamId(i % 2)),
                turns: Mutex::new(0),
            })
        })
        .collect();
    for p in &pawns {
        sequencer.register_participant(p.clone()).await.unwrap();
    }

    sequencer.begin().await.unwrap();
    for _ in 0..6 {
        sequencer.end_turn().await.unwrap();
    }

    // Two full rounds plus the head of round 3.
    let counts: Vec<u32> = pawns.iter().map(|p| *p.turns.lock().unwrap()).collect();
    assert_eq!(counts.iter().sum::<u32>(), 7);
    for &count in &counts {
        assert!(count >= 2);
    }
}
