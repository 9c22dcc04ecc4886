use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use turnwheel::{
    ListenerResult, ParticipantCore, ParticipantHooks, TeamId, TurnEvent, TurnEventListener,
    TurnOrder, TurnSequencer,
};

struct BenchParticipant {
    core: ParticipantCore,
}

impl BenchParticipant {
    fn new(team: TeamId) -> Arc<Self> {
        Arc::new(Self {
            core: ParticipantCore::new(team),
        })
    }
}

#[async_trait::async_trait]
impl ParticipantHooks for BenchParticipant {
    fn core(&self) -> &ParticipantCore {
        &self.core
    }
}

struct NullObserver;

#[async_trait::async_trait]
impl TurnEventListener for NullObserver {
    async fn on_turn_event(&self, event: &TurnEvent) -> ListenerResult {
        black_box(event.round);
        Ok(())
    }
}

async fn run_rounds(order: TurnOrder, participants: usize, rounds: usize) {
    let mut sequencer = TurnSequencer::new(order);
    for i in 0..participants {
        sequencer
            .register_participant(BenchParticipant::new(TeamId((i % 4) as u32 + 1)))
            .await
            .unwrap();
    }
    let observer: Arc<dyn TurnEventListener> = Arc::new(NullObserver);
    sequencer.add_listener(&observer);

    sequencer.begin().await.unwrap();
    for _ in 0..participants * rounds {
        sequencer.end_turn().await.unwrap();
    }
    black_box(sequencer.snapshot());
}

pub fn bench_round_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("round_throughput");
    for participants in [10usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, &n| {
                b.iter(|| rt.block_on(run_rounds(TurnOrder::Default, n, 2)));
            },
        );
    }
    group.finish();
}

pub fn bench_ordering_policies(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("ordering_policies");
    for (name, order) in [
        ("default", TurnOrder::Default),
        ("ping_pong", TurnOrder::PingPong),
        ("free_initiative", TurnOrder::FreeInitiative),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| rt.block_on(run_rounds(order, 100, 2)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_round_throughput, bench_ordering_policies);
criterion_main!(benches);
