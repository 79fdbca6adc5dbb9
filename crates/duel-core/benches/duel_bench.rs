use criterion::{black_box, criterion_group, criterion_main, Criterion};
use duel_core::combat;
use duel_core::config::CombatTunables;
use duel_core::rng::seeded;
use duel_core::{Duel, DuelConfig, FighterStats, FRAME};

fn autoplay_config() -> DuelConfig {
    DuelConfig {
        autoplay: true,
        ..DuelConfig::default()
    }
}

fn bench_full_round(c: &mut Criterion) {
    // Sane opponent so the round runs to the clock instead of a first-hit KO
    let config = DuelConfig {
        opponent_stats: FighterStats::new(20, 40, 10, 120),
        ..autoplay_config()
    };

    c.bench_function("full_round_ai_vs_ai", |b| {
        b.iter(|| {
            let mut duel = Duel::new(config.clone(), black_box(7)).unwrap();
            while !duel.is_over() {
                duel.step(FRAME, [None, None]);
                black_box(duel.take_events());
            }
            duel.outcome()
        })
    });
}

fn bench_single_step(c: &mut Criterion) {
    let mut duel = Duel::new(autoplay_config(), 7).unwrap();

    c.bench_function("single_step", |b| {
        b.iter(|| {
            if duel.is_over() {
                duel.retry();
            }
            duel.step(black_box(FRAME), [None, None]);
            duel.take_events().len()
        })
    });
}

fn bench_damage_roll(c: &mut Criterion) {
    let tunables = CombatTunables::default();
    let attacker = FighterStats::default();
    let mut rng = seeded(1);

    c.bench_function("compute_damage", |b| {
        b.iter(|| combat::compute_damage(black_box(&attacker), &tunables, &mut rng))
    });
}

criterion_group!(benches, bench_full_round, bench_single_step, bench_damage_roll);
criterion_main!(benches);
