use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raid_core::damage::{resolve_damage, AttackProfile, DamageFormulaConfig};
use raid_core::{CombatEngine, EncounterSetup, SkillId};

fn bench_resolve_damage(c: &mut Criterion) {
    let config = DamageFormulaConfig {
        rand_min_multiplier: 0.8,
        rand_max_multiplier: 1.2,
        ..DamageFormulaConfig::default()
    };
    let attacker = AttackProfile::new(10, 5, 6);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    c.bench_function("resolve_damage", |b| {
        b.iter(|| resolve_damage(black_box(attacker), black_box(3), &config, &mut rng))
    });
}

fn bench_player_turn(c: &mut Criterion) {
    // One committed Flurry plus the enemy phase, against a fresh round each
    // iteration so enemies never run out.
    c.bench_function("player_turn", |b| {
        b.iter_batched(
            || {
                let mut engine = CombatEngine::new(EncounterSetup::standard(), 1);
                engine.initialize().expect("standard raid is valid");
                engine.run_until_idle();
                engine
            },
            |mut engine| {
                engine
                    .request_player_skill(SkillId::new(1))
                    .expect("flurry is affordable on turn one");
                black_box(engine.run_until_idle())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_resolve_damage, bench_player_turn);
criterion_main!(benches);
