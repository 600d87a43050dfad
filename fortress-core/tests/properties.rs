use fortress_core::testing::FixedClock;
use fortress_core::{Clock, Engine, EngineConfig, Resources, StructureKind};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn seeded_engine(seed: u64, clock: &FixedClock) -> Engine {
    let config = EngineConfig {
        starting_stock: Resources::new(150, 80, 40),
        starting_tokens: 4,
        ..EngineConfig::default()
    };
    Engine::with_sources(
        &config,
        Box::new(StdRng::seed_from_u64(seed)),
        Box::new(clock.clone()),
    )
}

fn complete_session(engine: &mut Engine) {
    engine.set_minutes("1");
    engine.start();
    for _ in 0..60 {
        engine.tick();
    }
}

fn apply(engine: &mut Engine, clock: &FixedClock, op: u8, finds: &mut usize) {
    let first = engine.wild().first().map(|c| c.id);
    let last = engine.wild().last().map(|c| c.id);
    match op {
        0 => {
            let _ = engine.build(StructureKind::Wall);
        }
        1 => {
            let _ = engine.build(StructureKind::Tower);
        }
        2 => {
            let _ = engine.build(StructureKind::Hatchery);
        }
        3 => {
            engine.find_creature();
            *finds += 1;
        }
        4 => {
            if let Some(id) = first {
                let _ = engine.feed(id);
            }
        }
        5 => {
            if let Some(id) = first {
                let _ = engine.calm(id);
            }
        }
        6 | 7 => {
            if let Some(id) = first {
                let _ = engine.walk(id);
            }
        }
        8 => {
            if let Some(id) = last {
                let _ = engine.walk(id);
            }
        }
        9 => {
            let _ = engine.resolve_raid(false);
        }
        10 => {
            let _ = engine.resolve_raid(true);
        }
        11 => complete_session(engine),
        _ => clock.advance_days(1),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn creatures_live_in_exactly_one_collection(
        seed in any::<u64>(),
        ops in proptest::collection::vec(0u8..13, 1..200),
    ) {
        let clock = FixedClock::on(2024, 3, 1);
        let mut engine = seeded_engine(seed, &clock);
        let mut finds = 0;

        for op in ops {
            apply(&mut engine, &clock, op, &mut finds);

            for wild in engine.wild() {
                prop_assert!(wild.taming_progress < wild.taming_target);
            }
            let wild_ids: HashSet<_> = engine.wild().iter().map(|c| c.id).collect();
            let stable_ids: HashSet<_> = engine.stable().iter().map(|c| c.id).collect();
            prop_assert_eq!(wild_ids.len(), engine.wild().len());
            prop_assert_eq!(stable_ids.len(), engine.stable().len());
            prop_assert!(wild_ids.is_disjoint(&stable_ids));
            prop_assert_eq!(wild_ids.len() + stable_ids.len(), finds);
        }
    }

    #[test]
    fn power_never_drops(
        seed in any::<u64>(),
        ops in proptest::collection::vec(0u8..13, 1..200),
    ) {
        let clock = FixedClock::on(2024, 3, 1);
        let mut engine = seeded_engine(seed, &clock);
        let mut finds = 0;
        let mut power = engine.fortress().power;

        for op in ops {
            apply(&mut engine, &clock, op, &mut finds);
            prop_assert!(engine.fortress().power >= power);
            power = engine.fortress().power;
        }
    }

    #[test]
    fn raid_log_stays_bounded_and_daily_raids_are_gated(
        seed in any::<u64>(),
        ops in proptest::collection::vec(0u8..13, 1..300),
    ) {
        let clock = FixedClock::on(2024, 3, 1);
        let mut engine = seeded_engine(seed, &clock);
        let mut finds = 0;

        for op in ops {
            apply(&mut engine, &clock, op, &mut finds);
            prop_assert!(engine.raid_log().len() <= 50);

            let today = clock.today();
            let dailies_today = engine
                .raid_log()
                .iter()
                .filter(|entry| entry.daily && entry.day == today)
                .count();
            prop_assert!(dailies_today <= 1);
            if dailies_today == 1 {
                prop_assert!(!engine.daily_raid_available());
            }
        }
    }
}
