use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use ledgejump_core::{
    CheatCode, CheatToken, CollectibleKind, Difficulty, Event, Platform, Species, Stage,
};
use ledgejump_system_cheat_codes::{sequence, Button, RawInput};
use ledgejump_system_stage_setup::{Session, StagePlan, StageSetup};

fn stage(value: u32) -> Stage {
    Stage::new(value).expect("valid stage")
}

fn layout() -> Vec<Platform> {
    vec![
        Platform::new(0.0, 440.0, 320.0, 24.0),
        Platform::new(400.0, 380.0, 180.0, 24.0),
        Platform::new(660.0, 320.0, 220.0, 24.0),
        Platform::new(960.0, 360.0, 260.0, 24.0),
        Platform::new(1_300.0, 420.0, 300.0, 24.0),
    ]
}

fn button_for(token: CheatToken) -> Button {
    match token {
        CheatToken::Up => Button::DpadUp,
        CheatToken::Down => Button::DpadDown,
        CheatToken::Left => Button::DpadLeft,
        CheatToken::Right => Button::DpadRight,
        CheatToken::Jump => Button::Jump,
        CheatToken::Shoot => Button::Shoot,
        CheatToken::A => Button::A,
        CheatToken::B => Button::B,
    }
}

#[test]
fn regular_stage_gets_spawns_and_collectibles() {
    let plan = StageSetup::default().prepare(stage(4), Difficulty::Easy, &layout());

    assert!(plan.spawns.get(Species::Slime).is_some());
    let extra_life = plan.extra_life.expect("extra life placed");
    assert_eq!(extra_life.kind, CollectibleKind::ExtraLife);
    assert_eq!(plan.powerups.len(), 1);
    assert_eq!(plan.items().count(), 2);
    assert_ne!(
        plan.powerups[0].position.center_x(),
        extra_life.position.center_x(),
    );
}

#[test]
fn final_stage_keeps_its_extra_life_but_no_power_ups() {
    for value in [51, 60] {
        for difficulty in Difficulty::ALL {
            let plan = StageSetup::default().prepare(stage(value), difficulty, &layout());
            assert!(plan.spawns.get(Species::Dragon).is_some());
            let extra_life = plan.extra_life.expect("extra life placed");
            assert_eq!(extra_life.kind, CollectibleKind::ExtraLife);
            assert!(plan.powerups.is_empty());
            assert_eq!(plan.items().count(), 1);
        }
    }
}

#[test]
fn platform_less_stage_is_still_valid() {
    let plan = StageSetup::default().prepare(stage(12), Difficulty::Normal, &[]);
    assert!(!plan.spawns.is_empty());
    assert_eq!(plan.items().count(), 0);
}

#[test]
fn whole_campaign_replays_identically() {
    let fingerprint = |plans: &[StagePlan]| {
        let mut hasher = DefaultHasher::new();
        for plan in plans {
            plan.stage.hash(&mut hasher);
            plan.spawns.hash(&mut hasher);
            for item in plan.items() {
                item.kind.hash(&mut hasher);
                item.position.x.to_bits().hash(&mut hasher);
                item.position.y.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    };

    let run = |difficulty| {
        let setup = StageSetup::default();
        Stage::campaign()
            .map(|stage| setup.prepare(stage, difficulty, &layout()))
            .collect::<Vec<_>>()
    };

    for difficulty in Difficulty::ALL {
        assert_eq!(
            fingerprint(&run(difficulty)[..]),
            fingerprint(&run(difficulty)[..]),
        );
    }
}

#[test]
fn session_drives_spawns_for_the_running_stage() {
    let mut session = Session::new(Difficulty::Normal, StageSetup::default());
    assert_eq!(session.difficulty(), Difficulty::Normal);
    let mut events = Vec::new();

    session.tick(1_000, &mut events);
    assert!(events.is_empty(), "no stage, no spawns");

    let interval = session
        .enter_stage(stage(1), &layout())
        .spawns
        .get(Species::Slime)
        .expect("slime active")
        .interval_frames;
    session.tick(interval, &mut events);
    assert_eq!(
        events,
        vec![Event::SpawnWave {
            species: Species::Slime,
            quantity: 1,
        }],
    );

    events.clear();
    session.restart();
    assert!(session.plan().is_none());
    session.tick(interval * 4, &mut events);
    assert!(events.is_empty(), "restart stops the spawn clock");
}

#[test]
fn cheat_windows_survive_restarts() {
    let mut session = Session::new(Difficulty::Hard, StageSetup::default());
    let mut events = Vec::new();
    let target = sequence(CheatCode::LifeBoost);

    for token in &target[..6] {
        let input = RawInput::Pressed {
            button: button_for(*token),
        };
        assert_eq!(session.handle_input(input, &mut events), Some(*token));
    }
    session.restart();
    let _ = session.enter_stage(stage(2), &layout());
    for token in &target[6..] {
        let input = RawInput::Pressed {
            button: button_for(*token),
        };
        let _ = session.handle_input(input, &mut events);
    }

    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        Event::CheatActivated {
            code: CheatCode::LifeBoost,
            ..
        }
    ));
}

#[test]
fn sessions_do_not_share_cheat_windows() {
    let target = sequence(CheatCode::PowerSurge);
    let mut first = Session::new(Difficulty::Easy, StageSetup::default());
    let mut second = Session::new(Difficulty::Easy, StageSetup::default());
    let mut first_events = Vec::new();
    let mut second_events = Vec::new();

    for (position, token) in target.iter().enumerate() {
        let input = RawInput::Pressed {
            button: button_for(*token),
        };
        let _ = first.handle_input(input, &mut first_events);
        if position % 2 == 0 {
            let _ = second.handle_input(input, &mut second_events);
        }
    }

    assert_eq!(first_events.len(), 1);
    assert!(second_events.is_empty());
}

#[test]
fn released_buttons_produce_no_token() {
    let mut session = Session::new(Difficulty::Normal, StageSetup::default());
    let mut events = Vec::new();
    let input = RawInput::Released { button: Button::A };
    assert_eq!(session.handle_input(input, &mut events), None);
    assert!(events.is_empty());
}
