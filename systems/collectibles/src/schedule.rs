//! Deterministic power-up schedule.

use ledgejump_core::{CollectibleKind, Difficulty, Stage};

const EASY_ROTATION: [CollectibleKind; 3] = [
    CollectibleKind::Invincibility,
    CollectibleKind::DoubleJump,
    CollectibleKind::Shield,
];

/// `(stage % 10, kind)` slots used on normal difficulty.
const NORMAL_SLOTS: [(u32, CollectibleKind); 4] = [
    (2, CollectibleKind::Shield),
    (4, CollectibleKind::Tempo),
    (7, CollectibleKind::DoubleJump),
    (9, CollectibleKind::SuperShot),
];

/// `(stage % 10, kind)` slots used on hard difficulty.
const HARD_SLOTS: [(u32, CollectibleKind); 3] = [
    (3, CollectibleKind::Tempo),
    (6, CollectibleKind::SuperShot),
    (9, CollectibleKind::Invincibility),
];

/// Power-ups to place in the stage, in placement order.
///
/// Easy hands out one power-up on every stage, cycling through three kinds.
/// Normal and hard only fill fixed slots of each ten-stage block. The final
/// stage never schedules anything.
#[must_use]
pub fn schedule_for_stage(stage: Stage, difficulty: Difficulty) -> Vec<CollectibleKind> {
    if stage.is_final() {
        return Vec::new();
    }
    let value = stage.get();

    let kind = match difficulty {
        Difficulty::Easy => Some(EASY_ROTATION[((value - 1) % 3) as usize]),
        Difficulty::Normal => slot_kind(&NORMAL_SLOTS, value),
        Difficulty::Hard => slot_kind(&HARD_SLOTS, value),
    };
    kind.into_iter().collect()
}

fn slot_kind(slots: &[(u32, CollectibleKind)], stage: u32) -> Option<CollectibleKind> {
    let offset = stage % 10;
    slots
        .iter()
        .find(|(slot, _)| *slot == offset)
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgejump_core::FINAL_STAGE;

    fn schedule(value: u32, difficulty: Difficulty) -> Vec<CollectibleKind> {
        schedule_for_stage(Stage::new(value).expect("valid stage"), difficulty)
    }

    #[test]
    fn easy_cycles_three_kinds() {
        assert_eq!(schedule(1, Difficulty::Easy), vec![CollectibleKind::Invincibility]);
        assert_eq!(schedule(2, Difficulty::Easy), vec![CollectibleKind::DoubleJump]);
        assert_eq!(schedule(3, Difficulty::Easy), vec![CollectibleKind::Shield]);
        assert_eq!(schedule(4, Difficulty::Easy), vec![CollectibleKind::Invincibility]);
    }

    #[test]
    fn normal_fills_four_of_ten_stages() {
        let filled = (11..=20)
            .filter(|value| !schedule(*value, Difficulty::Normal).is_empty())
            .count();
        assert_eq!(filled, 4);
        assert_eq!(schedule(14, Difficulty::Normal), vec![CollectibleKind::Tempo]);
    }

    #[test]
    fn hard_fills_three_of_ten_stages() {
        let filled: Vec<u32> = (21..=30)
            .filter(|value| !schedule(*value, Difficulty::Hard).is_empty())
            .collect();
        assert_eq!(filled, vec![23, 26, 29]);
    }

    #[test]
    fn final_stage_is_empty_for_every_difficulty() {
        for difficulty in Difficulty::ALL {
            assert!(schedule(FINAL_STAGE, difficulty).is_empty());
        }
    }
}
