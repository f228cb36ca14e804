//! Gap discovery over a platform layout.

use ledgejump_core::Platform;

/// Horizontal empty interval between two x-adjacent platforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gap {
    /// Index of the left platform within the x-sorted layout.
    pub left: usize,
    /// Right edge of the left platform.
    pub start: f32,
    /// Left edge of the right platform.
    pub end: f32,
    /// Top edge of the higher of the two platforms.
    pub anchor_y: f32,
}

impl Gap {
    fn between(left: usize, a: &Platform, b: &Platform) -> Self {
        Self {
            left,
            start: a.right(),
            end: b.x,
            anchor_y: a.y.min(b.y),
        }
    }

    /// Horizontal extent. Negative when the platforms overlap in x.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    /// Horizontal center of the interval.
    #[must_use]
    pub fn center(&self) -> f32 {
        (self.start + self.end) / 2.0
    }

    /// Reports whether the gap is open and at least `min_width` wide.
    #[must_use]
    pub fn qualifies(&self, min_width: f32) -> bool {
        let width = self.width();
        width > 0.0 && width >= min_width
    }
}

/// Points a gap must keep its distance from, plus gaps that are already taken.
#[derive(Clone, Copy, Debug)]
pub struct Exclusion<'a> {
    /// Horizontal centers of items already placed.
    pub points: &'a [f32],
    /// Smallest allowed distance between a gap center and any point.
    pub min_distance: f32,
    /// `Gap::left` indices of consumed gaps.
    pub consumed: &'a [usize],
}

impl Exclusion<'_> {
    /// Reports whether the gap is free and far enough from every point.
    #[must_use]
    pub fn admits(&self, gap: &Gap) -> bool {
        if self.consumed.contains(&gap.left) {
            return false;
        }
        let center = gap.center();
        self.points
            .iter()
            .all(|point| (center - point).abs() >= self.min_distance)
    }
}

/// Platforms sorted by x together with the gaps between neighbours.
#[derive(Clone, Debug)]
pub struct GapIndex {
    platforms: Vec<Platform>,
    gaps: Vec<Gap>,
    midpoint: f32,
}

impl GapIndex {
    /// Builds the index. Returns `None` for an empty layout.
    #[must_use]
    pub fn new(platforms: &[Platform]) -> Option<Self> {
        if platforms.is_empty() {
            return None;
        }

        let mut sorted = platforms.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        let gaps = sorted
            .windows(2)
            .enumerate()
            .map(|(left, pair)| Gap::between(left, &pair[0], &pair[1]))
            .collect();

        let min_left = sorted.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_right = sorted
            .iter()
            .map(Platform::right)
            .fold(f32::NEG_INFINITY, f32::max);

        Some(Self {
            platforms: sorted,
            gaps,
            midpoint: (min_left + max_right) / 2.0,
        })
    }

    /// Gaps in ascending x order.
    #[must_use]
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// Midpoint between the leftmost and the rightmost platform edges.
    #[must_use]
    pub fn midpoint(&self) -> f32 {
        self.midpoint
    }

    /// Platform at the middle index of the sorted layout.
    #[must_use]
    pub fn middle_platform(&self) -> &Platform {
        &self.platforms[self.platforms.len() / 2]
    }

    /// Mean facing-edge distance between neighbours, overlaps counting as zero.
    #[must_use]
    pub fn average_spacing(&self) -> f32 {
        if self.gaps.is_empty() {
            return 0.0;
        }
        let total: f32 = self.gaps.iter().map(|gap| gap.width().max(0.0)).sum();
        total / self.gaps.len() as f32
    }

    /// Gap whose center lies within half a pixel of `x`.
    #[must_use]
    pub fn gap_centered_at(&self, x: f32) -> Option<&Gap> {
        self.gaps.iter().find(|gap| (gap.center() - x).abs() <= 0.5)
    }

    /// Open gap at least `min_width` wide whose center is closest to the midpoint.
    #[must_use]
    pub fn first_gap_at_or_above(&self, min_width: f32) -> Option<&Gap> {
        self.closest_to_midpoint(self.gaps.iter().filter(|gap| gap.qualifies(min_width)))
    }

    /// Like [`GapIndex::first_gap_at_or_above`], skipping gaps the exclusion rejects.
    #[must_use]
    pub fn first_gap_excluding(&self, min_width: f32, exclusion: &Exclusion<'_>) -> Option<&Gap> {
        self.closest_to_midpoint(
            self.gaps
                .iter()
                .filter(|gap| gap.qualifies(min_width) && exclusion.admits(gap)),
        )
    }

    fn closest_to_midpoint<'a>(&self, candidates: impl Iterator<Item = &'a Gap>) -> Option<&'a Gap> {
        // min_by keeps the first of equal elements, so ties resolve to the lower x.
        candidates.min_by(|a, b| {
            let a_distance = (a.center() - self.midpoint).abs();
            let b_distance = (b.center() - self.midpoint).abs();
            a_distance.total_cmp(&b_distance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Vec<Platform> {
        vec![
            Platform::new(500.0, 380.0, 250.0, 20.0),
            Platform::new(100.0, 400.0, 200.0, 20.0),
            Platform::new(780.0, 300.0, 100.0, 20.0),
        ]
    }

    #[test]
    fn gaps_follow_sorted_platforms() {
        let index = GapIndex::new(&layout()).expect("non-empty layout");
        let gaps = index.gaps();
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].start, 300.0);
        assert_eq!(gaps[0].end, 500.0);
        assert_eq!(gaps[0].anchor_y, 380.0);
        assert_eq!(gaps[1].width(), 30.0);
        assert_eq!(index.midpoint(), 490.0);
    }

    #[test]
    fn width_threshold_filters_narrow_gaps() {
        let index = GapIndex::new(&layout()).expect("non-empty layout");
        assert_eq!(index.first_gap_at_or_above(60.0).map(Gap::center), Some(400.0));
        assert_eq!(index.first_gap_at_or_above(250.0), None);
    }

    #[test]
    fn exclusion_rejects_nearby_and_consumed_gaps() {
        let index = GapIndex::new(&layout()).expect("non-empty layout");
        let near = Exclusion {
            points: &[420.0],
            min_distance: 100.0,
            consumed: &[],
        };
        assert_eq!(index.first_gap_excluding(20.0, &near).map(|gap| gap.left), Some(1));

        let consumed = Exclusion {
            points: &[],
            min_distance: 0.0,
            consumed: &[0, 1],
        };
        assert_eq!(index.first_gap_excluding(0.0, &consumed), None);
    }

    #[test]
    fn overlapping_platforms_never_qualify() {
        let index = GapIndex::new(&[
            Platform::new(0.0, 300.0, 200.0, 20.0),
            Platform::new(150.0, 200.0, 200.0, 20.0),
        ])
        .expect("non-empty layout");
        assert_eq!(index.first_gap_at_or_above(0.0), None);
        assert_eq!(index.average_spacing(), 0.0);
    }

    #[test]
    fn empty_layout_has_no_index() {
        assert!(GapIndex::new(&[]).is_none());
    }
}
