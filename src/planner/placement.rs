use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::{
    AnchorConfig, AnchorKind, ClockTime, PlannerInputs, PreWorkoutMode, SlotKind, SlotRole,
};

/// An anchor resolved to a concrete time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPoint {
    pub anchor: AnchorKind,
    pub time: ClockTime,
}

/// Why an anchor could not be placed as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum AnchorIssue {
    /// The anchor's window does not overlap the eating window.
    OutsideWindow { anchor: AnchorKind },
    /// The later anchor cannot be pushed far enough from the earlier one.
    TooClose {
        earlier: AnchorKind,
        later: AnchorKind,
    },
}

impl AnchorIssue {
    pub fn anchors(&self) -> Vec<AnchorKind> {
        match *self {
            AnchorIssue::OutsideWindow { anchor } => vec![anchor],
            AnchorIssue::TooClose { earlier, later } => vec![earlier, later],
        }
    }
}

impl fmt::Display for AnchorIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorIssue::OutsideWindow { anchor } => {
                write!(f, "{} window lies outside the eating window", anchor)
            }
            AnchorIssue::TooClose { earlier, later } => write!(
                f,
                "{} cannot be placed far enough after {}",
                later, earlier
            ),
        }
    }
}

/// Fixed points in time order plus anything that did not fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedLayout {
    pub points: Vec<FixedPoint>,
    pub issues: Vec<AnchorIssue>,
}

/// A slot with a time and role but no amounts yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedSlot {
    pub time: ClockTime,
    pub role: SlotRole,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    anchor: AnchorKind,
    time: i64,
    latest: i64,
}

/// Absolute `(earliest, latest, canonical)` minutes for an anchor.
///
/// `None` for workout anchors when no workout window was given.
fn anchor_range(
    inputs: &PlannerInputs,
    anchors: &AnchorConfig,
    kind: AnchorKind,
) -> Option<(i64, i64, i64)> {
    let w = anchors.window(kind);
    let (min, max, mid) = (i64::from(w.min()), i64::from(w.max()), i64::from(w.midpoint()));
    let after = |t: ClockTime| {
        let t = i64::from(t.minutes());
        (t + min, t + max, t + mid)
    };
    let before = |t: ClockTime| {
        let t = i64::from(t.minutes());
        (t - max, t - min, t - mid)
    };
    match kind {
        AnchorKind::Breakfast => Some(after(inputs.wake)),
        AnchorKind::PreWorkout => inputs.workout.map(|w| before(w.start)),
        AnchorKind::PostWorkout => inputs.workout.map(|w| after(w.end)),
        AnchorKind::PreSleep => Some(before(inputs.sleep)),
    }
}

/// Resolve every active anchor to a concrete time.
///
/// Each anchor starts at its window midpoint, clamped into the eating
/// window. Walking in time order, an anchor closer than `min_gap_min` to
/// the previous one is pushed later, but never past the end of its own
/// window; if that is not enough the pair is reported as too close.
pub fn resolve_fixed_points(inputs: &PlannerInputs) -> FixedLayout {
    let anchors = inputs.anchors();
    let (earliest, latest) = inputs.eating_window();
    let (earliest, latest) = (i64::from(earliest), i64::from(latest));

    let mut candidates = Vec::new();
    let mut issues = Vec::new();

    for kind in AnchorKind::ALL {
        if !inputs.includes(kind) {
            continue;
        }
        let Some((lo, hi, canonical)) = anchor_range(inputs, &anchors, kind) else {
            continue;
        };
        let lo = lo.max(earliest);
        let hi = hi.min(latest);
        if lo > hi {
            issues.push(AnchorIssue::OutsideWindow { anchor: kind });
            continue;
        }
        candidates.push(Candidate {
            anchor: kind,
            time: canonical.clamp(lo, hi),
            latest: hi,
        });
    }

    candidates.sort_by_key(|c| (c.time, c.anchor));

    let min_gap = i64::from(inputs.min_gap_min);
    for i in 1..candidates.len() {
        let needed = candidates[i - 1].time + min_gap;
        if candidates[i].time >= needed {
            continue;
        }
        if needed <= candidates[i].latest {
            candidates[i].time = needed;
        } else {
            issues.push(AnchorIssue::TooClose {
                earlier: candidates[i - 1].anchor,
                later: candidates[i].anchor,
            });
        }
    }

    let points: Vec<FixedPoint> = candidates
        .iter()
        .map(|c| FixedPoint {
            anchor: c.anchor,
            time: ClockTime::at(c.time as u32),
        })
        .collect();

    tracing::debug!(?points, ?issues, "resolved fixed points");
    FixedLayout { points, issues }
}

/// A stretch of the day free meals can go into.
///
/// The start is always a fixed meal. The end is either the next fixed meal
/// (closed) or the pre-sleep cutoff (open).
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: i64,
    end: i64,
    closed_end: bool,
}

impl Segment {
    fn len(&self) -> i64 {
        self.end - self.start
    }

    /// Meal-to-meal intervals inside the segment when it holds `k` free meals.
    fn gaps(&self, k: usize) -> i64 {
        k as i64 + i64::from(self.closed_end)
    }

    /// Most free meals that fit with every interval at least `min_gap`.
    fn capacity(&self, min_gap: i64) -> usize {
        let c = self.len().div_euclid(min_gap) - i64::from(self.closed_end);
        c.max(0) as usize
    }

    fn spacing(&self, k: usize) -> f64 {
        self.len() as f64 / self.gaps(k) as f64
    }

    /// Evenly spaced free meal times. Open-ended segments space at the
    /// target gap when there is room.
    fn spread(&self, k: usize, target_gap: i64) -> Vec<i64> {
        if k == 0 {
            return Vec::new();
        }
        let mut step = self.len() / self.gaps(k);
        if !self.closed_end {
            step = step.min(target_gap);
        }
        (1..=k as i64).map(|i| self.start + step * i).collect()
    }
}

fn segments(points: &[FixedPoint], latest: i64) -> Vec<Segment> {
    let times: Vec<i64> = points.iter().map(|p| i64::from(p.time.minutes())).collect();
    let mut out: Vec<Segment> = times
        .windows(2)
        .map(|pair| Segment {
            start: pair[0],
            end: pair[1],
            closed_end: true,
        })
        .collect();
    if let Some(&last) = times.last() {
        out.push(Segment {
            start: last,
            end: latest,
            closed_end: false,
        });
    }
    out
}

/// Free meals that fit between and after the fixed points at `min_gap_min`.
///
/// Free meals never precede the first fixed point.
pub fn free_capacity(inputs: &PlannerInputs, points: &[FixedPoint]) -> usize {
    let (_, latest) = inputs.eating_window();
    let min_gap = i64::from(inputs.min_gap_min);
    segments(points, i64::from(latest))
        .iter()
        .map(|s| s.capacity(min_gap))
        .sum()
}

/// Hand out free meals one at a time to the segment that would keep the
/// widest spacing. Ties go to the earlier segment.
fn distribute(segments: &[Segment], free: usize, min_gap: i64) -> Option<Vec<usize>> {
    let mut counts = vec![0usize; segments.len()];
    for _ in 0..free {
        let best = segments
            .iter()
            .enumerate()
            .filter(|(i, s)| counts[*i] < s.capacity(min_gap))
            .map(|(i, s)| (i, s.spacing(counts[i] + 1)))
            .fold(None, |best: Option<(usize, f64)>, (i, spacing)| match best {
                Some((_, b)) if b >= spacing => best,
                _ => Some((i, spacing)),
            });
        let (i, _) = best?;
        counts[i] += 1;
    }
    Some(counts)
}

/// Type the pre-workout slot. In auto mode it is a snack when it sits
/// within the target gap of a neighbouring fixed point.
fn pre_workout_kind(inputs: &PlannerInputs, points: &[FixedPoint], idx: usize) -> SlotKind {
    match inputs.anchors().pre_workout_mode {
        PreWorkoutMode::Snack => SlotKind::Snack,
        PreWorkoutMode::Meal => SlotKind::Meal,
        PreWorkoutMode::Auto => {
            let time = points[idx].time.minutes();
            let close = |other: &FixedPoint| time.abs_diff(other.time.minutes()) < inputs.target_gap_min;
            let prev = idx.checked_sub(1).and_then(|i| points.get(i));
            let next = points.get(idx + 1);
            if prev.is_some_and(close) || next.is_some_and(close) {
                SlotKind::Snack
            } else {
                SlotKind::Meal
            }
        }
    }
}

/// Turn feasible inputs into time-ordered slots.
///
/// Fails with `InfeasibleConstraint` when anchors still conflict or the
/// free meals cannot be spaced at `min_gap_min`; run the inputs through
/// feasibility repair first to avoid both.
pub fn place_slots(inputs: &PlannerInputs) -> Result<Vec<PlacedSlot>> {
    let layout = resolve_fixed_points(inputs);

    if let Some(issue) = layout.issues.first() {
        return Err(PlanError::InfeasibleConstraint(format!(
            "anchor placement failed: {}",
            issue
        )));
    }
    if layout.points.is_empty() {
        return Err(PlanError::InfeasibleConstraint(
            "no fixed point opens the day".to_string(),
        ));
    }
    if layout.points.len() > inputs.meals_target {
        return Err(PlanError::InfeasibleConstraint(format!(
            "{} fixed anchors do not fit into {} meals",
            layout.points.len(),
            inputs.meals_target
        )));
    }

    let free = inputs.meals_target - layout.points.len();
    let (_, latest) = inputs.eating_window();
    let min_gap = i64::from(inputs.min_gap_min);
    let segs = segments(&layout.points, i64::from(latest));

    let counts = distribute(&segs, free, min_gap).ok_or_else(|| {
        PlanError::InfeasibleConstraint(format!(
            "{} free meal(s) requested but only {} fit at a {} min gap",
            free,
            free_capacity(inputs, &layout.points),
            inputs.min_gap_min
        ))
    })?;
    tracing::debug!(free, ?counts, "distributed free meals");

    let mut slots: Vec<PlacedSlot> = layout
        .points
        .iter()
        .enumerate()
        .map(|(idx, p)| PlacedSlot {
            time: p.time,
            role: p.anchor.into(),
            kind: match p.anchor {
                AnchorKind::PreWorkout => pre_workout_kind(inputs, &layout.points, idx),
                _ => SlotKind::Meal,
            },
        })
        .collect();

    let target_gap = i64::from(inputs.target_gap_min);
    for (seg, &k) in segs.iter().zip(&counts) {
        for t in seg.spread(k, target_gap) {
            slots.push(PlacedSlot {
                time: ClockTime::at(t as u32),
                role: SlotRole::Free,
                kind: SlotKind::Meal,
            });
        }
    }

    slots.sort_by_key(|s| s.time);
    Ok(slots)
}
