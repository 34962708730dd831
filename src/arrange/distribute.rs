//! Distribution of selected nodes along one axis
//!
//! Nodes are ordered by their leading edge and spread between the first and
//! the last one. Every target is computed in closed form from the exact
//! real-valued spacing and rounded once, so rounding does not drift across
//! a wide selection.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::error::{ArrangeError, ParseModeError};
use super::placement::Plan;
use super::snapshot::Snapshot;
use super::sorter::{self, AxisEntry};
use super::types::{round_even, Axis, Point};
use super::SkipReason;

/// How nodes are spaced along the axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpacingModel {
    /// Equal gaps between trailing and leading edges
    Gaps,
    /// Leading edges evenly spaced; the first node stays
    Leading,
    /// Trailing edges evenly spaced; the last node stays
    Trailing,
    /// Centers evenly spaced; the first and last nodes stay
    Center,
}

impl SpacingModel {
    /// Smallest number of movable nodes the model does anything with
    pub fn min_nodes(self) -> usize {
        match self {
            SpacingModel::Gaps => 2,
            SpacingModel::Leading | SpacingModel::Trailing | SpacingModel::Center => 3,
        }
    }
}

/// Distribution requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributeMode {
    Left,
    HCenter,
    Right,
    Top,
    VCenter,
    Bottom,
    /// Equal horizontal gaps
    Horizontal,
    /// Equal vertical gaps
    Vertical,
}

impl DistributeMode {
    pub const ALL: [DistributeMode; 8] = [
        DistributeMode::Left,
        DistributeMode::HCenter,
        DistributeMode::Right,
        DistributeMode::Top,
        DistributeMode::VCenter,
        DistributeMode::Bottom,
        DistributeMode::Horizontal,
        DistributeMode::Vertical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DistributeMode::Left => "left",
            DistributeMode::HCenter => "h_center",
            DistributeMode::Right => "right",
            DistributeMode::Top => "top",
            DistributeMode::VCenter => "v_center",
            DistributeMode::Bottom => "bottom",
            DistributeMode::Horizontal => "horizontal",
            DistributeMode::Vertical => "vertical",
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            DistributeMode::Top
            | DistributeMode::VCenter
            | DistributeMode::Bottom
            | DistributeMode::Vertical => Axis::Vertical,
            DistributeMode::Left
            | DistributeMode::HCenter
            | DistributeMode::Right
            | DistributeMode::Horizontal => Axis::Horizontal,
        }
    }

    pub fn model(self) -> SpacingModel {
        match self {
            DistributeMode::Left | DistributeMode::Top => SpacingModel::Leading,
            DistributeMode::Right | DistributeMode::Bottom => SpacingModel::Trailing,
            DistributeMode::HCenter | DistributeMode::VCenter => SpacingModel::Center,
            DistributeMode::Horizontal | DistributeMode::Vertical => SpacingModel::Gaps,
        }
    }
}

impl fmt::Display for DistributeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistributeMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseModeError {
                what: "distribution mode",
                value: s.to_string(),
                expected: "left, h_center, right, top, v_center, bottom, horizontal, vertical",
            })
    }
}

/// Target leading edges for `entries`, which must be sorted along the axis.
///
/// Returns `(index into entries, new leading edge)` for every node the model
/// places; anchored nodes are left out. `spacing` and `reverse` only apply
/// to [`SpacingModel::Gaps`].
pub fn targets(
    entries: &[AxisEntry],
    model: SpacingModel,
    spacing: Option<i32>,
    reverse: bool,
) -> Vec<(usize, i32)> {
    let n = entries.len();
    if n < model.min_nodes() {
        return Vec::new();
    }
    let (first, last) = (&entries[0], &entries[n - 1]);
    let steps = (n - 1) as f64;

    match (model, spacing) {
        (SpacingModel::Gaps, None) => {
            let start = f64::from(first.leading);
            let combined: f64 = entries.iter().map(|e| f64::from(e.size)).sum();
            let gap = (f64::from(last.trailing()) - start - combined) / steps;

            let mut before = 0.0;
            let mut out = Vec::with_capacity(n.saturating_sub(2));
            for (k, entry) in entries.iter().enumerate().take(n - 1) {
                if k > 0 {
                    out.push((k, round_even(start + before + k as f64 * gap)));
                }
                before += f64::from(entry.size);
            }
            out
        }
        (SpacingModel::Gaps, Some(s)) if reverse => {
            let mut cursor = last.leading;
            let mut out = Vec::with_capacity(n - 1);
            for k in (0..n - 1).rev() {
                let leading = cursor - s - entries[k].size;
                out.push((k, leading));
                cursor = leading;
            }
            out.reverse();
            out
        }
        (SpacingModel::Gaps, Some(s)) => {
            let mut cursor = first.trailing();
            let mut out = Vec::with_capacity(n - 1);
            for (k, entry) in entries.iter().enumerate().skip(1) {
                let leading = cursor + s;
                out.push((k, leading));
                cursor = leading + entry.size;
            }
            out
        }
        (SpacingModel::Leading, _) => {
            let (start, end) = (f64::from(first.leading), f64::from(last.leading));
            (1..n)
                .map(|k| (k, round_even(start + (end - start) * k as f64 / steps)))
                .collect()
        }
        (SpacingModel::Trailing, _) => {
            let (start, end) = (f64::from(first.trailing()), f64::from(last.trailing()));
            (0..n - 1)
                .map(|k| {
                    let trailing = round_even(start + (end - start) * k as f64 / steps);
                    (k, trailing - entries[k].size)
                })
                .collect()
        }
        (SpacingModel::Center, _) => {
            let center = |e: &AxisEntry| f64::from(e.leading) + f64::from(e.size) / 2.0;
            let (start, end) = (center(first), center(last));
            (1..n - 1)
                .map(|k| {
                    let c = start + (end - start) * k as f64 / steps;
                    (k, round_even(c - f64::from(entries[k].size) / 2.0))
                })
                .collect()
        }
    }
}

/// Compute distribution targets for the movable selected nodes.
pub fn plan(
    snapshot: &Snapshot,
    mode: DistributeMode,
    spacing: Option<i32>,
    reverse: bool,
) -> Result<Result<Plan, SkipReason>, ArrangeError> {
    let axis = mode.axis();
    let model = mode.model();
    let entries = sorter::sort(snapshot, axis)?;

    if entries.len() < model.min_nodes() {
        return Ok(Err(SkipReason::TooFewNodes {
            required: model.min_nodes(),
            found: entries.len(),
        }));
    }
    debug!(%mode, ?axis, ?model, ?spacing, reverse, count = entries.len(), "distributing");

    let mut plan = Plan::new();
    for (k, leading) in targets(&entries, model, spacing, reverse) {
        let entry = &entries[k];
        let position = Point::zero()
            .with(axis, entry.position + (leading - entry.leading))
            .with(axis.cross(), entry.alt_position);
        plan.push(entry.id.clone(), position);
    }

    if plan.is_empty() {
        return Ok(Err(SkipReason::NothingToMove));
    }
    Ok(Ok(plan))
}
