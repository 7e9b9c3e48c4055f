//! Region resolution over the flat line sequence.
//!
//! A region answers "which lines belong with this line". It is a pure
//! function of `(lines, index)` and is recomputed on every query; nothing
//! here is cached across mutations.
//!
//! Group rule (the default), driven by the line immediately below:
//! * next line absent            -> empty
//! * next indent == line indent  -> flat: run of following lines with that
//!   exact indent
//! * next indent >  line indent  -> nested: run of following lines strictly
//!   more indented than the line
//! * next indent <  line indent  -> empty
//!
//! Extended rule: every following line up to (excluding) the first one that
//! is strictly less indented than the line.
//!
//! Every returned range starts at `index + 1` and never contains `index`.

use core_text::Line;
use std::ops::Range;

/// How much of the following text a selection takes along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionScope {
    #[default]
    Off,
    /// Flat sibling run or nested subtree, per the group rule.
    Group,
    /// Lines until the first shallower line.
    Extended,
}

/// Which branch of the group rule applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Empty,
    Flat,
    Nested,
}

/// Classify the group rule at `index`.
pub fn region_kind(lines: &[Line], index: usize) -> RegionKind {
    let (Some(node), Some(next)) = (lines.get(index), lines.get(index + 1)) else {
        return RegionKind::Empty;
    };
    if next.indent() == node.indent() {
        RegionKind::Flat
    } else if next.indent() > node.indent() {
        RegionKind::Nested
    } else {
        RegionKind::Empty
    }
}

/// Group region of the line at `index`.
pub fn region_at(lines: &[Line], index: usize) -> Range<usize> {
    let start = (index + 1).min(lines.len());
    let Some(node) = lines.get(index) else {
        return start..start;
    };
    let indent = node.indent();
    let len = match region_kind(lines, index) {
        RegionKind::Empty => 0,
        RegionKind::Flat => run_len(&lines[start..], |l| l.indent() == indent),
        RegionKind::Nested => run_len(&lines[start..], |l| l.indent() > indent),
    };
    start..start + len
}

/// Extended region of the line at `index`.
pub fn extended_region_at(lines: &[Line], index: usize) -> Range<usize> {
    let start = (index + 1).min(lines.len());
    let Some(node) = lines.get(index) else {
        return start..start;
    };
    let indent = node.indent();
    start..start + run_len(&lines[start..], |l| l.indent() >= indent)
}

/// Region of the line at `index` under `scope` (`Off` is always empty).
pub fn region_for_scope(lines: &[Line], index: usize, scope: RegionScope) -> Range<usize> {
    match scope {
        RegionScope::Off => {
            let start = (index + 1).min(lines.len());
            start..start
        }
        RegionScope::Group => region_at(lines, index),
        RegionScope::Extended => extended_region_at(lines, index),
    }
}

fn run_len(lines: &[Line], pred: impl Fn(&Line) -> bool) -> usize {
    lines.iter().take_while(|l| pred(l)).count()
}
