//! Cursor position and region mode.
//!
//! The cursor is an index into the current line sequence (or `None`) plus a
//! `RegionScope`. The selection itself is never stored: callers derive it
//! from the scope through `region::region_for_scope` each time.
//!
//! Invariant: after `clamp_after_mutation(len)` the index is either `None`
//! (empty document) or `< len`.

use crate::EditError;
use crate::region::RegionScope;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorModel {
    line: Option<usize>,
    scope: RegionScope,
}

impl CursorModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn scope(&self) -> RegionScope {
        self.scope
    }

    pub fn region_active(&self) -> bool {
        self.scope != RegionScope::Off
    }

    /// Place the cursor on `index` of a `len`-line document.
    pub fn move_to(&mut self, index: usize, len: usize) -> Result<(), EditError> {
        if index >= len {
            return Err(EditError::OutOfRange { index, len });
        }
        self.line = Some(index);
        Ok(())
    }

    /// Previous line, clamped at 0. An unset cursor lands on the first line.
    pub fn move_up(&mut self, len: usize) {
        self.line = match (self.line, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.saturating_sub(1).min(len - 1)),
        };
    }

    /// Next line, clamped at the last index. An unset cursor lands on the
    /// first line.
    pub fn move_down(&mut self, len: usize) {
        self.line = match (self.line, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some((i + 1).min(len - 1)),
        };
    }

    /// Binary toggle: Off <-> Group. An active Extended scope turns off.
    pub fn toggle_region(&mut self) {
        self.scope = match self.scope {
            RegionScope::Off => RegionScope::Group,
            RegionScope::Group | RegionScope::Extended => RegionScope::Off,
        };
    }

    /// Ternary cycle: Off -> Group -> Extended -> Off.
    pub fn cycle_region(&mut self) {
        self.scope = match self.scope {
            RegionScope::Off => RegionScope::Group,
            RegionScope::Group => RegionScope::Extended,
            RegionScope::Extended => RegionScope::Off,
        };
    }

    pub fn set_region(&mut self, active: bool) {
        self.scope = if active {
            RegionScope::Group
        } else {
            RegionScope::Off
        };
    }

    pub fn set_scope(&mut self, scope: RegionScope) {
        self.scope = scope;
    }

    /// Drop both the cursor and region mode.
    pub fn clear(&mut self) {
        self.line = None;
        self.scope = RegionScope::Off;
    }

    /// Re-establish the index invariant after the sequence changed length.
    pub fn clamp_after_mutation(&mut self, new_len: usize) {
        self.line = match self.line {
            _ if new_len == 0 => None,
            Some(i) if i >= new_len => Some(new_len - 1),
            other => other,
        };
    }
}
