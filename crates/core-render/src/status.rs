//! Status line composition.
//!
//! Format: `[SCOPE] <name>[*] Ln X/N[ [PAD]]`
//! * `SCOPE` is `OFF`, `GROUP` or `EXTENDED` (region mode).
//! * `<name>` is the base file name, or `[No Name]` for scratch text.
//! * `*` appears only when the document was structurally edited.
//! * `X` is the 1-based cursor line, `-` when no line is selected.
//!
//! Built in two steps: `compose_status` yields ordered segments and
//! `format_status` renders them.

use core_state::RegionScope;
use std::borrow::Cow;
use std::path::Path;

/// What the status line needs to know.
pub struct StatusContext<'a> {
    pub scope: RegionScope,
    pub cursor: Option<usize>,
    pub len: usize,
    pub file_name: Option<&'a Path>,
    pub dirty: bool,
    pub pad_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Scope(&'static str),
    /// Leading space and trailing dirty marker included.
    FileName(Cow<'a, str>),
    Position { line_1: Option<usize>, total: usize },
    PadOpen,
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let scope = match ctx.scope {
        RegionScope::Off => "OFF",
        RegionScope::Group => "GROUP",
        RegionScope::Extended => "EXTENDED",
    };
    let name: Cow<'a, str> = match ctx.file_name.and_then(|p| p.file_name()).and_then(|s| s.to_str()) {
        Some(name) => name.into(),
        None => "[No Name]".into(),
    };
    let marker = if ctx.dirty { "*" } else { "" };

    let mut out = Vec::with_capacity(4);
    out.push(StatusSegment::Scope(scope));
    out.push(StatusSegment::FileName(format!(" {name}{marker}").into()));
    out.push(StatusSegment::Position {
        line_1: ctx.cursor.map(|i| i + 1),
        total: ctx.len,
    });
    if ctx.pad_open {
        out.push(StatusSegment::PadOpen);
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(40);
    for seg in segments {
        match seg {
            StatusSegment::Scope(scope) => {
                s.push('[');
                s.push_str(scope);
                s.push(']');
            }
            StatusSegment::FileName(name) => s.push_str(name),
            StatusSegment::Position { line_1: Some(l), total } => {
                let _ = write!(s, " Ln {l}/{total}");
            }
            StatusSegment::Position { line_1: None, total } => {
                let _ = write!(s, " Ln -/{total}");
            }
            StatusSegment::PadOpen => s.push_str(" [PAD]"),
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext<'_>) -> String {
    format_status(&compose_status(ctx))
}
