//! Lexer modes and the mode stack
//!
//! Which rules apply depends on the command being lexed. A command keyword
//! pushes the mode for its arguments, a pipe pops back out, and a few rules
//! switch or push twice to model brackets and the METRICS grammar.

use crate::config::compile_time::lexical::MAX_MODE_DEPTH;
use std::fmt;

/// Named rule set the tokenizer can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Default,
    Explain,
    Expression,
    From,
    Project,
    Rename,
    Enrich,
    EnrichField,
    Lookup,
    LookupField,
    MvExpand,
    Show,
    Meta,
    Setting,
    Metrics,
    ClosingMetrics,
}

impl Mode {
    /// Every mode in index order
    pub const ALL: [Mode; 16] = [
        Mode::Default,
        Mode::Explain,
        Mode::Expression,
        Mode::From,
        Mode::Project,
        Mode::Rename,
        Mode::Enrich,
        Mode::EnrichField,
        Mode::Lookup,
        Mode::LookupField,
        Mode::MvExpand,
        Mode::Show,
        Mode::Meta,
        Mode::Setting,
        Mode::Metrics,
        Mode::ClosingMetrics,
    ];

    /// Grammar name of the mode
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Default => "DEFAULT_MODE",
            Mode::Explain => "EXPLAIN_MODE",
            Mode::Expression => "EXPRESSION_MODE",
            Mode::From => "FROM_MODE",
            Mode::Project => "PROJECT_MODE",
            Mode::Rename => "RENAME_MODE",
            Mode::Enrich => "ENRICH_MODE",
            Mode::EnrichField => "ENRICH_FIELD_MODE",
            Mode::Lookup => "LOOKUP_MODE",
            Mode::LookupField => "LOOKUP_FIELD_MODE",
            Mode::MvExpand => "MVEXPAND_MODE",
            Mode::Show => "SHOW_MODE",
            Mode::Meta => "META_MODE",
            Mode::Setting => "SETTING_MODE",
            Mode::Metrics => "METRICS_MODE",
            Mode::ClosingMetrics => "CLOSING_METRICS_MODE",
        }
    }

    /// Position of the mode in [`Mode::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stack operation attached to a lexer rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAction {
    Push(Mode),
    Pop,
    /// Pop, then push
    Switch(Mode),
}

/// Stack of active modes; the bottom entry is always [`Mode::Default`]
#[derive(Debug, Clone)]
pub struct ModeStack {
    stack: Vec<Mode>,
    max_depth: usize,
    dropped_pushes: usize,
    deepest: usize,
}

impl ModeStack {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_MODE_DEPTH)
    }

    /// Create a stack that refuses pushes beyond `max_depth` entries
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: vec![Mode::Default],
            max_depth: max_depth.max(1),
            dropped_pushes: 0,
            deepest: 1,
        }
    }

    /// Mode on top of the stack
    pub fn current(&self) -> Mode {
        self.stack.last().copied().unwrap_or(Mode::Default)
    }

    /// Push a mode; returns false when the depth limit dropped the push
    pub fn push(&mut self, mode: Mode) -> bool {
        if self.stack.len() >= self.max_depth {
            self.dropped_pushes += 1;
            return false;
        }
        self.stack.push(mode);
        self.deepest = self.deepest.max(self.stack.len());
        true
    }

    /// Pop the top mode; popping the root leaves the stack unchanged
    pub fn pop(&mut self) -> Mode {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }

    /// Apply a single action
    pub fn apply(&mut self, action: ModeAction) -> bool {
        match action {
            ModeAction::Push(mode) => self.push(mode),
            ModeAction::Pop => {
                self.pop();
                true
            }
            ModeAction::Switch(mode) => {
                self.pop();
                self.push(mode)
            }
        }
    }

    /// Apply a rule's actions in order; returns false if any push was dropped
    pub fn apply_all(&mut self, actions: &[ModeAction]) -> bool {
        actions
            .iter()
            .fold(true, |ok, &action| self.apply(action) && ok)
    }

    /// Number of entries, root included
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Largest depth reached so far
    pub fn max_depth_reached(&self) -> usize {
        self.deepest
    }

    /// Pushes refused because of the depth limit
    pub fn dropped_pushes(&self) -> usize {
        self.dropped_pushes
    }

    /// Modes from bottom to top
    pub fn modes(&self) -> &[Mode] {
        &self.stack
    }
}

impl Default for ModeStack {
    fn default() -> Self {
        Self::new()
    }
}
