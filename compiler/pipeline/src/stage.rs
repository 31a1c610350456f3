//! Pipeline states.
//!
//! A run walks the states strictly in order. Any error moves it to
//! [`Stage::Failed`]; `Done` and `Failed` are terminal.

use std::fmt;

/// A state of the conversion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Nothing has happened yet.
    Init,
    /// The source schema has been fetched and parsed.
    Loaded,
    /// The schema has been translated into a resource spec.
    Translated,
    /// The generator tree exists, holds the spec and knows the organization.
    GeneratorStaged,
    /// The generator's merge step and cfn2ts have run.
    GeneratorRun,
    /// The generated package has been copied to the output path.
    Relocated,
    /// The package manifest and build configuration are written.
    Finalized,
    /// The run completed.
    Done,
    /// The run aborted.
    Failed,
}

impl Stage {
    /// States of a successful run, in order.
    pub const SEQUENCE: [Stage; 8] = [
        Stage::Init,
        Stage::Loaded,
        Stage::Translated,
        Stage::GeneratorStaged,
        Stage::GeneratorRun,
        Stage::Relocated,
        Stage::Finalized,
        Stage::Done,
    ];

    /// The state a successful transition from `self` leads to.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Init => Some(Stage::Loaded),
            Stage::Loaded => Some(Stage::Translated),
            Stage::Translated => Some(Stage::GeneratorStaged),
            Stage::GeneratorStaged => Some(Stage::GeneratorRun),
            Stage::GeneratorRun => Some(Stage::Relocated),
            Stage::Relocated => Some(Stage::Finalized),
            Stage::Finalized => Some(Stage::Done),
            Stage::Done | Stage::Failed => None,
        }
    }

    /// Whether no transition leaves this state.
    pub fn is_terminal(self) -> bool { matches!(self, Stage::Done | Stage::Failed) }

    /// Name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Init => "Init",
            Stage::Loaded => "Loaded",
            Stage::Translated => "Translated",
            Stage::GeneratorStaged => "GeneratorStaged",
            Stage::GeneratorRun => "GeneratorRun",
            Stage::Relocated => "Relocated",
            Stage::Finalized => "Finalized",
            Stage::Done => "Done",
            Stage::Failed => "Failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
