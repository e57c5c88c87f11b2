// src/progress.rs
/// Pipeline stages in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Normalize,
    LoadBaseline,
    Diff,
    Render,
    Save,
    Deliver,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Parse,
        Stage::Normalize,
        Stage::LoadBaseline,
        Stage::Diff,
        Stage::Render,
        Stage::Save,
        Stage::Deliver,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Normalize => "normalize",
            Stage::LoadBaseline => "load baseline",
            Stage::Diff => "diff",
            Stage::Render => "render",
            Stage::Save => "save",
            Stage::Deliver => "deliver",
        }
    }
}

/// Lightweight progress reporting for a run.
/// Front-ends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of stages that will run.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when a stage completes.
    fn stage_done(&mut self, _stage: Stage) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
