// gemstone/src/core/control.rs

//! Signals for controlling pipeline flow and the outcome of a pipeline run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Run the remaining handlers of this step and then the next step.
  Continue,
  /// Halt the run immediately. No further handlers or steps execute.
  Stop,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step was either executed or legitimately skipped.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
