/// Cooperative progress/cancellation hook for the depth-refinement loop.
///
/// `Localiser::run` polls this at the top of every depth step. The default is a silent no-op;
/// the CLI supplies an `indicatif`-backed implementation, mirroring the reference
/// implementation's `tqdm`/`trange` progress bar without tying the core to any particular
/// terminal UI.
pub trait ProgressSink {
    /// Called once before the initial fragmentation, with the total number of depth steps.
    fn start(&mut self, _total_steps: usize) {}

    /// Called at the top of each depth step (`step` is 1-based). Returning `false` requests
    /// cooperative early termination; the localiser stops after completing the current step's
    /// markup and samples whatever survived so far.
    fn step(&mut self, _step: usize, _active_leaves: usize) -> bool {
        true
    }

    fn finish(&mut self) {}
}

/// The default, silent [`ProgressSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {}
