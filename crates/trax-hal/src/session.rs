//! The cooperative session: cancellation, time, and sleeping.

use core::time::Duration;

/// Execution context for the control loops.
///
/// All loops run on the caller's single thread and poll [`Session::is_active`]
/// as their cancellation signal once per iteration — cancellation is advisory,
/// never preemptive. Time is monotonic and owned by the session so tests and
/// simulators can run on a virtual clock.
pub trait Session {
    /// `false` once the enclosing session has been stopped; loops exit
    /// promptly on the next poll.
    fn is_active(&self) -> bool;

    /// Monotonic time elapsed since the session started.
    fn elapsed(&mut self) -> Duration;

    /// Blocks the calling thread for `dur`.
    fn sleep(&mut self, dur: Duration);
}
