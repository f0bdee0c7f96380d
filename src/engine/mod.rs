//! Native engine call surface
//!
//! The rest of the crate talks to the engine exclusively through the
//! `sys` alias below. With the `vosk` cargo feature enabled it resolves to
//! real `extern "C"` bindings against libvosk; without it, a deterministic
//! in-process stub with identical signatures is used, so the crate builds
//! and tests on machines that do not have the native library installed.

#[cfg(feature = "vosk")]
mod ffi;
#[cfg(feature = "vosk")]
pub(crate) use ffi as sys;

#[cfg(not(feature = "vosk"))]
pub(crate) mod mock;
#[cfg(not(feature = "vosk"))]
pub(crate) use mock as sys;

/// Engine log verbosity, forwarded to `vosk_set_log_level`.
///
/// The engine logs to stderr on its own; `Silent` is what a CLI usually
/// wants so transcripts are not interleaved with Kaldi diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress engine diagnostics entirely.
    Silent,
    /// The engine's default (informational) output.
    Default,
    /// Full decoder diagnostics.
    Verbose,
}

/// Set the engine's global log verbosity.
pub fn set_log_level(level: LogLevel) {
    let raw = match level {
        LogLevel::Silent => -1,
        LogLevel::Default => 0,
        LogLevel::Verbose => 1,
    };
    unsafe { sys::vosk_set_log_level(raw) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_log_level() {
        // Must not fault regardless of level.
        set_log_level(LogLevel::Silent);
        set_log_level(LogLevel::Default);
        set_log_level(LogLevel::Verbose);
    }
}
