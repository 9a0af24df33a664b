// Copyright 2025 LiveKit, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::atomic::{AtomicU64, Ordering};

use lazy_static::lazy_static;
use parking_lot::Mutex;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum LoggingSeverity {
    Verbose,
    Info,
    Warning,
    Error,
    None,
}

pub type SinkFn = fn(String, LoggingSeverity);

lazy_static! {
    static ref SINKS: Mutex<Vec<(u64, SinkFn)>> = Default::default();
}

static NEXT_SINK_ID: AtomicU64 = AtomicU64::new(1);

/// Receives every engine log line while alive. Lines keep the engine's
/// trailing newline.
pub struct LogSink {
    id: u64,
}

pub fn new_log_sink(fnc: SinkFn) -> LogSink {
    let id = NEXT_SINK_ID.fetch_add(1, Ordering::Relaxed);
    SINKS.lock().push((id, fnc));
    LogSink { id }
}

impl Drop for LogSink {
    fn drop(&mut self) {
        SINKS.lock().retain(|(id, _)| *id != self.id);
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink").field("id", &self.id).finish()
    }
}

pub(crate) fn emit(severity: LoggingSeverity, msg: String) {
    // Copy out so a sink may log without deadlocking
    let sinks: Vec<SinkFn> = SINKS.lock().iter().map(|(_, f)| *f).collect();
    if sinks.is_empty() {
        return;
    }

    let line = format!("{}\n", msg);
    for sink in sinks {
        sink(line.clone(), severity);
    }
}

macro_rules! engine_log {
    ($severity:ident, $($arg:tt)+) => {
        $crate::logsink::emit($crate::logsink::LoggingSeverity::$severity, format!($($arg)+))
    };
}

pub(crate) use engine_log;

#[cfg(test)]
mod tests {
    use super::*;

    lazy_static! {
        static ref CAPTURED: Mutex<Vec<(String, LoggingSeverity)>> = Default::default();
    }

    fn capture(msg: String, severity: LoggingSeverity) {
        CAPTURED.lock().push((msg, severity));
    }

    #[test]
    fn sink_receives_lines_until_dropped() {
        let sink = new_log_sink(capture);
        engine_log!(Warning, "device {} stalled", 3);
        drop(sink);
        engine_log!(Info, "not captured");

        let captured = CAPTURED.lock();
        assert!(captured
            .iter()
            .any(|(m, s)| m == "device 3 stalled\n" && *s == LoggingSeverity::Warning));
        assert!(!captured.iter().any(|(m, _)| m.starts_with("not captured")));
    }
}
