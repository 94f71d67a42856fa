//! Line-oriented diagnostic sinks.
//!
//! Generation and meshing print coarse progress ("Cycle: 3", "Calculating
//! Normals...") that an editor console wants to show verbatim. Components
//! take a `&dyn DiagnosticSink` instead of writing to a global console.

use std::sync::Mutex;

/// Receives one human-readable progress line at a time.
pub trait DiagnosticSink: Send + Sync {
    /// Append a line.
    fn line(&self, line: &str);
}

/// Forwards every line to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn line(&self, line: &str) {
        tracing::info!(target: "tessera::console", "{line}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn line(&self, _line: &str) {}
}

/// Keeps lines in memory, newest last.
///
/// Used by tests and by UI consoles that render the last few lines.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// The most recent `count` lines, newest last.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let lines = self.lines();
        let start = lines.len().saturating_sub(count);
        lines[start..].to_vec()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.line("first");
        sink.line("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_memory_sink_tail() {
        let sink = MemorySink::new();
        for i in 0..15 {
            sink.line(&format!("line {i}"));
        }
        let tail = sink.tail(3);
        assert_eq!(tail, vec!["line 12", "line 13", "line 14"]);
        assert_eq!(sink.tail(100).len(), 15);
    }

    #[test]
    fn test_memory_sink_clear() {
        let sink = MemorySink::new();
        sink.line("x");
        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_sinks_are_object_safe() {
        let sinks: Vec<Box<dyn DiagnosticSink>> =
            vec![Box::new(TracingSink), Box::new(NullSink), Box::new(MemorySink::new())];
        for sink in &sinks {
            sink.line("hello");
        }
    }
}
