//! Call stack reconstruction from function-label boundaries.
//!
//! There is no frame or stack-pointer information in the simulator log, so
//! the stack is driven purely by the listing: entering the first instruction
//! of a labelled function pushes it, executing the last instruction before the
//! next label pops.

use revtrace_parse::{DisassemblyIndex, ExecutedRecord};
use tracing::trace;

/// One frame of the reconstructed call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub label: String,
}

/// Stack of function labels. The root frame is never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    /// Create a stack holding only the root frame.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            frames: vec![CallFrame { label: root.into() }],
        }
    }

    pub fn push(&mut self, label: impl Into<String>) {
        self.frames.push(CallFrame {
            label: label.into(),
        });
    }

    /// Pop the top frame. A root-only stack is left untouched.
    pub fn pop(&mut self) -> Option<CallFrame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn top(&self) -> &CallFrame {
        // Never empty: the root frame is kept by `pop`.
        &self.frames[self.frames.len() - 1]
    }

    /// Frame labels from root to top.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.frames.iter().map(|f| f.label.clone()).collect()
    }
}

/// Answer to a point-in-time call stack query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSnapshot {
    pub tick: u64,
    pub address: u64,
    /// Labels from root to top.
    pub frames: Vec<String>,
}

/// Tracks the call stack across executed records.
pub struct CallStackTracker<'a> {
    index: &'a DisassemblyIndex,
    stack: CallStack,
    query: Option<u64>,
    answered: bool,
}

impl<'a> CallStackTracker<'a> {
    /// Create a tracker rooted at `root`, answering a query for tick `query`.
    #[must_use]
    pub fn new(index: &'a DisassemblyIndex, root: impl Into<String>, query: Option<u64>) -> Self {
        Self {
            index,
            stack: CallStack::new(root),
            query,
            answered: false,
        }
    }

    /// Apply one executed record.
    ///
    /// A return boundary pops before a start boundary at the same address
    /// pushes. Returns the stack snapshot the first time a record carries the
    /// queried tick.
    pub fn observe(&mut self, record: &ExecutedRecord) -> Option<StackSnapshot> {
        if let Some(ret) = self.index.function_return(record.address) {
            let popped = self.stack.pop();
            trace!(
                addr = format!("{:#x}", record.address),
                function = %ret.enclosing_label,
                popped = popped.is_some(),
                "function exit"
            );
        }
        if let Some(start) = self.index.function_start(record.address) {
            trace!(
                addr = format!("{:#x}", record.address),
                function = %start.label,
                "function entry"
            );
            self.stack.push(start.label.as_str());
        }

        if self.answered || self.query.is_none() || record.clock_tick != self.query {
            return None;
        }
        self.answered = true;
        Some(StackSnapshot {
            tick: record.clock_tick.unwrap_or_default(),
            address: record.address,
            frames: self.stack.labels(),
        })
    }

    #[must_use]
    pub const fn stack(&self) -> &CallStack {
        &self.stack
    }

    /// Whether the queried tick has been seen.
    #[must_use]
    pub const fn answered(&self) -> bool {
        self.answered
    }
}

#[cfg(test)]
mod tests {
    use revtrace_parse::Dialect;

    use super::*;

    const LISTING: &str = "\
0000000000010000 <main>:
   10000:\t1141\taddi\tsp,sp,-16
   10002:\t2021\tjal\tra,10008 <foo>
   10004:\t0141\taddi\tsp,sp,16
   10006:\t8082\tret
0000000000010008 <foo>:
   10008:\t4501\tli\ta0,0
   1000a:\t8082\tret
000000000001000c <bar>:
   1000c:\t8082\tret
";

    fn record(address: u64, tick: u64) -> ExecutedRecord {
        ExecutedRecord {
            address,
            text: String::new(),
            clock_tick: Some(tick),
            dialect: Dialect::RenderTick,
        }
    }

    #[test]
    fn test_root_never_popped() {
        let mut stack = CallStack::new("main");
        assert!(stack.pop().is_none());
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().label, "main");

        stack.push("foo");
        assert_eq!(stack.pop().unwrap().label, "foo");
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_and_pop_follow_boundaries() {
        let index = DisassemblyIndex::from_lines(LISTING.lines());
        let mut tracker = CallStackTracker::new(&index, "main", None);

        tracker.observe(&record(0x10000, 1));
        assert_eq!(tracker.stack().labels(), vec!["main", "main"]);

        tracker.observe(&record(0x10002, 2));
        tracker.observe(&record(0x10008, 3));
        assert_eq!(tracker.stack().labels(), vec!["main", "main", "foo"]);

        // 1000a is the last instruction before <bar>.
        tracker.observe(&record(0x1000a, 4));
        assert_eq!(tracker.stack().labels(), vec!["main", "main"]);
    }

    #[test]
    fn test_query_answered_after_third_record() {
        let index = DisassemblyIndex::from_lines(LISTING.lines());
        let mut tracker = CallStackTracker::new(&index, "main", Some(42));

        assert!(tracker.observe(&record(0x10000, 40)).is_none());
        assert!(tracker.observe(&record(0x10002, 41)).is_none());
        let snapshot = tracker.observe(&record(0x10008, 42)).unwrap();
        assert_eq!(snapshot.tick, 42);
        assert_eq!(snapshot.address, 0x10008);
        assert_eq!(snapshot.frames, vec!["main", "main", "foo"]);
        assert!(tracker.answered());
    }

    #[test]
    fn test_query_is_one_shot() {
        let index = DisassemblyIndex::from_lines(LISTING.lines());
        let mut tracker = CallStackTracker::new(&index, "main", Some(5));

        assert!(tracker.observe(&record(0x10000, 5)).is_some());
        assert!(tracker.observe(&record(0x10002, 5)).is_none());
        // Tracking continues after the answer.
        tracker.observe(&record(0x10008, 6));
        assert_eq!(tracker.stack().top().label, "foo");
    }

    #[test]
    fn test_no_query_without_tick() {
        let index = DisassemblyIndex::from_lines(LISTING.lines());
        let mut tracker = CallStackTracker::new(&index, "main", Some(0));
        let untimed = ExecutedRecord {
            clock_tick: None,
            ..record(0x10000, 0)
        };
        assert!(tracker.observe(&untimed).is_none());
        assert!(!tracker.answered());
    }

    #[test]
    fn test_pop_before_push_on_shared_address() {
        // <one> holds a single instruction, so its start and return
        // boundaries coincide.
        let listing = "\
0000000000020000 <one>:
   20000:\t8082\tret
0000000000020002 <two>:
   20002:\t8082\tret
";
        let index = DisassemblyIndex::from_lines(listing.lines());
        let mut tracker = CallStackTracker::new(&index, "main", None);

        tracker.observe(&record(0x20000, 1));
        assert_eq!(tracker.stack().labels(), vec!["main", "one"]);
    }

    #[test]
    fn test_exit_on_root_only_stack_is_noop() {
        let index = DisassemblyIndex::from_lines(LISTING.lines());
        let mut tracker = CallStackTracker::new(&index, "main", None);
        tracker.observe(&record(0x1000a, 1));
        assert_eq!(tracker.stack().depth(), 1);
    }
}
