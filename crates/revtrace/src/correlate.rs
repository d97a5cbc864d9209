//! Correlation of executed records against the listing and the reference.
//!
//! In static-only mode every executed PC is resolved against the disassembly
//! index. With a Spike reference queue the two traces are also stepped in
//! lockstep, one reference record per executed record. Only PCs are compared;
//! instruction text never is, so two encodings at the same address count as a
//! match.
//!
//! Traps are where the simulators disagree: Spike logs an exception marker
//! plus a detail record and then walks its trap handler, REV does not. When
//! the reference head is an exception marker, the queue is drained up to the
//! next occurrence of the executed PC.

use revtrace_parse::{DisassemblyIndex, ExecutedRecord, ReferenceQueue, ReferenceRecord};
use tracing::{debug, warn};

/// Per-pair comparison verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Match,
    Mismatch,
}

impl MatchResult {
    #[must_use]
    pub const fn from_matched(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Mismatch }
    }

    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }

    /// Row indicator: `+` for a match, `-` otherwise.
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Match => "+",
            Self::Mismatch => "-",
        }
    }
}

/// A resynchronization across an exception marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resync {
    /// Reference records dropped, marker and detail record included.
    pub discarded: usize,
    /// Whether the executed PC was found again.
    pub found: bool,
}

/// What an executed record correlated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// Static-only hit.
    Aligned { static_text: &'a str },
    /// Golden-mode hit. `reference` is `None` once the reference is exhausted.
    Compared {
        verdict: MatchResult,
        static_text: &'a str,
        reference: Option<ReferenceRecord>,
    },
    /// PC absent from the listing.
    Unindexed,
}

/// Result of correlating one executed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation<'a> {
    pub outcome: Outcome<'a>,
    pub resync: Option<Resync>,
    /// Set on the first record that finds the reference queue empty.
    pub reference_exhausted: bool,
}

/// Steps executed records against the index and an optional reference.
pub struct Correlator<'a> {
    index: &'a DisassemblyIndex,
    reference: Option<ReferenceQueue>,
    exhausted: bool,
}

impl<'a> Correlator<'a> {
    /// Static-only correlator.
    #[must_use]
    pub const fn new(index: &'a DisassemblyIndex) -> Self {
        Self {
            index,
            reference: None,
            exhausted: false,
        }
    }

    /// Correlator in golden-reference mode.
    #[must_use]
    pub const fn with_reference(index: &'a DisassemblyIndex, reference: ReferenceQueue) -> Self {
        Self {
            index,
            reference: Some(reference),
            exhausted: false,
        }
    }

    #[must_use]
    pub const fn is_golden(&self) -> bool {
        self.reference.is_some()
    }

    /// Reference records not yet consumed.
    #[must_use]
    pub fn remaining_reference(&self) -> usize {
        self.reference.as_ref().map_or(0, ReferenceQueue::len)
    }

    /// Correlate one executed record.
    pub fn correlate(&mut self, record: &ExecutedRecord) -> Correlation<'a> {
        let index = self.index;
        let static_text = index.lookup(record.address).map(|r| r.text.as_str());

        let Some(queue) = self.reference.as_mut() else {
            let outcome = static_text.map_or(Outcome::Unindexed, |static_text| Outcome::Aligned {
                static_text,
            });
            return Correlation {
                outcome,
                resync: None,
                reference_exhausted: false,
            };
        };

        let resync = resynchronize(queue, record.address);
        let head = queue.pop();

        let reference_exhausted = head.is_none() && !self.exhausted;
        if reference_exhausted {
            self.exhausted = true;
            warn!(
                addr = format!("{:#x}", record.address),
                "reference trace exhausted"
            );
        }

        let outcome = match static_text {
            Some(static_text) => {
                let matched = head
                    .as_ref()
                    .and_then(ReferenceRecord::address)
                    .is_some_and(|address| address == record.address);
                Outcome::Compared {
                    verdict: MatchResult::from_matched(matched),
                    static_text,
                    reference: head,
                }
            }
            None => Outcome::Unindexed,
        };

        Correlation {
            outcome,
            resync,
            reference_exhausted,
        }
    }
}

/// Skip past an exception marker at the head of `queue`.
///
/// Pops the marker and its detail record, then everything up to the next
/// record at `address`, which is left at the head.
fn resynchronize(queue: &mut ReferenceQueue, address: u64) -> Option<Resync> {
    if !queue.peek()?.is_exception_marker() {
        return None;
    }

    let mut discarded = 0;
    for _ in 0..2 {
        if queue.pop().is_some() {
            discarded += 1;
        }
    }
    while let Some(head) = queue.peek() {
        if head.address() == Some(address) {
            break;
        }
        queue.pop();
        discarded += 1;
    }

    let found = !queue.is_empty();
    debug!(
        addr = format!("{address:#x}"),
        discarded, found, "resynchronized after exception"
    );
    Some(Resync { discarded, found })
}
