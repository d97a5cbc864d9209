//! REV simulator log records.
//!
//! Two dialects are recognized, per line:
//! - deep trace (`__REV_DEEP_TRACE__` builds):
//!   `RDT: Executed PC = 10074 Inst:                    addi r2= ...`
//! - render/tick (tracer builds):
//!   `RevCPU[cpu0:Render:42]: Core 0; Hart 0; Thread 1]; *I 0x10074:1141 c.addi sp, -16\t sp<-0x...`

use std::fmt;

use crate::{ParseError, Result, parse_address};

/// Log dialect a record was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    DeepTrace,
    RenderTick,
}

impl Dialect {
    /// Dialect whose markers appear in `line`, if any.
    #[must_use]
    pub fn detect(line: &str) -> Option<Self> {
        if DeepTrace::recognizes(line) {
            Some(Self::DeepTrace)
        } else if RenderTick::recognizes(line) {
            Some(Self::RenderTick)
        } else {
            None
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeepTrace => write!(f, "deep-trace"),
            Self::RenderTick => write!(f, "render"),
        }
    }
}

/// An instruction executed by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedRecord {
    pub address: u64,
    pub text: String,
    /// Clock tick, only present in the render dialect.
    pub clock_tick: Option<u64>,
    pub dialect: Dialect,
}

impl ExecutedRecord {
    /// Parse a simulator log line.
    ///
    /// Returns `Ok(None)` for lines that belong to neither dialect.
    ///
    /// # Errors
    ///
    /// Returns an error if the line carries a dialect marker but its fields
    /// cannot be extracted.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        match Dialect::detect(line) {
            Some(Dialect::DeepTrace) => DeepTrace::parse(line).map(Some),
            Some(Dialect::RenderTick) => RenderTick::parse(line).map(Some),
            None => Ok(None),
        }
    }
}

/// A simulator log dialect.
pub trait TraceDialect {
    const DIALECT: Dialect;

    /// Whether `line` carries this dialect's markers.
    fn recognizes(line: &str) -> bool;

    /// Extract a record from a recognized line.
    ///
    /// # Errors
    ///
    /// Returns an error if a field delimiter is missing or a field is not a
    /// number.
    fn parse(line: &str) -> Result<ExecutedRecord>;
}

/// `RDT: Executed PC = <hex> Inst: <text>`
pub struct DeepTrace;

impl DeepTrace {
    const MARKER: &'static str = "RDT: Executed";
    const PC_FIELD: &'static str = "PC = ";
    const INST_FIELD: &'static str = "Inst:";
}

impl TraceDialect for DeepTrace {
    const DIALECT: Dialect = Dialect::DeepTrace;

    fn recognizes(line: &str) -> bool {
        line.contains(Self::MARKER)
    }

    fn parse(line: &str) -> Result<ExecutedRecord> {
        let after_pc = field_after(line, Self::PC_FIELD, Self::DIALECT)?;
        let token = after_pc.split(' ').next().unwrap_or_default();
        let address = parse_address(token).ok_or_else(|| ParseError::InvalidAddress {
            token: token.to_string(),
        })?;

        let text = field_after(line, Self::INST_FIELD, Self::DIALECT)?.trim();

        Ok(ExecutedRecord {
            address,
            text: text.to_string(),
            clock_tick: None,
            dialect: Self::DIALECT,
        })
    }
}

/// `...Render:<tick>]: Core ... *I 0x<hex>:<encoding> <text>\t<effects>`
pub struct RenderTick;

impl RenderTick {
    const RENDER_TAG: &'static str = "Render:";
    const CORE_TAG: &'static str = "Core";
    const INST_PREFIX: &'static str = "*I ";
}

impl TraceDialect for RenderTick {
    const DIALECT: Dialect = Dialect::RenderTick;

    fn recognizes(line: &str) -> bool {
        line.contains(Self::RENDER_TAG) && line.contains(Self::CORE_TAG)
    }

    fn parse(line: &str) -> Result<ExecutedRecord> {
        let after_render = field_after(line, Self::RENDER_TAG, Self::DIALECT)?;
        let (tick_token, _) = after_render
            .split_once(']')
            .ok_or(ParseError::MissingField {
                dialect: Self::DIALECT,
                field: "]",
            })?;
        let tick_token = tick_token.trim();
        let clock_tick = tick_token
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidTick {
                token: tick_token.to_string(),
            })?;

        let inst = field_after(line, Self::INST_PREFIX, Self::DIALECT)?;
        let (addr_token, _) = inst.split_once(':').ok_or(ParseError::MissingField {
            dialect: Self::DIALECT,
            field: ":",
        })?;
        let address = parse_address(addr_token).ok_or_else(|| ParseError::InvalidAddress {
            token: addr_token.to_string(),
        })?;

        let text = inst.split('\t').next().unwrap_or_default().trim();

        Ok(ExecutedRecord {
            address,
            text: text.to_string(),
            clock_tick: Some(clock_tick),
            dialect: Self::DIALECT,
        })
    }
}

/// Remainder of `line` after the first occurrence of `field`.
fn field_after<'a>(line: &'a str, field: &'static str, dialect: Dialect) -> Result<&'a str> {
    line.split_once(field)
        .map(|(_, rest)| rest)
        .ok_or(ParseError::MissingField { dialect, field })
}
