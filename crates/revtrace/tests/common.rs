//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Listing with a call from `main` into `foo`.
pub const LISTING: &str = "\
prog:     file format elf64-littleriscv


Disassembly of section .text:

0000000000010000 <main>:
   10000:\t1141                \taddi\tsp,sp,-16
   10002:\t2019                \tjal\tra,10008 <foo>
   10004:\t0141                \taddi\tsp,sp,16
   10006:\t8082                \tret

0000000000010008 <foo>:
   10008:\t4501                \tli\ta0,0
   1000a:\t6398                \tld\ta4,0(a5)
   1000c:\t8082                \tret

000000000001000e <bar>:
   1000e:\t8082                \tret
";

/// Temporary directory holding input files for one test.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Write `contents` to `name` and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    /// Write `contents` zstd-compressed to `name` and return its path.
    pub fn write_zst(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let compressed =
            zstd::stream::encode_all(contents.as_bytes(), 0).expect("failed to compress fixture");
        std::fs::write(&path, compressed).expect("failed to write fixture");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Deep-trace line for an executed PC.
pub fn deep(pc: u64, inst: &str) -> String {
    format!("RDT: Executed PC = {pc:x} Inst: {inst}")
}

/// Render line for an executed PC at a clock tick.
pub fn render(tick: u64, pc: u64, inst: &str) -> String {
    format!("RevCPU[cpu0:Render:{tick}]: Core 0; Hart 0; Thread 1]; *I 0x{pc:x}:0000 {inst}\t sp<-0x3ffffbf0")
}

/// Spike instruction line for a PC.
pub fn spike(pc: u64, inst: &str) -> String {
    format!("core   0: 0x{pc:016x} (0x00000000) {inst}")
}

/// Join lines with trailing newline.
pub fn lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}
