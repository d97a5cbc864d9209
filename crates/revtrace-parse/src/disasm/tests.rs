use std::io::Cursor;

use super::*;

const LISTING: &str = "
prog.elf:     file format elf64-littleriscv


Disassembly of section .text:

0000000000010074 <main>:
   10074:\t1141                \taddi\tsp,sp,-16
   10076:\te406                \tsd\tra,8(sp)
   10078:\t00c000ef          \tjal\tra,10084 <foo>
   1007c:\t60a2                \tld\tra,8(sp)
   1007e:\t0141                \taddi\tsp,sp,16
   10080:\t8082                \tret

0000000000010084 <foo>:
   10084:\t4501                \tli\ta0,0
   10086:\t8082                \tret

0000000000010088 <bar>:
   10088:\t8082                \tret
";

#[test]
fn test_classify_label() {
    assert_eq!(
        ListingLine::classify("0000000000010074 <main>:"),
        ListingLine::Label("main")
    );
    assert_eq!(
        ListingLine::classify("400000: label <foo>:"),
        ListingLine::Label("foo")
    );
    assert_eq!(
        ListingLine::classify("00000000000100b0 <std::vector<int>::size() const>:"),
        ListingLine::Label("std::vector<int>::size() const")
    );
}

#[test]
fn test_classify_instruction() {
    assert_eq!(
        ListingLine::classify("   10074:\t1141     \taddi\tsp,sp,-16  "),
        ListingLine::Instruction {
            address: 0x10074,
            text: "10074:\t1141     \taddi\tsp,sp,-16",
        }
    );
}

#[test]
fn test_classify_noise() {
    assert_eq!(ListingLine::classify(""), ListingLine::Noise);
    assert_eq!(
        ListingLine::classify("Disassembly of section .text:"),
        ListingLine::Noise
    );
    assert_eq!(
        ListingLine::classify("prog.elf:     file format elf64-littleriscv"),
        ListingLine::Noise
    );
    assert_eq!(
        ListingLine::classify("   10078 <main+0x4>: something"),
        ListingLine::Noise
    );
    assert_eq!(ListingLine::classify("\t..."), ListingLine::Noise);
}

#[test]
fn test_index_completeness() {
    let index = DisassemblyIndex::from_lines(LISTING.lines());
    assert_eq!(index.len(), 9);

    for line in LISTING.lines() {
        if let ListingLine::Instruction { address, .. } = ListingLine::classify(line) {
            let record = index.lookup(address).unwrap();
            assert_eq!(record.address, address);
            assert_eq!(record.text, line.trim());
        }
    }
    assert!(index.lookup(0x10090).is_none());
}

#[test]
fn test_function_boundaries() {
    let index = DisassemblyIndex::from_lines(LISTING.lines());
    assert_eq!(index.function_count(), 3);
    assert_eq!(index.function_start(0x10074).unwrap().label, "main");
    assert_eq!(index.function_start(0x10084).unwrap().label, "foo");
    assert_eq!(index.function_start(0x10088).unwrap().label, "bar");
    assert!(index.function_start(0x10076).is_none());
    assert_eq!(index.entry_address("main"), Some(0x10074));
    assert_eq!(index.entry_address("missing"), None);
}

#[test]
fn test_return_boundaries_use_last_instruction() {
    let index = DisassemblyIndex::from_lines(LISTING.lines());

    let main_exit = index.function_return(0x10080).unwrap();
    assert_eq!(main_exit.enclosing_label, "main");
    assert_eq!(main_exit.address, 0x10080);

    assert_eq!(index.function_return(0x10086).unwrap().enclosing_label, "foo");
    // The last function has no following label.
    assert!(index.function_return(0x10088).is_none());
}

#[test]
fn test_empty_function_records_no_return() {
    let listing = "\
0000000000010000 <empty>:
0000000000010004 <full>:
   10004:\t8082\tret
0000000000010008 <next>:
   10008:\t8082\tret
";
    let index = DisassemblyIndex::from_lines(listing.lines());
    assert!(index.function_start(0x10004).is_some());
    assert_eq!(index.function_start(0x10004).unwrap().label, "full");
    assert_eq!(index.function_return(0x10004).unwrap().enclosing_label, "full");
    assert_eq!(index.entry_address("empty"), None);
}

#[test]
fn test_instructions_before_any_label() {
    let listing = "\
   10000:\t0001\tnop
0000000000010004 <main>:
   10004:\t8082\tret
";
    let index = DisassemblyIndex::from_lines(listing.lines());
    assert_eq!(index.len(), 2);
    assert!(index.function_start(0x10000).is_none());
    assert!(index.function_return(0x10000).is_none());
    assert_eq!(index.entry_address("main"), Some(0x10004));
}

#[test]
fn test_duplicate_address_last_writer_wins() {
    let listing = "\
   10000:\t0001\tnop
   10000:\t0002\tc.nop
";
    let index = DisassemblyIndex::from_lines(listing.lines());
    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup(0x10000).unwrap().text, "10000:\t0002\tc.nop");
}

#[test]
fn test_indexing_is_idempotent() {
    let first = DisassemblyIndex::from_lines(LISTING.lines());
    let second = DisassemblyIndex::from_lines(LISTING.lines());
    assert_eq!(first, second);

    let from_reader = DisassemblyIndex::from_reader(Cursor::new(LISTING)).unwrap();
    assert_eq!(first, from_reader);
}

#[test]
fn test_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.asm");
    std::fs::write(&path, LISTING).unwrap();

    let index = DisassemblyIndex::from_path(&path).unwrap();
    assert_eq!(index.len(), 9);
}
