mod common;

use common::{assemble_ok, category_of, COLOURS, FIB};
use facpu::assembler::{
    self,
    phases::{
        preprocess,
        types::{Loc, Located},
    },
    Category, Error,
};

#[test]
fn register_form() {
    assert_eq!(assemble_ok("ADD R1, R2, R3"), vec![538_062_848]);
}

#[test]
fn backward_label() {
    let program = assembler::assemble_program("LOOP: ADD R1, R2, R3\nJMP LOOP").unwrap();
    assert_eq!(program.labels.address("LOOP"), Some(0));
    assert_eq!(program.words, vec![538_062_848, 268_435_456]);
}

#[test]
fn forward_label() {
    let words = assemble_ok("JMP END\nNOP\nEND: HLT");
    assert_eq!(words[0], (0b0010000 << 24) | (2 << 14));
}

#[test]
fn branch_to_label_starting_with_r() {
    assert_eq!(
        assemble_ok("retry: NOP\nBNE R0, R1, retry"),
        vec![134_217_728, 302_055_424]
    );
    assert_eq!(
        assemble_ok("retry: NOP\nBNE R0, R1, retry"),
        assemble_ok("loop: NOP\nBNE R0, R1, loop")
    );

    let words = assemble_ok("LD R1, reset\nST reset, R2\nreset: DAT 0");
    assert_eq!(words[0], (0b0000010 << 24) | (1 << 20) | (2 << 10));
    assert_eq!(words[1], (0b0000011 << 24) | (2 << 14) | (2 << 10));
}

#[test]
fn colour_macro() {
    assert_eq!(assemble_ok("LI R0, #col(FF0000)"), vec![17_006_592]);
    assert_eq!(assemble_ok("MOV R0, #col(255, 0, 0)"), vec![17_006_592]);
}

#[test]
fn duplicate_label() {
    let source = "A: NOP\nNOP\nA: HLT";
    assert_eq!(
        assembler::assemble(source),
        Err(Error::Preprocess(Located::with_loc(
            Loc::new(2),
            preprocess::Error::DuplicateLabel {
                label: "A".to_owned(),
                first_line: 0
            }
        )))
    );

    let diag = assembler::assemble(source).unwrap_err().diagnostic();
    assert_eq!(diag.line, 2);
    assert_eq!(diag.related_line, Some(0));
    assert_eq!(diag.token.as_deref(), Some("A"));
}

#[test]
fn duplicate_label_far_apart() {
    let mut source = String::from("X: NOP\n");
    for _ in 0..100 {
        source.push_str("NOP\n");
    }
    source.push_str("X: HLT\n");
    assert_eq!(category_of(&source), Category::DuplicateLabel);
}

#[test]
fn immediate_where_register_expected() {
    let err = assembler::assemble("NOP\nADD R1, 5, R3").unwrap_err();
    assert_eq!(err.category(), Category::AliasResolutionFailure);
    assert_eq!(err.loc(), Some(Loc::new(1)));
    assert!(err.message().contains("ADDI reg, reg, imm10"));
}

#[test]
fn mnemonic_tokens_keep_their_spelling() {
    let diag = assembler::assemble("add R1, 5, R3").unwrap_err().diagnostic();
    assert_eq!(diag.token.as_deref(), Some("add"));

    let diag = assembler::assemble("NOP\nfrob R1").unwrap_err().diagnostic();
    assert_eq!(diag.line, 1);
    assert_eq!(diag.token.as_deref(), Some("frob"));
    assert_eq!(diag.message, "Instruction 'frob' unknown");
}

#[test]
fn empty_and_comment_only_sources() {
    assert!(assemble_ok("").is_empty());
    assert!(assemble_ok("; nothing\n\n   \n#define(X, 1)\nL:").is_empty());
}

#[test]
fn label_addresses_skip_silent_lines() {
    let source = "\
A:
; comment
#define(Z, 0)
B: NOP
C: #define(Y, 1)
D: HLT";
    let program = assembler::assemble_program(source).unwrap();
    assert_eq!(program.words.len(), 2);
    assert_eq!(program.labels.address("A"), Some(0));
    assert_eq!(program.labels.address("B"), Some(0));
    assert_eq!(program.labels.address("C"), Some(1));
    assert_eq!(program.labels.address("D"), Some(1));
}

#[test]
fn empty_define_template() {
    // Empty arguments are dropped, so this is a one argument `define`.
    assert_eq!(category_of("#define(NOTHING, )"), Category::ArityMismatch);
    // Comments are stripped before macros are expanded.
    assert_eq!(category_of("#define(SEMI, ;)"), Category::SyntaxError);
}

#[test]
fn first_error_aborts() {
    let err = assembler::assemble("FROB\nLI R0, 5000").unwrap_err();
    assert_eq!(err.category(), Category::UnknownMnemonic);
    assert_eq!(err.loc(), Some(Loc::new(0)));
}

#[test]
fn preprocessing_completes_before_encoding() {
    // The encoder error is on an earlier line than the preprocessor error.
    let err = assembler::assemble("LI R0, 5000\nA: NOP\nA: NOP").unwrap_err();
    assert_eq!(err.category(), Category::DuplicateLabel);
}

#[test]
fn runs_do_not_share_macros() {
    assemble_ok("#define(SECRET, 7)");
    assert_eq!(category_of("LI R0, #SECRET"), Category::UnknownMacro);
}

#[test]
fn error_display_names_phase() {
    let err = assembler::assemble("NOP\nLI R0, 1024").unwrap_err();
    assert_eq!(err.category(), Category::RangeError);
    assert_eq!(
        err.to_string(),
        "Assembly Error (in Encoder): @(line: 2): Immediate (imm10) '1024' out of range (max 1023)"
    );

    let err = assembler::assemble("#nope").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Assembly Error (in Preprocessor): @(line: 1): Macro 'nope' unknown"
    );
}

#[test]
fn bytes_are_little_endian() {
    let bytes = assembler::assemble_bytes("ADD R1, R2, R3\nDAT 0x01020304").unwrap();
    assert_eq!(
        bytes,
        vec![0x00, 0x30, 0x12, 0x20, 0x04, 0x03, 0x02, 0x01]
    );
}

#[test]
fn sample_programs() {
    let program = assembler::assemble_program(FIB).unwrap();
    assert_eq!(program.words.len(), 14);
    assert_eq!(program.labels.address("loop"), Some(4));
    assert_eq!(program.labels.address("done"), Some(12));
    assert_eq!(program.words[13], 0x7FFF_FFFF);
    assert_eq!(program.lines[4].to_string(), "BEQI R4, 10, done");
    assert_eq!(program.lines[5].to_string(), "STR R3, R1");

    let words = assemble_ok(COLOURS);
    assert_eq!(words.len(), 7);
    assert_eq!(words[0], 17_006_592);
}

#[test]
fn listing_round_trip() {
    let words = assemble_ok("ADD R1, R2, R3\nBEQ R4, 10, 12\nHLT");
    let listing = assembler::disasm::disassemble(&words);
    assert!(listing[0].ends_with("ADD R1, R2, R3"));
    assert!(listing[1].ends_with("BEQI R4, 10, 12"));
    assert!(listing[2].ends_with("HLT"));
}
