use crate::spec::{
    isa::Builder,
    types::{hw::ParamKind, schema::InstDef},
};

const REG: ParamKind = ParamKind::Register;
const IMM: ParamKind = ParamKind::Imm10;
const ADDR: ParamKind = ParamKind::Address;

// Opcodes are grouped by their high bits: 0b00000xx data movement, 0b0001xxx
// system, 0b001xxxx control flow, 0b010xxxx register ALU, 0b011xxxx immediate ALU.

fn gen_mem(builder: &mut Builder) {
    builder.register(InstDef::with_2("MOV", 0b0000000, REG, REG));
    builder.register(InstDef::with_2("LI", 0b0000001, REG, IMM));
    builder.register(InstDef::with_2("LD", 0b0000010, REG, ADDR));
    builder.register(InstDef::with_2("ST", 0b0000011, ADDR, REG));
    builder.register(InstDef::with_2("LDR", 0b0000100, REG, REG));
    builder.register(InstDef::with_2("STR", 0b0000101, REG, REG));
}

fn gen_sys(builder: &mut Builder) {
    builder.register(InstDef::with_0("NOP", 0b0001000));
    builder.register(InstDef::with_0("HLT", 0b0001001));
}

fn gen_ctl(builder: &mut Builder) {
    builder.register(InstDef::with_1("JMP", 0b0010000, ADDR));

    builder.register(InstDef::with_3("BEQ", 0b0010001, REG, REG, ADDR));
    builder.register(InstDef::with_3("BNE", 0b0010010, REG, REG, ADDR));
    builder.register(InstDef::with_3("BLT", 0b0010011, REG, REG, ADDR));
    builder.register(InstDef::with_3("BGT", 0b0010100, REG, REG, ADDR));

    builder.register(InstDef::with_3("BEQI", 0b0010101, REG, IMM, ADDR));
    builder.register(InstDef::with_3("BNEI", 0b0010110, REG, IMM, ADDR));
    builder.register(InstDef::with_3("BLTI", 0b0010111, REG, IMM, ADDR));
    builder.register(InstDef::with_3("BGTI", 0b0011000, REG, IMM, ADDR));

    builder.register(InstDef::with_1("CALL", 0b0011001, ADDR));
    builder.register(InstDef::with_0("RET", 0b0011010));
}

pub(crate) const ALU_OPS: [&str; 11] = [
    "ADD", "SUB", "MUL", "DIV", "MOD", "POW", "SHL", "SHR", "AND", "OR", "XOR",
];

fn gen_alu(builder: &mut Builder) {
    // The register and immediate forms share their low four bits.
    for (i, name) in ALU_OPS.iter().enumerate() {
        let i = i as u32;
        builder.register(InstDef::with_3(name, 0b0100000 | i, REG, REG, REG));
        builder.register(InstDef::with_3(
            &format!("{}I", name),
            0b0110000 | i,
            REG,
            REG,
            IMM,
        ));
    }
}

pub(crate) fn register(builder: &mut Builder) {
    gen_mem(builder);
    gen_sys(builder);
    gen_ctl(builder);
    gen_alu(builder);
}
