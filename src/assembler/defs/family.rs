use crate::assembler::{lang::Builder, model::Family};
use crate::spec::defs::inst::ALU_OPS;

// Variants are tried in order, so a register form must always precede the
// corresponding immediate form.

fn gen_mem(builder: &mut Builder) {
    builder.register_family(Family::with("MOV", vec!["MOV", "LI"]));
    builder.register_family(Family::with("LD", vec!["LD", "LDR"]));
    builder.register_family(Family::with("ST", vec!["ST", "STR"]));
}

fn with_immediate_form(builder: &mut Builder, name: &str) {
    let imm = format!("{}I", name);
    builder.register_family(Family::with(name, vec![name, &imm]));
}

fn gen_ctl(builder: &mut Builder) {
    for &name in &["BEQ", "BNE", "BLT", "BGT"] {
        with_immediate_form(builder, name);
    }
}

fn gen_alu(builder: &mut Builder) {
    for &name in ALU_OPS.iter() {
        with_immediate_form(builder, name);
    }
}

pub(crate) fn register(builder: &mut Builder) {
    gen_mem(builder);
    gen_ctl(builder);
    gen_alu(builder);
}
