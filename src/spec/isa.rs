use super::defs;
use super::types::{
    hw::{OpCode, OPCODE_MAX, WORD_WIDTH},
    schema::InstDef,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static STORAGE: Lazy<Isa> = Lazy::new(Isa::new);

/// The hardware instruction table: every concrete instruction the processor
/// decodes, indexed both by mnemonic and by opcode.
pub struct Isa {
    insts: Vec<InstDef>,
    by_name: HashMap<String, usize>,
    by_opcode: HashMap<OpCode, usize>,
}

impl Isa {
    fn new() -> Self {
        let mut builder = Builder::new();
        defs::inst::register(&mut builder);
        builder.build()
    }

    pub fn get() -> &'static Isa {
        Lazy::force(&STORAGE)
    }

    pub fn inst_def_iter(&self) -> impl Iterator<Item = &InstDef> {
        self.insts.iter()
    }

    pub fn lookup(&self, name: &str) -> Option<&InstDef> {
        self.by_name
            .get(&name.to_uppercase())
            .map(|&idx| &self.insts[idx])
    }

    pub fn lookup_opcode(&self, opcode: OpCode) -> Option<&InstDef> {
        self.by_opcode.get(&opcode).map(|&idx| &self.insts[idx])
    }
}

pub struct Builder {
    isa: Isa,
}

impl Builder {
    fn new() -> Self {
        Builder {
            isa: Isa {
                insts: Vec::new(),
                by_name: HashMap::new(),
                by_opcode: HashMap::new(),
            },
        }
    }

    fn build(self) -> Isa {
        self.isa
    }

    pub(super) fn register(&mut self, idef: InstDef) {
        assert!(idef.opcode <= OPCODE_MAX, "opcode too wide: {}", idef);
        assert!(
            idef.encoded_width() <= WORD_WIDTH,
            "parameters overflow the word: {}",
            idef
        );

        let idx = self.isa.insts.len();
        assert!(
            self.isa.by_name.insert(idef.name.clone(), idx).is_none(),
            "duplicate instruction name: {}",
            idef.name
        );
        assert!(
            self.isa.by_opcode.insert(idef.opcode, idx).is_none(),
            "duplicate opcode: {}",
            idef
        );

        self.isa.insts.push(idef);
    }
}
