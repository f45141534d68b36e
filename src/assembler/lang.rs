use super::{
    defs,
    model::{sanitize_name, Builtin, Encoding, Family, Pseudo},
};
use crate::spec::{isa::Isa, types::schema::InstDef};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static STORAGE: Lazy<Lang> = Lazy::new(Lang::new);

/// Everything the assembly language adds on top of the hardware instruction table.
pub struct Lang {
    families: HashMap<String, Family>,
    pseudos: HashMap<String, Pseudo>,
    builtins: HashMap<String, Builtin>,
}

impl Lang {
    fn new() -> Self {
        let mut builder = Builder::new();
        defs::family::register(&mut builder);
        defs::pseudo::register(&mut builder);
        defs::builtin::register(&mut builder);
        builder.build()
    }

    pub fn get() -> &'static Lang {
        Lazy::force(&STORAGE)
    }

    pub fn lookup_family(&self, name: &str) -> Option<&Family> {
        self.families.get(&sanitize_name(name))
    }

    /// The concrete instructions a family may resolve to, in order of preference.
    pub fn family_variants<'a>(&self, family: &'a Family) -> impl Iterator<Item = &'static InstDef> + 'a {
        family
            .variants
            .iter()
            .filter_map(move |name| Isa::get().lookup(name))
    }

    pub fn lookup_pseudo(&self, name: &str) -> Option<&Pseudo> {
        self.pseudos.get(&sanitize_name(name))
    }

    /// Macro names are case-sensitive.
    pub fn lookup_builtin(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(name)
    }

    pub fn lookup_encoding(&self, name: &str) -> Option<Encoding> {
        Isa::get()
            .lookup(name)
            .map(Encoding::Inst)
            .or_else(|| self.lookup_pseudo(name).map(Encoding::Pseudo))
    }
}

pub struct Builder {
    lang: Lang,
}

impl Builder {
    fn new() -> Self {
        Builder {
            lang: Lang {
                families: HashMap::new(),
                pseudos: HashMap::new(),
                builtins: HashMap::new(),
            },
        }
    }

    fn build(self) -> Lang {
        self.lang
    }

    pub(super) fn register_family(&mut self, f: Family) {
        assert!(!f.variants.is_empty(), "empty family: {}", f.name);
        for v in &f.variants {
            assert!(
                Isa::get().lookup(v).is_some(),
                "unknown variant '{}' in family {}",
                v,
                f.name
            );
        }

        assert!(
            self.lang.families.insert(f.name.clone(), f).is_none(),
            "duplicate family"
        );
    }

    pub(super) fn register_pseudo(&mut self, p: Pseudo) {
        assert!(
            Isa::get().lookup(&p.name).is_none(),
            "pseudo shadows an instruction: {}",
            p.name
        );
        assert!(
            self.lang.pseudos.insert(p.name.clone(), p).is_none(),
            "duplicate pseudo"
        );
    }

    pub(super) fn register_builtin(&mut self, b: Builtin) {
        assert!(
            self.lang.builtins.insert(b.name.clone(), b).is_none(),
            "duplicate builtin macro"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::types::hw::ParamKind;

    #[test]
    fn families_prefer_register_forms() {
        let lang = Lang::get();
        let add = lang.lookup_family("add").unwrap();
        let names: Vec<_> = lang.family_variants(add).map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["ADD", "ADDI"]);

        let mov = lang.lookup_family("MOV").unwrap();
        let last = lang.family_variants(mov).last().unwrap();
        assert_eq!(last.params, vec![ParamKind::Register, ParamKind::Imm10]);
    }

    #[test]
    fn concrete_names_are_not_families() {
        assert!(Lang::get().lookup_family("ADDI").is_none());
        assert!(Lang::get().lookup_family("JMP").is_none());
    }

    #[test]
    fn encodings() {
        let lang = Lang::get();
        assert!(matches!(lang.lookup_encoding("jmp"), Some(Encoding::Inst(_))));
        assert!(matches!(lang.lookup_encoding("DAT"), Some(Encoding::Pseudo(_))));
        assert_eq!(lang.lookup_encoding("DAT").map(|e| e.arity()), Some(1));
        assert!(lang.lookup_encoding("FOO").is_none());
    }

    #[test]
    fn builtins_are_case_sensitive() {
        assert!(Lang::get().lookup_builtin("col").is_some());
        assert!(Lang::get().lookup_builtin("COL").is_none());
    }
}
