use crate::assembler::{
    lang::Builder,
    model::Pseudo,
    phases::encode::{self, Error, Operand},
};
use crate::spec::types::hw::{Word, WORD_MAX};

/// `DAT <value>`: emits `value` verbatim as a whole word.
fn data(params: &[&str]) -> Result<Word, Error> {
    let token = match params {
        [token] => *token,
        _ => {
            return Err(Error::ArgCount {
                mnemonic: "DAT".to_owned(),
                expected: 1,
                found: params.len(),
            })
        }
    };

    let value = encode::parse_int(token).ok_or_else(|| Error::Malformed {
        token: token.to_owned(),
        operand: Operand::Data,
    })?;

    encode::check_range(token, value, Operand::Data, WORD_MAX)
}

pub(crate) fn register(builder: &mut Builder) {
    builder.register_pseudo(Pseudo::with("DAT", 1, data));
}
