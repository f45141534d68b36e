use crate::assembler::{
    context::MacroRegistry,
    lang::{Builder, Lang},
    model::Builtin,
    phases::expand::Error,
};

const COLOUR_HEX_DIGITS: usize = 6;
const CHANNEL_MAX: u32 = 0xFF;

// 8-bit colour is packed RRRGGGBB.
const RED_LEVELS: u32 = 7;
const GREEN_LEVELS: u32 = 7;
const BLUE_LEVELS: u32 = 3;

/// `#define(NAME, TEMPLATE)`: registers a user macro, expanding to nothing.
fn define(macros: &mut MacroRegistry, args: &[String]) -> Result<String, Error> {
    let (name, template) = match args {
        [name, template] => (name, template),
        _ => {
            return Err(Error::ArgCount {
                name: "define".to_owned(),
                expected: "2",
                found: args.len(),
            })
        }
    };

    if Lang::get().lookup_builtin(name).is_some() {
        return Err(Error::BadArgument {
            name: "define".to_owned(),
            arg: name.to_owned(),
            reason: "names a builtin macro, which cannot be redefined".to_owned(),
        });
    }

    macros.define(name, template);
    Ok(String::new())
}

fn bad_colour(arg: &str, reason: &str) -> Error {
    Error::BadArgument {
        name: "col".to_owned(),
        arg: arg.to_owned(),
        reason: reason.to_owned(),
    }
}

fn pack_colour(r: u32, g: u32, b: u32) -> u32 {
    let r = r * RED_LEVELS / CHANNEL_MAX;
    let g = g * GREEN_LEVELS / CHANNEL_MAX;
    let b = b * BLUE_LEVELS / CHANNEL_MAX;
    (r << 5) | (g << 2) | b
}

fn hex_channels(arg: &str) -> Result<(u32, u32, u32), Error> {
    if arg.len() != COLOUR_HEX_DIGITS || !arg.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad_colour(arg, "is not a 6 digit hex colour"));
    }

    let channel = |idx: usize| u32::from_str_radix(&arg[idx..idx + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Ok((r, g, b)),
        _ => Err(bad_colour(arg, "is not a 6 digit hex colour")),
    }
}

fn decimal_channel(arg: &str) -> Result<u32, Error> {
    if !arg.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad_colour(arg, "is not a decimal colour channel"));
    }

    match arg.parse::<u32>() {
        Ok(v) if v <= CHANNEL_MAX => Ok(v),
        _ => Err(bad_colour(arg, "is out of range (max 255)")),
    }
}

/// `#col(RRGGBB)` or `#col(R, G, B)`: the 8-bit colour nearest a 24-bit one, in decimal.
fn col(_: &mut MacroRegistry, args: &[String]) -> Result<String, Error> {
    let (r, g, b) = match args {
        [hex] => hex_channels(hex)?,
        [r, g, b] => (decimal_channel(r)?, decimal_channel(g)?, decimal_channel(b)?),
        _ => {
            return Err(Error::ArgCount {
                name: "col".to_owned(),
                expected: "1 or 3",
                found: args.len(),
            })
        }
    };

    Ok(pack_colour(r, g, b).to_string())
}

pub(crate) fn register(builder: &mut Builder) {
    builder.register_builtin(Builtin::with("define", define));
    builder.register_builtin(Builtin::with("col", col));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn colour_packing() {
        assert_eq!(pack_colour(255, 0, 0), 0b111_000_00);
        assert_eq!(pack_colour(0, 255, 0), 0b000_111_00);
        assert_eq!(pack_colour(0, 0, 255), 0b000_000_11);
        assert_eq!(pack_colour(254, 254, 254), 0b110_110_10);
    }

    #[test]
    fn col_forms_agree() {
        let mut macros = MacroRegistry::default();
        assert_eq!(
            col(&mut macros, &args(&["80C0FF"])),
            col(&mut macros, &args(&["128", "192", "255"]))
        );
    }

    #[test]
    fn define_rejects_builtin_names() {
        let mut macros = MacroRegistry::default();
        assert!(matches!(
            define(&mut macros, &args(&["col", "1"])),
            Err(Error::BadArgument { .. })
        ));
        assert_eq!(define(&mut macros, &args(&["X", "1"])), Ok(String::new()));
        assert_eq!(macros.lookup("X"), Some("1"));
    }
}
