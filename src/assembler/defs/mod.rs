pub(crate) mod builtin;
pub(crate) mod family;
pub(crate) mod pseudo;
