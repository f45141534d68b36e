pub(crate) mod inst;
