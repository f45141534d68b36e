pub mod spec;

pub mod assembler;

pub mod cli;
