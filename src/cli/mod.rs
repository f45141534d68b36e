pub mod command;
pub mod report;
