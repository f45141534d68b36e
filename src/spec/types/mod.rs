pub mod hw;
pub mod schema;
