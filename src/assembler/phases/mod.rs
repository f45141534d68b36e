pub mod types;

pub mod alias;
pub mod encode;
pub mod expand;
pub mod lex;
pub mod preprocess;

pub use encode::encode;
pub use preprocess::preprocess;
