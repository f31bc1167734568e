pub mod capture_groups;
pub mod error;
pub mod lexer;
pub mod template;
