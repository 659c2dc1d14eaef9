// Domain layer - Core business logic

pub mod errors;
pub mod interpret;
pub mod model;
pub mod prompt;
pub mod rules;
