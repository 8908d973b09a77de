pub mod cards;
pub mod engine;
pub mod profiles;

pub use cards::*;
pub use engine::*;
pub use profiles::*;
