pub mod controller;
pub mod cop;
pub mod inputs;
pub mod thermal;

pub use controller::*;
pub use cop::*;
pub use inputs::*;
pub use thermal::*;
