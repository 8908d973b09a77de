pub mod forecast;
pub mod heat_pump;
pub mod schedule;
pub mod types;

pub use forecast::*;
pub use heat_pump::*;
pub use schedule::*;
pub use types::*;
