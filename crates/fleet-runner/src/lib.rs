pub mod config;
pub mod expirer;
pub mod fleet;
pub mod util;

pub use config::*;
pub use expirer::*;
pub use fleet::*;
pub use util::*;
