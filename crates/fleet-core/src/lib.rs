pub mod compat;
pub mod error;
pub mod ids;
pub mod idle;
pub mod model;
pub mod policy;
pub mod snapshot;
pub mod types;

pub use compat::*;
pub use error::*;
pub use ids::*;
pub use idle::*;
pub use model::*;
pub use policy::*;
pub use snapshot::*;
pub use types::*;
