//! Run Setup
//!
//! Population spawning, scenery placement and ambient particle pools.

pub mod ambient;
pub mod population;
pub mod scenery;

pub use ambient::*;
pub use population::*;
pub use scenery::*;
