//! Layer drawing. Each function only reads scene state and issues surface
//! calls; simulation updates happen in [`crate::systems`].

mod agents;
mod ambient;
mod environment;
mod scenery;

pub use agents::draw_agent;
pub use ambient::{draw_bubbles, draw_snow};
pub use environment::{draw_light_rays, draw_ocean, draw_sand, draw_weeds};
pub use scenery::draw_decor;
