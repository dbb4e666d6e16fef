//! PlantUML sequence diagram model and builder

mod builder;
mod model;

pub use builder::*;
pub use model::*;
