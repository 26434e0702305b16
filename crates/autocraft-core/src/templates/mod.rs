//! Template lookup and rendering for the generator bodies

pub mod dir;
pub mod id;
pub mod render;
pub mod store;

pub use dir::*;
pub use id::*;
pub use render::*;
pub use store::*;
