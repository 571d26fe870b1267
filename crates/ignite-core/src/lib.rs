pub mod bounds;
pub mod camera;
pub mod config;
pub mod constants;
pub mod context;
pub mod counter;
pub mod decode;
pub mod effect;
pub mod error;
pub mod framing;
pub mod loader;
pub mod orbit;
pub mod pick;
pub mod scene;
pub mod status;

pub use bounds::*;
pub use camera::*;
pub use config::*;
pub use context::*;
pub use counter::*;
pub use effect::*;
pub use error::*;
pub use framing::*;
pub use loader::*;
pub use orbit::*;
pub use pick::*;
pub use scene::*;
pub use status::*;
