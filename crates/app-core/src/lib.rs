pub mod assets;
pub mod camera;
pub mod config;
pub mod constants;
pub mod depth;
pub mod draw;
pub mod frame;
pub mod gesture;
pub mod interaction;
pub mod math;
pub mod projection;
pub mod scene;

pub use assets::*;
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use depth::*;
pub use draw::*;
pub use frame::*;
pub use gesture::*;
pub use interaction::*;
pub use math::*;
pub use projection::*;
pub use scene::*;
