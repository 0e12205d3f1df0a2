pub mod arcade;
pub mod hosted;
pub mod snake;
pub mod terminal;

pub use arcade::{ArcadeMode, default_catalog};
pub use hosted::{FrameWake, HostedSnake};
pub use snake::SnakeMode;
