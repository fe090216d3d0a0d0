pub mod defs;
pub mod renderer;
pub mod room;
pub mod sim;
pub mod world;
