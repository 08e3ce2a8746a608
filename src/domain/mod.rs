pub mod ai;
pub mod entity;
pub mod intent;
pub mod motion;
pub mod physics;
pub mod tile;
