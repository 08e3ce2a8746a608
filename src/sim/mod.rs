pub mod event;
pub mod maze;
pub mod schedule;
pub mod step;
pub mod world;
