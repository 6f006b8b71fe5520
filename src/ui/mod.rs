pub mod event_loop;
pub mod executor;
pub mod keys;
pub mod lifecycle;
pub mod renderer;
pub mod screens;
pub mod theme;
