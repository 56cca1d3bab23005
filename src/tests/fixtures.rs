// Shared test fixtures, compiled only under cfg(test).

pub mod cards;
pub mod commands;
pub mod events;
pub mod handlers;
