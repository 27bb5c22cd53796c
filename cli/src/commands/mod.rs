pub mod compose;
pub mod health;
pub mod webhook;
