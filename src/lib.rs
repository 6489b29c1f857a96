//! Grid snake: a deterministic, rendering-free snake simulation engine
//! plus a small ratatui terminal host.
//!
//! The engine lives in [`game`]; [`config`], [`input`], [`snake`], [`food`]
//! and [`speed`] hold its building blocks. The remaining modules only serve
//! the terminal binary.

pub mod config;
pub mod controls;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod speed;
pub mod terminal_runtime;
pub mod ui;
