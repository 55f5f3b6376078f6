//! Gridrun - Trigger-Driven Course Simulation

pub mod action;
pub mod core;
pub mod entity;
pub mod render;
pub mod scene;
pub mod schedule;
pub mod simulation;
pub mod spatial;
pub mod trigger;
pub mod world;
