//! World data the renderer reads but never mutates.
//!
//! Re-exports:
//! - `geometry`: points, edges and objects
//! - `maze`: grid levels turned into wall objects
//! - `player`: viewer pose and movement

pub mod geometry;
pub mod maze;
pub mod player;
