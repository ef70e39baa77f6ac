//! Render pipelines and the uniforms bound to them.
//!
//! - `basic` builds the instanced Phong pipeline for the cubes
//! - `light` holds the directional light uniform and its bind group

pub mod basic;
pub mod light;
