//! Translates parametric box-girder bridge geometry into the line-oriented
//! FE input text consumed by an external analysis tool.
//!
//! A translation run loads the authoring tool's model export, resolves every
//! node position the assembly tree implies, synthesizes nodes and
//! cross-sections along the alignment, maps bearings and bracings to supports
//! and loads, and serializes the resulting aggregate in one pass.

pub mod datatypes;
pub mod error;
pub mod geometry;
pub mod model;
pub mod reader;
pub mod resolver;
pub mod sections;
pub mod translator;
pub mod writer;
