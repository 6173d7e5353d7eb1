//! Skill bundle generation and packaging

mod archive;
mod skillgen;

pub use archive::{archive_digest, package, ARCHIVE_EXTENSION};
pub use skillgen::{generate, skill_descriptor, SkillFormat};
