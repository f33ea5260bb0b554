//! Veracode XML API data models
//!
//! The XML API reports every field as an element attribute, so each model
//! maps its fields from `@`-prefixed attribute names.

mod app;
mod build;
mod file;
mod sandbox;

pub use app::{AppList, Application};
pub use build::{Build, BuildInfo, PrescanOptions};
pub use file::{FileList, UploadedFile};
pub use sandbox::{Sandbox, SandboxInfo, SandboxList};
