//! Domain models for Chateau Orchestrator.
//!
//! # Core Concepts
//!
//! ## Authored Data
//!
//! - [`ModuleManifest`]: Static declaration of a module's identity, assets, fixtures and
//!   owned document types. Read once at load time, never mutated.
//! - [`FixtureDirective`]: A seed instruction asking the host to ensure named records exist.
//! - [`HookRegistry`]: Extension points (scheduler, document, websocket events) declared by
//!   a module. Callbacks are references only and are never executed.
//!
//! ## Site State
//!
//! - [`SettingsRecord`]: The singleton branding record of a site.
//! - [`RegisteredModule`]: A manifest as persisted into a site store.
//! - [`FixtureRecord`]: A record seeded by a fixture directive.
//! - [`BootInfo`]: Payload sent to the desk on every login.

mod boot;
mod fixture;
mod hooks;
mod manifest;
mod module;
mod settings;

pub use boot::*;
pub use fixture::*;
pub use hooks::*;
pub use manifest::*;
pub use module::*;
pub use settings::*;
