//! Plugins bundled with the engine.
//!
//! Front ends usually assemble the plugin list from names given on a command
//! line; [`by_name`] maps those names to fresh instances. Order matters: the
//! first plugin that claims a node wins.

pub mod autobind;
pub mod e4x;
pub mod super_properties;

pub use autobind::AutobindPlugin;
pub use e4x::E4xPlugin;
pub use super_properties::SuperPropertiesPlugin;

use crate::plugin::Plugin;

/// Every name [`by_name`] accepts.
pub const NAMES: &[&str] = &[E4xPlugin::NAME, AutobindPlugin::NAME, SuperPropertiesPlugin::NAME];

/// A default-configured plugin for a registry name.
pub fn by_name(name: &str) -> Option<Box<dyn Plugin>> {
    match name {
        E4xPlugin::NAME => Some(Box::new(E4xPlugin::default())),
        AutobindPlugin::NAME => Some(Box::new(AutobindPlugin)),
        SuperPropertiesPlugin::NAME => Some(Box::new(SuperPropertiesPlugin)),
        _ => None,
    }
}
