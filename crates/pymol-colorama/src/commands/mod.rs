//! Command implementations

pub mod colorama;
pub mod gradient;

use crate::command::CommandRegistry;

/// Register all Colorama commands with the registry
pub fn register_all(registry: &mut CommandRegistry) {
    // Tool window
    colorama::register(registry);

    // Gradient coloring
    gradient::register(registry);
}
