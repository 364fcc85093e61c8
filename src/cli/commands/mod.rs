pub mod entries;
pub mod export;
pub mod system;
pub mod view;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in entries::definitions()
        .into_iter()
        .chain(view::definitions())
        .chain(export::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
