pub mod authors;

use std::sync::Arc;

use shelf_db::AuthorStore;
use shelf_kernel::ModuleRegistry;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn AuthorStore>) {
    registry.register(authors::create_module(store));
}
