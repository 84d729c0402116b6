//! Plugin registry
//!
//! Plugins are named units of bot functionality. Each may leave a hook that
//! runs once when the bot shuts down.

use parking_lot::Mutex;

/// Runs when the plugin is unloaded
pub type UnloadHook = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

struct Plugin {
    name: String,
    unload: Option<UnloadHook>,
}

/// Registered plugins, in registration order
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Mutex<Vec<Plugin>>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a plugin
    pub fn register(&self, name: impl Into<String>, unload: Option<UnloadHook>) {
        let name = name.into();
        tracing::info!(plugin = %name, "Plugin registered");
        self.plugins.lock().push(Plugin { name, unload });
    }

    /// Names of the registered plugins
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.plugins
            .lock()
            .iter()
            .map(|plugin| plugin.name.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every unload hook once and return how many ran
    ///
    /// Hook errors are logged. The registry is empty afterwards.
    pub fn unload_all(&self) -> usize {
        let plugins = std::mem::take(&mut *self.plugins.lock());
        let mut ran = 0;

        for plugin in plugins {
            let Some(unload) = plugin.unload else {
                continue;
            };
            ran += 1;
            match unload() {
                Ok(()) => tracing::info!(plugin = %plugin.name, "Plugin unloaded"),
                Err(e) => tracing::warn!(plugin = %plugin.name, error = %e, "Plugin unload failed"),
            }
        }

        ran
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_hook(counter: &Arc<AtomicUsize>) -> UnloadHook {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            anyhow::Ok(())
        })
    }

    #[test]
    fn test_register_keeps_order() {
        let registry = PluginRegistry::new();
        registry.register("dice", None);
        registry.register("echo", None);

        assert_eq!(registry.names(), ["dice", "echo"]);
    }

    #[test]
    fn test_unload_all_runs_each_hook_once() {
        let registry = PluginRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        registry.register("a", Some(counting_hook(&counter)));
        registry.register("b", None);
        registry.register("c", Some(Box::new(|| Err::<(), _>(anyhow::anyhow!("disk full")))));
        registry.register("d", Some(counting_hook(&counter)));

        assert_eq!(registry.unload_all(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(registry.is_empty());
        assert_eq!(registry.unload_all(), 0);
    }
}
