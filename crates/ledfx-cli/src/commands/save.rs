//! Load and write back a configuration directory.
//!
//! Loading repairs whatever it has to (backup, migration, field resets);
//! saving then persists the repaired document and the presets file.

use std::path::Path;

use ledfx_config::{ConfigLoader, TracingObserver, save_config, save_presets};
use ledfx_registry::StaticRegistry;

pub fn run(config_dir: &Path) -> anyhow::Result<()> {
    let registry = StaticRegistry::new();
    let observer = TracingObserver;

    let mut doc = ConfigLoader::new(config_dir, &registry, &observer).load();
    let config = save_config(&mut doc, config_dir, &observer)?;
    let presets = save_presets(&doc, config_dir, &observer)?;

    println!("Saved {}", config.display());
    println!("Saved {}", presets.display());
    Ok(())
}
