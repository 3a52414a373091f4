//! Print the default configuration.

use ledfx_config::ConfigDocument;
use ledfx_config::writer::{persisted_view, to_pretty_json};

pub fn run() -> anyhow::Result<()> {
    let doc = ConfigDocument::defaults();
    println!("{}", to_pretty_json(&persisted_view(&doc))?);
    Ok(())
}
