//! Effect listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use ledfx_registry::{EffectCategory, StaticRegistry};
use ledfx_schema::FieldKind;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

const CATEGORIES: [EffectCategory; 4] = [
    EffectCategory::NonReactive,
    EffectCategory::Classic,
    EffectCategory::Bpm,
    EffectCategory::Atmospheric,
];

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = StaticRegistry::new();

    if let Some(effect_id) = &args.effect {
        let effect = registry
            .all_effects()
            .into_iter()
            .find(|e| e.id.eq_ignore_ascii_case(effect_id))
            .ok_or_else(|| anyhow::anyhow!("Unknown effect: {}", effect_id))?;

        println!("{} ({})", effect.name, effect.id);
        println!("{}", "=".repeat(effect.name.len() + effect.id.len() + 3));
        println!();
        println!("{}", effect.description);
        println!();
        println!("Options:");
        println!();
        println!("  {:24}  {:8}  {:24}  {}", "Name", "Type", "Default", "Range");
        println!("  {:24}  {:8}  {:24}  {}", "----", "----", "-------", "-----");

        for field in effect.schema.fields() {
            let default = field
                .default
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            println!(
                "  {:24}  {:8}  {:24}  {}",
                field.name,
                field.kind.describe(),
                default,
                range(&field.kind)
            );
        }
        return Ok(());
    }

    println!("Available Effects");
    println!("=================");
    for category in CATEGORIES {
        let effects = registry.effects_in_category(category);
        if effects.is_empty() {
            continue;
        }
        println!();
        println!("{} - {}", category.name(), category.description());
        for effect in effects {
            println!("  {:16}  {}", effect.id, effect.description);
        }
    }
    println!();
    println!("Use 'ledfx-config effects <EFFECT>' for options.");
    Ok(())
}

fn range(kind: &FieldKind) -> String {
    fn bound<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(String::new, |v| v.to_string())
    }

    match kind {
        FieldKind::Int { min, max } if min.is_some() || max.is_some() => {
            format!("{}..={}", bound(*min), bound(*max))
        }
        FieldKind::Float { min, max } if min.is_some() || max.is_some() => {
            format!("{}..={}", bound(*min), bound(*max))
        }
        FieldKind::Choice(choices) => choices.join(", "),
        _ => "-".to_string(),
    }
}
