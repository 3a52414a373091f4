//! Built-in effect descriptors and their configuration schemas.

use ledfx_schema::{FieldKind, Schema};
use serde_json::json;

use crate::{EffectCategory, EffectDescriptor};

const GRADIENT_DEFAULT: &str =
    "linear-gradient(90deg, rgb(255, 0, 0) 0%, rgb(0, 255, 0) 50%, rgb(0, 0, 255) 100%)";

// Fields every effect accepts.
fn base_schema() -> Schema {
    Schema::new()
        .with_default("blur", FieldKind::float_range(0.0, 10.0), 0.0)
        .with_default("flip", FieldKind::Bool, false)
        .with_default("mirror", FieldKind::Bool, false)
        .with_default("brightness", FieldKind::float_range(0.0, 1.0), 1.0)
        .with_default("background_color", FieldKind::Str, "#000000")
        .with_default("background_brightness", FieldKind::float_range(0.0, 1.0), 1.0)
}

fn gradient_schema() -> Schema {
    base_schema()
        .with_default("gradient", FieldKind::Str, GRADIENT_DEFAULT)
        .with_default("gradient_roll", FieldKind::float_range(0.0, 10.0), 0.0)
}

fn audio_schema() -> Schema {
    base_schema().with_default(
        "mixing_mode",
        FieldKind::choice(["additive", "overlap"]),
        "additive",
    )
}

fn band_colors(schema: Schema) -> Schema {
    schema
        .with_default("color_lows", FieldKind::Str, "#FF0000")
        .with_default("color_mids", FieldKind::Str, "#00FF00")
        .with_default("color_high", FieldKind::Str, "#0000FF")
}

fn beat_schema() -> Schema {
    gradient_schema().with_default("beat_offset", FieldKind::float_range(-0.5, 0.5), 0.0)
}

/// Descriptors for all built-in effects.
pub(crate) fn descriptors() -> Vec<EffectDescriptor> {
    vec![
        EffectDescriptor {
            id: "singleColor",
            name: "Single Color",
            description: "A single solid colour across the strip",
            category: EffectCategory::NonReactive,
            schema: base_schema().with_default("color", FieldKind::Str, "#FF0000"),
        },
        EffectDescriptor {
            id: "gradient",
            name: "Gradient",
            description: "A static or rolling colour gradient",
            category: EffectCategory::NonReactive,
            schema: gradient_schema().with_default(
                "speed",
                FieldKind::float_range(0.1, 10.0),
                1.0,
            ),
        },
        EffectDescriptor {
            id: "rainbow",
            name: "Rainbow",
            description: "A scrolling rainbow",
            category: EffectCategory::NonReactive,
            schema: base_schema()
                .with_default("speed", FieldKind::float_range(0.1, 10.0), 1.0)
                .with_default("frequency", FieldKind::float_range(0.1, 10.0), 1.0),
        },
        EffectDescriptor {
            id: "fade",
            name: "Fade",
            description: "Fades the whole strip through a gradient",
            category: EffectCategory::NonReactive,
            schema: gradient_schema().with_default(
                "speed",
                FieldKind::float_range(0.1, 10.0),
                0.5,
            ),
        },
        EffectDescriptor {
            id: "energy",
            name: "Energy",
            description: "Low, mid and high bands grow from the centre",
            category: EffectCategory::Classic,
            schema: band_colors(audio_schema())
                .with_default("blur", FieldKind::float_range(0.0, 10.0), 4.0)
                .with_default("mirror", FieldKind::Bool, true)
                .with_default("sensitivity", FieldKind::float_range(0.3, 0.99), 0.6),
        },
        EffectDescriptor {
            id: "scroll",
            name: "Scroll",
            description: "Band colours scroll outward on each hit",
            category: EffectCategory::Classic,
            schema: band_colors(audio_schema())
                .with_default("speed", FieldKind::int_range(1, 10), 5)
                .with_default("decay", FieldKind::float_range(0.2, 0.99), 0.97)
                .with_default("threshold", FieldKind::float_range(0.0, 1.0), 0.0),
        },
        EffectDescriptor {
            id: "wavelength",
            name: "Wavelength",
            description: "Maps the melbank onto a gradient",
            category: EffectCategory::Classic,
            schema: gradient_schema()
                .with_default("blur", FieldKind::float_range(0.0, 10.0), 3.0)
                .with_default("mirror", FieldKind::Bool, true),
        },
        EffectDescriptor {
            id: "power",
            name: "Power",
            description: "Bass-driven gradient with sparks on high frequencies",
            category: EffectCategory::Classic,
            schema: gradient_schema()
                .with_default("mirror", FieldKind::Bool, true)
                .with_default("bass_decay_rate", FieldKind::float_range(0.0, 1.0), 0.05)
                .with_default("sparks_decay_rate", FieldKind::float_range(0.0, 1.0), 0.15)
                .with_default("sparks_color", FieldKind::Str, "#FFFFFF"),
        },
        EffectDescriptor {
            id: "pitchSpectrum",
            name: "Pitch Spectrum",
            description: "Lights the pixel matching the dominant pitch",
            category: EffectCategory::Classic,
            schema: gradient_schema()
                .with_default("fade_rate", FieldKind::float_range(0.0, 1.0), 0.15)
                .with_default("responsiveness", FieldKind::float_range(0.0, 1.0), 0.15),
        },
        EffectDescriptor {
            id: "bar",
            name: "Bar",
            description: "A bar that moves with the beat",
            category: EffectCategory::Bpm,
            schema: beat_schema()
                .with_default(
                    "mode",
                    FieldKind::choice(["bounce", "wipe", "in-out"]),
                    "wipe",
                )
                .with_default(
                    "ease_method",
                    FieldKind::choice(["ease_in_out", "ease_in", "ease_out", "linear"]),
                    "ease_out",
                )
                .with_default("color_step", FieldKind::float_range(0.0625, 0.5), 0.125),
        },
        EffectDescriptor {
            id: "strobe",
            name: "BPM Strobe",
            description: "Strobes in time with the beat",
            category: EffectCategory::Bpm,
            schema: beat_schema()
                .with_default("strobe_color", FieldKind::Str, "#FFFFFF")
                .with_default(
                    "strobe_frequency",
                    FieldKind::choice(["1/2 (.-. )", "1/4 (.o. )", "1/8 (◉◡◉ )", "1/16 (◉﹏◉ )"]),
                    "1/2 (.-. )",
                )
                .with_default("strobe_decay", FieldKind::float_range(0.5, 10.0), 1.5),
        },
        EffectDescriptor {
            id: "real_strobe",
            name: "Strobe",
            description: "Audio-triggered strobe flashes",
            category: EffectCategory::Bpm,
            schema: gradient_schema()
                .with_default("strobe_color", FieldKind::Str, "#FFFFFF")
                .with_default("strobe_width", FieldKind::int_range(0, 1000), 10)
                .with_default("strobe_decay_rate", FieldKind::float_range(0.0, 1.0), 0.5)
                .with_default("color_shift_delay", FieldKind::float_range(0.0, 1.0), 1.0),
        },
        EffectDescriptor {
            id: "melt",
            name: "Melt",
            description: "Slowly melting gradient modulated by volume",
            category: EffectCategory::Atmospheric,
            schema: gradient_schema()
                .with_default("speed", FieldKind::float_range(0.01, 1.0), 0.5)
                .with_default("reactivity", FieldKind::float_range(0.0, 1.0), 0.5)
                .with_default("palette", FieldKind::Any, json!(null)),
        },
    ]
}
