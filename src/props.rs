//! Per-animation props derived from the current settings

use serde::{Deserialize, Serialize};

use crate::governor::{AdaptiveSettings, AnimationComplexity};

/// Kind of visual effect asking for parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Text,
    Card,
    Background,
    Particle,
}

impl AnimationKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationKind::Text => "text",
            AnimationKind::Card => "card",
            AnimationKind::Background => "background",
            AnimationKind::Particle => "particle",
        }
    }

    pub fn all() -> &'static [AnimationKind] {
        &[
            AnimationKind::Text,
            AnimationKind::Card,
            AnimationKind::Background,
            AnimationKind::Particle,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub complexity: AnimationComplexity,
    pub enable_split: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProps {
    pub enable_hover: bool,
    pub enable_shadow: bool,
    #[serde(rename = "enable3D")]
    pub enable_3d: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundProps {
    pub enable_blur: bool,
    pub enable_gradients: bool,
    pub particle_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleProps {
    pub count: u32,
    pub enabled: bool,
}

/// Kind-specific fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KindProps {
    Text(TextProps),
    Card(CardProps),
    Background(BackgroundProps),
    Particle(ParticleProps),
}

/// Parameters handed to a single visual effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedProps {
    pub duration: f64,
    pub stagger_delay: f64,
    pub should_animate: bool,
    #[serde(flatten)]
    pub detail: KindProps,
}

/// Derive effect parameters for `kind` from `settings`
pub fn optimized_props(settings: &AdaptiveSettings, kind: AnimationKind) -> OptimizedProps {
    let complexity = settings.animation_complexity;

    let detail = match kind {
        AnimationKind::Text => KindProps::Text(TextProps {
            complexity,
            enable_split: complexity != AnimationComplexity::Minimal,
        }),
        AnimationKind::Card => KindProps::Card(CardProps {
            enable_hover: complexity != AnimationComplexity::Minimal,
            enable_shadow: settings.enable_shadows,
            enable_3d: complexity == AnimationComplexity::High,
        }),
        AnimationKind::Background => KindProps::Background(BackgroundProps {
            enable_blur: settings.enable_blur,
            enable_gradients: settings.enable_gradients,
            particle_count: settings.particle_count,
        }),
        AnimationKind::Particle => KindProps::Particle(ParticleProps {
            count: settings.particle_count,
            enabled: settings.particle_count > 0,
        }),
    };

    OptimizedProps {
        duration: settings.animation_duration,
        stagger_delay: settings.stagger_delay,
        should_animate: !settings.should_reduce_motion,
        detail,
    }
}
