//! Decorative particle background

use serde::Serialize;

use super::Page;
use crate::platform::{
    PageHost,
    PreferenceStore,
    ResourceFetcher,
};

/// Element id hosting the particle canvas.
pub const PARTICLES_HOST_ID: &str = "particles-js";

/// Particle library configuration, serialized in the library's own JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticlesConfig {
    pub particles: Particles,
    pub interactivity: Interactivity,
    pub retina_detect: bool,
}

/// `particles` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particles {
    pub number: ParticleNumber,
    pub color: ParticleColor,
    pub shape: ParticleShape,
    pub opacity: ParticleOpacity,
    pub size: ParticleSize,
    pub line_linked: Toggle,
    #[serde(rename = "move")]
    pub movement: ParticleMovement,
}

/// Particle count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParticleNumber {
    pub value: u32,
    pub density: Density,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Density {
    pub enable: bool,
    pub value_area: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticleColor {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticleShape {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Opacity, optionally animated
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleOpacity {
    pub value: f64,
    pub random: bool,
    pub anim: OpacityAnimation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpacityAnimation {
    pub enable: bool,
    pub speed: f64,
    pub opacity_min: f64,
    pub sync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParticleSize {
    pub value: u32,
    pub random: bool,
}

/// `move` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleMovement {
    pub enable: bool,
    pub speed: f64,
    pub direction: String,
    pub random: bool,
    pub out_mode: String,
}

/// Pointer interaction; both events are disabled for the grimoire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interactivity {
    pub detect_on: String,
    pub events: InteractivityEvents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteractivityEvents {
    pub onhover: Toggle,
    pub onclick: Toggle,
}

/// `{ "enable": bool }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub enable: bool,
}

impl ParticlesConfig {
    /// Slow, sparse gold dust.
    #[must_use]
    pub fn grimoire() -> Self {
        Self {
            particles: Particles {
                number: ParticleNumber {
                    value: 60,
                    density: Density { enable: true, value_area: 800 },
                },
                color: ParticleColor { value: "#d4af37".to_string() },
                shape: ParticleShape { kind: "circle".to_string() },
                opacity: ParticleOpacity {
                    value: 0.5,
                    random: true,
                    anim: OpacityAnimation {
                        enable: true,
                        speed: 1.0,
                        opacity_min: 0.1,
                        sync: false,
                    },
                },
                size: ParticleSize { value: 2, random: true },
                line_linked: Toggle { enable: false },
                movement: ParticleMovement {
                    enable: true,
                    speed: 0.5,
                    direction: "none".to_string(),
                    random: true,
                    out_mode: "out".to_string(),
                },
            },
            interactivity: Interactivity {
                detect_on: "canvas".to_string(),
                events: InteractivityEvents {
                    onhover: Toggle { enable: false },
                    onclick: Toggle { enable: false },
                },
            },
            retina_detect: true,
        }
    }
}

impl<F, S, H> Page<F, S, H>
where
    F: ResourceFetcher,
    S: PreferenceStore,
    H: PageHost,
{
    /// Starts the particle background when both its host element and the library exist.
    pub async fn init_particles(&self) -> bool {
        let mut host = self.host.lock().await;
        if host.element_by_id(PARTICLES_HOST_ID).is_none() || !host.particles_available() {
            return false;
        }
        host.init_particles(PARTICLES_HOST_ID, &ParticlesConfig::grimoire());
        true
    }
}
