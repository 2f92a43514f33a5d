//! Interpolation strategies

use std::f64::consts::TAU;

pub const ELASTIC_AMPLITUDE: f64 = 1.0;
pub const ELASTIC_PERIOD: f64 = 0.3;

/// Shapes normalized progress before it is mapped onto a value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    #[default]
    Smooth,
    EaseIn,
    EaseOut,
    EaseInOut,
    Elastic,
    Bounce,
}

impl Interpolation {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "linear"    => Self::Linear,
            "smooth"    => Self::Smooth,
            "easein"    => Self::EaseIn,
            "easeout"   => Self::EaseOut,
            "easeinout" => Self::EaseInOut,
            "elastic"   => Self::Elastic,
            "bounce"    => Self::Bounce,
            _ => return None,
        })
    }

    /// Maps `t` in [0, 1] onto the curve. Endpoints are always exact.
    pub fn apply(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::Smooth => smoothstep(t),
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 { 2.0 * t * t } else { -1.0 + (4.0 - 2.0 * t) * t }
            }
            Self::Elastic => elastic_out(t),
            Self::Bounce => bounce_out(t),
        }
    }

    pub fn lerp(&self, start: f64, end: f64, t: f64) -> f64 {
        lerp(start, end, self.apply(t))
    }
}

/// Exact at `t = 0` and `t = 1`.
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}

/// `t²(3 − 2t)`, clamped to [0, 1].
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Damped sine overshooting toward 1.
pub fn elastic_out(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let p = ELASTIC_PERIOD;
    ELASTIC_AMPLITUDE * 2f64.powf(-10.0 * t) * ((t - p / 4.0) * TAU / p).sin() + 1.0
}

pub fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}
