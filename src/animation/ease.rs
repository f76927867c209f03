use std::f64::consts::PI;
use std::str::FromStr;

use crate::foundation::error::TesseraError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

const BACK_S: f64 = 1.70158;

fn out_bounce(t: f64) -> f64 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

fn in_elastic(t: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let p = 0.4;
    let s = p / 4.0;
    let t = t - 1.0;
    -(2f64.powf(10.0 * t) * ((t - s) * (2.0 * PI) / p).sin())
}

fn out_elastic(t: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let p = 0.4;
    let s = p / 4.0;
    2f64.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / p).sin() + 1.0
}

/// Mirror an in-curve into an in-out curve.
fn in_out(t: f64, f: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        f(t * 2.0) / 2.0
    } else {
        1.0 - f((1.0 - t) * 2.0) / 2.0
    }
}

impl Ease {
    /// Map linear progress `t` (clamped to `[0, 1]`) onto the curve.
    ///
    /// Back and elastic curves overshoot outside `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => in_out(t, |x| x.powi(4)),
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::InOutQuint => in_out(t, |x| x.powi(5)),
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => 0.5 * (1.0 - (PI * t).cos()),
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    1024f64.powf(t - 1.0)
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => in_out(t, |x| if x == 0.0 { 0.0 } else { 1024f64.powf(x - 1.0) }),
            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => {
                let t = t - 1.0;
                (1.0 - t * t).sqrt()
            }
            Self::InOutCirc => in_out(t, |x| 1.0 - (1.0 - x * x).sqrt()),
            Self::InBack => t * t * ((BACK_S + 1.0) * t - BACK_S),
            Self::OutBack => {
                let t = t - 1.0;
                t * t * ((BACK_S + 1.0) * t + BACK_S) + 1.0
            }
            Self::InOutBack => in_out(t, |x| x * x * ((BACK_S + 1.0) * x - BACK_S)),
            Self::InElastic => in_elastic(t),
            Self::OutElastic => out_elastic(t),
            Self::InOutElastic => in_out(t, in_elastic),
            Self::InBounce => 1.0 - out_bounce(1.0 - t),
            Self::OutBounce => out_bounce(t),
            Self::InOutBounce => in_out(t, |x| 1.0 - out_bounce(1.0 - x)),
        }
    }

    /// Parse an easing name.
    ///
    /// Accepts the variant names (`"OutCubic"`) and the long-form web names (`"cubicOut"`,
    /// `"sinusoidalInOut"`, `"quadraticIn"`).
    pub fn parse(name: &str) -> Option<Self> {
        let ease = match name {
            "linear" | "Linear" => Self::Linear,
            "quadraticIn" | "InQuad" => Self::InQuad,
            "quadraticOut" | "OutQuad" => Self::OutQuad,
            "quadraticInOut" | "InOutQuad" => Self::InOutQuad,
            "cubicIn" | "InCubic" => Self::InCubic,
            "cubicOut" | "OutCubic" => Self::OutCubic,
            "cubicInOut" | "InOutCubic" => Self::InOutCubic,
            "quarticIn" | "InQuart" => Self::InQuart,
            "quarticOut" | "OutQuart" => Self::OutQuart,
            "quarticInOut" | "InOutQuart" => Self::InOutQuart,
            "quinticIn" | "InQuint" => Self::InQuint,
            "quinticOut" | "OutQuint" => Self::OutQuint,
            "quinticInOut" | "InOutQuint" => Self::InOutQuint,
            "sinusoidalIn" | "InSine" => Self::InSine,
            "sinusoidalOut" | "OutSine" => Self::OutSine,
            "sinusoidalInOut" | "InOutSine" => Self::InOutSine,
            "exponentialIn" | "InExpo" => Self::InExpo,
            "exponentialOut" | "OutExpo" => Self::OutExpo,
            "exponentialInOut" | "InOutExpo" => Self::InOutExpo,
            "circularIn" | "InCirc" => Self::InCirc,
            "circularOut" | "OutCirc" => Self::OutCirc,
            "circularInOut" | "InOutCirc" => Self::InOutCirc,
            "backIn" | "InBack" => Self::InBack,
            "backOut" | "OutBack" => Self::OutBack,
            "backInOut" | "InOutBack" => Self::InOutBack,
            "elasticIn" | "InElastic" => Self::InElastic,
            "elasticOut" | "OutElastic" => Self::OutElastic,
            "elasticInOut" | "InOutElastic" => Self::InOutElastic,
            "bounceIn" | "InBounce" => Self::InBounce,
            "bounceOut" | "OutBounce" => Self::OutBounce,
            "bounceInOut" | "InOutBounce" => Self::InOutBounce,
            _ => return None,
        };
        Some(ease)
    }
}

impl FromStr for Ease {
    type Err = TesseraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TesseraError::animation(format!("unknown easing \"{s}\"")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
