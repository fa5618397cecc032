use thiserror::Error;

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// Rejected schedule parameters, reported before any training starts
#[derive(Debug, Error, PartialEq)]
pub enum DecayError {
    #[error("`vi` must not be below `vf` for a decaying schedule")]
    InvertedBounds,
    #[error("decay rate must be in the interval [0, 1]")]
    RateOutOfRange,
}

fn validate(vi: f32, vf: f32) -> Result<(), DecayError> {
    (vi >= vf).then_some(()).ok_or(DecayError::InvertedBounds)
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// Evaluated at integer episode indices this is the per-episode
/// multiplicative decay `v <- max(vf, v * r)`, with `vf` as the floor that
/// keeps exploration from fully vanishing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multiplicative {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Multiplicative {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self, DecayError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(DecayError::RateOutOfRange);
        }
        validate(vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Multiplicative {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powf(t)).max(vf)
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exponential {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Exponential {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self, DecayError> {
        if rate < 0.0 {
            return Err(DecayError::RateOutOfRange);
        }
        validate(vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) * (-rate * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 0.0).is_ok());
        assert_eq!(validate(0.0, 1.0), Err(DecayError::InvertedBounds));
        assert_eq!(
            Multiplicative::new(1.5, 1.0, 0.0),
            Err(DecayError::RateOutOfRange)
        );
    }

    #[test]
    fn constant_decay() {
        let x = Constant::new(1.0);
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1.0), 1.0);
    }

    #[test]
    fn multiplicative_decay() {
        let x = Multiplicative::new(0.5, 1.0, 0.2).unwrap();
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(10.0), 0.2, "Clamped at the floor");
    }

    #[test]
    fn multiplicative_decay_monotone() {
        let x = Multiplicative::new(0.997, 1.0, 0.05).unwrap();
        let mut prev = x.evaluate(0.0);
        for t in 1..4000 {
            let value = x.evaluate(t as f32);
            assert!(value <= prev, "Epsilon never increases across episodes");
            assert!(value >= 0.05, "Epsilon never falls below the floor");
            prev = value;
        }
    }

    #[test]
    fn exponential_decay() {
        let x = Exponential::new(2.0, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 0.5 + 1.5 * f32::exp(-2.0));
    }
}
