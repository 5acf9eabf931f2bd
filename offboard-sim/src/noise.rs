use nalgebra::Vector3;
use rand_distr::{Distribution, Normal, NormalError};

use crate::config::NoiseConfig;

/// Per-axis gaussian noise plus a constant bias, applied to telemetry.
#[derive(Debug, Clone, Default)]
pub struct Noise {
    normal: Option<[Normal<f32>; 3]>,
    bias: Option<Vector3<f32>>,
}

impl Noise {
    pub fn new_from_cfg(cfg: &NoiseConfig) -> Result<Self, NormalError> {
        let normal = match cfg.std_dev {
            Some(std) => Some([
                Normal::new(0.0, std[0])?,
                Normal::new(0.0, std[1])?,
                Normal::new(0.0, std[2])?,
            ]),
            None => None,
        };

        Ok(Self {
            normal,
            bias: cfg.bias.map(Vector3::from),
        })
    }

    pub fn apply(&self, mut value: Vector3<f32>) -> Vector3<f32> {
        if let Some(normal) = &self.normal {
            let mut rng = rand::rng();
            value += Vector3::from_fn(|i, _| normal[i].sample(&mut rng));
        }

        if let Some(bias) = self.bias {
            value += bias;
        }

        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_transparent() {
        let value = Vector3::new(1.0, -2.0, 3.0);
        assert_eq!(Noise::default().apply(value), value);
    }

    #[test]
    fn bias_is_added() {
        let noise = Noise::new_from_cfg(&NoiseConfig {
            std_dev: None,
            bias: Some([0.5, 0.0, -0.5]),
        })
        .unwrap();

        assert_eq!(noise.apply(Vector3::zeros()), Vector3::new(0.5, 0.0, -0.5));
    }

    #[test]
    fn negative_deviation_is_rejected() {
        let cfg = NoiseConfig {
            std_dev: Some([0.1, -1.0, 0.1]),
            bias: None,
        };
        assert!(Noise::new_from_cfg(&cfg).is_err());
    }
}
