use crate::error::Error;
use serde_derive::{Deserialize, Serialize};
use std::io::Read;

/// How a recorded point spreads over the heatmap grid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum HeatmapKernel {
    /// `+1.0` on the containing cell only.
    Cell,
    /// Gaussian falloff over a `(2 * radius + 1)` cell square.
    Gaussian { radius: u32, sigma: f32 },
}

impl Default for HeatmapKernel {
    fn default() -> Self {
        HeatmapKernel::Cell
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum HeatmapDecay {
    /// Weights only ever grow until reset.
    Cumulative,
    /// All weights are multiplied by `factor` once per tick, before recording.
    Exponential { factor: f32 },
}

impl Default for HeatmapDecay {
    fn default() -> Self {
        HeatmapDecay::Cumulative
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryRetention {
    /// A trail is purged when its track retires.
    Drop,
    /// Trails of retired tracks stay readable until reset.
    Keep,
}

impl Default for TrajectoryRetention {
    fn default() -> Self {
        TrajectoryRetention::Drop
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Pixels per grid cell side.
    pub cell_size: u32,
    pub kernel: HeatmapKernel,
    pub decay: HeatmapDecay,
    /// Snapshots carry a freshly exported view every `export_interval` ticks.
    pub export_interval: u32,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            cell_size: 1,
            kernel: HeatmapKernel::default(),
            decay: HeatmapDecay::default(),
            export_interval: 1,
        }
    }
}

/// Largest heatmap grid accepted, in cells.
pub const MAX_HEATMAP_CELLS: usize = 1 << 26;

impl HeatmapConfig {
    /// Grid `(rows, cols)` covering a `frame_width`x`frame_height` frame.
    pub fn grid_dims(&self, frame_width: u32, frame_height: u32) -> Result<(usize, usize), Error> {
        if self.cell_size == 0 {
            return Err(Error::config("heatmap.cell_size", "must be at least 1"));
        }

        let cols = frame_width.div_ceil(self.cell_size) as usize;
        let rows = frame_height.div_ceil(self.cell_size) as usize;

        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_HEATMAP_CELLS => Ok((rows, cols)),
            _ => Err(Error::config(
                "heatmap.cell_size",
                format!(
                    "{}x{} frame at cell size {} exceeds {} cells",
                    frame_width, frame_height, self.cell_size, MAX_HEATMAP_CELLS
                ),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.cell_size == 0 {
            return Err(Error::config("heatmap.cell_size", "must be at least 1"));
        }

        if self.export_interval == 0 {
            return Err(Error::config("heatmap.export_interval", "must be at least 1"));
        }

        if let HeatmapKernel::Gaussian { sigma, .. } = self.kernel {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(Error::config(
                    "heatmap.kernel.sigma",
                    format!("must be finite and positive, got {}", sigma),
                ));
            }
        }

        if let HeatmapDecay::Exponential { factor } = self.decay {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(Error::config(
                    "heatmap.decay.factor",
                    format!("must be in (0, 1], got {}", factor),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Consecutive missed ticks a track survives before it is retired.
    pub max_disappeared: u32,
    /// Largest centroid distance, in pixels, a match may span.
    pub max_distance: f32,
    /// Ring buffer capacity of every trajectory.
    pub trajectory_length: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub trajectory_retention: TrajectoryRetention,
    pub heatmap: HeatmapConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_disappeared: 30,
            max_distance: 50.0,
            trajectory_length: 30,
            frame_width: 640,
            frame_height: 480,
            trajectory_retention: TrajectoryRetention::default(),
            heatmap: HeatmapConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            ..Default::default()
        }
    }

    pub fn from_json_str(src: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(src)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(Error::config(
                "max_distance",
                format!("must be finite and positive, got {}", self.max_distance),
            ));
        }

        if self.trajectory_length == 0 {
            return Err(Error::config("trajectory_length", "must be at least 1"));
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(Error::config(
                "frame_width/frame_height",
                format!(
                    "frame must not be empty, got {}x{}",
                    self.frame_width, self.frame_height
                ),
            ));
        }

        self.heatmap.validate()?;
        self.heatmap.grid_dims(self.frame_width, self.frame_height)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrackerConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.max_disappeared, 30);
        assert_eq!(config.trajectory_length, 30);
        assert!((config.max_distance - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json() {
        let config = TrackerConfig::from_json_str(
            r#"{
                "max_distance": 80.0,
                "frame_width": 1280,
                "frame_height": 720,
                "heatmap": { "kernel": { "type": "gaussian", "radius": 3, "sigma": 1.5 } }
            }"#,
        )
        .unwrap();

        assert!((config.max_distance - 80.0).abs() < f32::EPSILON);
        assert_eq!(config.max_disappeared, 30);
        assert_eq!(config.frame_width, 1280);
        assert_eq!(
            config.heatmap.kernel,
            HeatmapKernel::Gaussian {
                radius: 3,
                sigma: 1.5
            }
        );
        assert_eq!(config.heatmap.decay, HeatmapDecay::Cumulative);
        assert_eq!(config.heatmap.cell_size, 1);
    }

    #[test]
    fn test_from_reader() {
        let src = br#"{"trajectory_retention": "keep", "heatmap": {"decay": {"type": "exponential", "factor": 0.9}}}"#;
        let config = TrackerConfig::from_json_reader(&src[..]).unwrap();

        assert_eq!(config.trajectory_retention, TrajectoryRetention::Keep);
        assert_eq!(
            config.heatmap.decay,
            HeatmapDecay::Exponential { factor: 0.9 }
        );
    }

    #[test]
    fn test_rejects_out_of_range() {
        let bad = [
            TrackerConfig {
                max_distance: 0.0,
                ..Default::default()
            },
            TrackerConfig {
                max_distance: -3.0,
                ..Default::default()
            },
            TrackerConfig {
                max_distance: f32::NAN,
                ..Default::default()
            },
            TrackerConfig {
                trajectory_length: 0,
                ..Default::default()
            },
            TrackerConfig::new(0, 480),
        ];

        for config in &bad {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig { .. })),
                "{:?} should be rejected",
                config
            );
        }

        let mut config = TrackerConfig::default();
        config.heatmap.decay = HeatmapDecay::Exponential { factor: 1.5 };
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.heatmap.kernel = HeatmapKernel::Gaussian {
            radius: 2,
            sigma: 0.0,
        };
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.heatmap.cell_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_heatmap() {
        let mut config = TrackerConfig {
            frame_width: u32::MAX,
            frame_height: 1,
            ..Default::default()
        };
        config.heatmap.cell_size = 2;

        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig {
                field: "heatmap.cell_size",
                ..
            })
        ));

        config.heatmap.cell_size = 1 << 16;
        assert!(config.validate().is_ok());
        assert_eq!(
            config.heatmap.grid_dims(u32::MAX, 1).unwrap(),
            (1, 1 << 16)
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            TrackerConfig::from_json_str("{ max_distance: }"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            TrackerConfig::from_json_str(r#"{"max_distance": -1.0}"#),
            Err(Error::InvalidConfig {
                field: "max_distance",
                ..
            })
        ));
    }
}
