use anyhow::Context;
use pairflip_core::{Coord, Rules, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Canvas {
    pub width: i32,
    pub height: i32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 900,
            height: 700,
        }
    }
}

/// Optional TOML file, every key may be omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub rows: Coord,
    pub cols: Coord,
    pub hints: u8,
    pub hint_ms: u64,
    pub mismatch_ms: u64,
    pub frame_ms: u64,
    pub canvas: Canvas,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 7,
            hints: Rules::DEFAULT_HINT_BUDGET,
            hint_ms: Rules::DEFAULT_HINT_DURATION.as_millis() as u64,
            mismatch_ms: Rules::DEFAULT_MISMATCH_DELAY.as_millis() as u64,
            frame_ms: 16,
            canvas: Canvas::default(),
        }
    }
}

impl Settings {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        let settings = toml::from_str(&text)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        log::debug!("settings: {:?}", settings);
        Ok(settings)
    }

    pub(crate) fn rules(&self) -> Rules {
        Rules {
            hint_budget: self.hints,
            hint_duration: Duration::from_millis(self.hint_ms),
            mismatch_delay: Duration::from_millis(self.mismatch_ms),
        }
    }

    pub(crate) fn canvas(&self) -> Size {
        Size::new(self.canvas.width, self.canvas.height)
    }

    pub(crate) fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}
