//! Configuration loader - YAML file + .env environment

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::layout::{Lattice, Layout, DEFAULT_MODULUS};
use crate::render::RenderSettings;
use crate::scene::{FormulaKind, SceneInputs};

/// Default config file name
pub const DEFAULT_CONFIG_PATH: &str = "lattice.yaml";

/// Main configuration loaded from lattice.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub render: RenderSettings,
    pub dataset: PathBuf,
    pub window: WindowConfig,
}

/// Initial state of the controls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Layout key; unknown keys fall back to the Ulam spiral
    pub layout: String,
    pub formula: FormulaKind,
    pub custom_formula: String,
    pub params: String,
    pub modulus: u32,
    pub show_lines: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

/// Settings loaded from .env and the process environment
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub data_path: Option<PathBuf>,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            render: RenderSettings::default(),
            dataset: PathBuf::from("data/mersenne.json"),
            window: WindowConfig::default(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Ulam.key().to_string(),
            formula: FormulaKind::Minus,
            custom_formula: "n^2+1".to_string(),
            params: "5,7,11..13".to_string(),
            modulus: DEFAULT_MODULUS,
            show_lines: true,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load, or fall back to defaults when the file is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config not loaded, using defaults");
                Self::default()
            }
        }
    }

    /// Dataset path, with the environment override applied
    pub fn dataset_path(&self, env: &Environment) -> PathBuf {
        env.data_path.clone().unwrap_or_else(|| self.dataset.clone())
    }
}

impl ViewConfig {
    pub fn layout(&self) -> Layout {
        Layout::from_key(&self.layout)
    }

    pub fn lattice(&self) -> Lattice {
        Lattice::new(self.layout(), self.modulus)
    }

    pub fn scene_inputs(&self) -> SceneInputs {
        SceneInputs {
            formula: self.formula,
            custom_formula: self.custom_formula.clone(),
            params: self.params.clone(),
        }
    }
}

impl Environment {
    /// Load settings from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Environment {
            data_path: std::env::var("PRIME_LATTICE_DATA").ok().map(PathBuf::from),
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        }
    }
}
