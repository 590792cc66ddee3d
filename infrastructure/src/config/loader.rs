//! Layered discovery and loading of `council.toml` files.

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Project-level file names, first hit wins.
const PROJECT_FILES: [&str; 2] = ["council.toml", ".council.toml"];

/// One layer of the configuration stack.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Origin label shown by `--show-config`
    pub origin: &'static str,
    /// File backing this layer, if it is file-based
    pub path: Option<PathBuf>,
    /// Whether the backing file exists (defaults are always present)
    pub present: bool,
}

impl ConfigLayer {
    fn file(origin: &'static str, path: PathBuf) -> Self {
        Self {
            origin,
            present: path.exists(),
            path: Some(path),
        }
    }
}

/// Configuration loader over a stack of TOML layers.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Enumerate the configuration stack, lowest priority first: built-in
    /// defaults, the user file under the OS config directory, a
    /// `council.toml` (or `.council.toml`) in the working directory, and
    /// finally an explicit `--config` path. Absent files stay in the list
    /// so the stack can be reported to the user.
    pub fn layers(explicit: Option<&PathBuf>) -> Vec<ConfigLayer> {
        let mut layers = vec![ConfigLayer {
            origin: "defaults",
            path: None,
            present: true,
        }];

        if let Some(dir) = dirs::config_dir() {
            layers.push(ConfigLayer::file(
                "user",
                dir.join("llm-council").join("config.toml"),
            ));
        }

        let project = PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .unwrap_or_else(|| PathBuf::from(PROJECT_FILES[0]));
        layers.push(ConfigLayer::file("project", project));

        if let Some(path) = explicit {
            layers.push(ConfigLayer::file("--config", path.clone()));
        }

        layers
    }

    /// Merge every present layer over the defaults and extract.
    pub fn load(explicit: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let figment = Self::layers(explicit).into_iter().fold(
            Figment::from(Serialized::defaults(FileConfig::default())),
            |figment, layer| match layer.path {
                Some(path) if layer.present => figment.merge(Toml::file(path)),
                _ => figment,
            },
        );
        figment.extract().map_err(Box::new)
    }

    /// Built-in defaults only (for `--no-config`).
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Report the configuration stack, marking which layers are backed by
    /// an existing file.
    pub fn print_sources(explicit: Option<&PathBuf>) {
        println!("Configuration stack (later layers override earlier ones):");
        for layer in Self::layers(explicit) {
            let mark = if layer.present { '+' } else { '-' };
            match &layer.path {
                Some(path) => println!("  {mark} {:<8} {}", layer.origin, path.display()),
                None => println!("  {mark} {:<8} built-in", layer.origin),
            }
        }
    }
}
