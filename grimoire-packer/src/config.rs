// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Settings of the ingest and export passes.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, PackerError, Result};

/// Config file read when `GRIMOIRE_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "grimoire.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root holding one directory per packed compendium
    pub packs_dir: PathBuf,
    pub db_path: PathBuf,
    pub unpack_temp_dir: PathBuf,
    pub pack_temp_dir: PathBuf,
    /// Directory receiving `packs-backup-*` directories
    pub backup_dir: PathBuf,
    /// Entries of `packs_dir` that are not packs
    pub ignore: Vec<String>,
    /// Stop a pass at the first failing pack
    pub fail_fast: bool,
    /// Extractor argv; `{name}`, `{input}` and `{output}` are substituted
    pub extract_command: Vec<String>,
    /// Compiler argv; `{name}`, `{input}` and `{output}` are substituted
    pub compile_command: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let command = |verb: &str| {
            ["fvtt", "package", verb, "{name}", "--in", "{input}", "--out", "{output}"]
                .map(String::from)
                .to_vec()
        };
        Self {
            packs_dir: PathBuf::from("packs"),
            db_path: PathBuf::from("src/compendium-db/compendiums.db"),
            unpack_temp_dir: PathBuf::from("temp-unpack"),
            pack_temp_dir: PathBuf::from("temp-pack"),
            backup_dir: PathBuf::from("."),
            ignore: vec![".gitattributes".into(), ".DS_Store".into()],
            fail_fast: false,
            extract_command: command("unpack"),
            compile_command: command("pack"),
            log_level: "info".into(),
        }
    }
}

impl Config {
    pub fn load(settings_file: &Path) -> Result<Config> {
        let contents = read_to_string(settings_file).map_err(|e| ConfigError::ReadFile {
            path: settings_file.display().to_string(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(contents).map_err(|e| PackerError::from(ConfigError::from(e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> { Err(ConfigError::Invalid { reason }.into()) };

        if self.extract_command.first().is_none_or(|program| program.is_empty()) {
            return invalid("extract_command must name a program".into());
        }
        if self.compile_command.first().is_none_or(|program| program.is_empty()) {
            return invalid("compile_command must name a program".into());
        }
        for (field, dir) in [
            ("unpack_temp_dir", &self.unpack_temp_dir),
            ("pack_temp_dir", &self.pack_temp_dir),
        ] {
            if dir.as_os_str().is_empty() || dir == &self.packs_dir {
                return invalid(format!(
                    "{field} must be a separate directory from packs_dir ({})",
                    self.packs_dir.display()
                ));
            }
        }
        Ok(())
    }
}

/// Load the configuration named by `GRIMOIRE_CONFIG`, else `grimoire.toml`, else defaults.
pub fn load() -> Result<Config> {
    match std::env::var("GRIMOIRE_CONFIG") {
        Ok(settings_file) => Config::load(Path::new(&settings_file)),
        Err(_) => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                Config::load(Path::new(DEFAULT_CONFIG_FILE))
            } else {
                Ok(Config::default())
            }
        }
    }
}
