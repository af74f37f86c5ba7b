// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! External pack extractor/compiler.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

use crate::error::ToolError;

/// Converts between a packed compendium and a directory of per-document JSON files.
pub trait PackTool {
    /// Extract the pack at `pack` into `output`, one JSON file per document.
    fn extract(&self, pack: &Path, name: &str, output: &Path) -> Result<(), ToolError>;

    /// Compile the JSON files of `input` into the pack at `pack`.
    fn compile(&self, input: &Path, name: &str, pack: &Path) -> Result<(), ToolError>;
}

/// Runs configured command templates.
#[derive(Debug, Clone)]
pub struct CommandTool {
    extract: Vec<String>,
    compile: Vec<String>,
}

impl CommandTool {
    pub fn new(extract: Vec<String>, compile: Vec<String>) -> Self {
        Self { extract, compile }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_owned())
}

/// Substitute `{name}`, `{input}` and `{output}` in every argument.
pub fn render(template: &[String], name: &str, input: &Path, output: &Path) -> Vec<String> {
    let input = absolute(input);
    let output = absolute(output);
    template
        .iter()
        .map(|arg| {
            arg.replace("{name}", name)
                .replace("{input}", &input.to_string_lossy())
                .replace("{output}", &output.to_string_lossy())
        })
        .collect()
}

fn run(operation: &'static str, argv: &[String]) -> Result<Output, ToolError> {
    let (program, args) = argv
        .split_first()
        .filter(|(program, _)| !program.is_empty())
        .ok_or(ToolError::EmptyCommand { operation })?;
    debug!("Running {operation}: {}", argv.join(" "));
    Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ToolError::Spawn {
            program: program.clone(),
            source: e,
        })
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_owned()
}

impl PackTool for CommandTool {
    fn extract(&self, pack: &Path, name: &str, output: &Path) -> Result<(), ToolError> {
        let result = run("extract", &render(&self.extract, name, pack, output))?;
        if !result.status.success() {
            return Err(ToolError::Extract {
                pack: name.to_owned(),
                status: result.status.to_string(),
                stderr: stderr_of(&result),
            });
        }
        Ok(())
    }

    fn compile(&self, input: &Path, name: &str, pack: &Path) -> Result<(), ToolError> {
        let result = run("compile", &render(&self.compile, name, input, pack))?;
        if !result.status.success() {
            return Err(ToolError::Compile {
                pack: name.to_owned(),
                status: result.status.to_string(),
                stderr: stderr_of(&result),
            });
        }
        Ok(())
    }
}
