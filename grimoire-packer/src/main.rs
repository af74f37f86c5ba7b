// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

use std::env;
use std::process::ExitCode;

use grimoire_packer::cli::{Command, USAGE};
use grimoire_packer::{CommandTool, Config, PackOutcome, Result, config, maintenance};
use log::{error, info};

fn log_outcomes(packs: &[PackOutcome]) {
    let failed: Vec<_> = packs
        .iter()
        .filter(|pack| !pack.is_ok())
        .map(|pack| pack.name.as_str())
        .collect();
    if !failed.is_empty() {
        error!("Packs with errors: {}", failed.join(", "));
    }
}

fn run(command: Command, config: &Config) -> Result<bool> {
    let tool = CommandTool::new(config.extract_command.clone(), config.compile_command.clone());
    match command {
        Command::Ingest => {
            let report = grimoire_packer::ingest(config, &tool)?;
            log_outcomes(&report.packs);
            info!(
                "Ingested {} documents from {} packs",
                report.documents(),
                report.packs.len()
            );
            Ok(report.is_success())
        }
        Command::Export { packs } => {
            let report = grimoire_packer::export(config, &tool, &packs)?;
            log_outcomes(&report.packs);
            info!(
                "Exported {} documents to {} packs (backup in {})",
                report.documents(),
                report.packs.len(),
                report.backup_dir.display()
            );
            Ok(report.is_success())
        }
        Command::Clean => {
            let report = maintenance::clean(config)?;
            info!("Removed {} orphaned documents", report.removed.len());
            Ok(report.health.is_healthy())
        }
        Command::Summary => {
            for row in maintenance::summary(config)? {
                println!("{}\t{}\t{}", row.compendium, row.document_type, row.documents);
            }
            Ok(true)
        }
        Command::Help => {
            print!("{USAGE}");
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("grimoire: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("grimoire: {e}");
            return ExitCode::FAILURE;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    match run(command, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
