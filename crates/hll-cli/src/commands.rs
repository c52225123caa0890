use anyhow::Context;
use colored::Colorize;
use tracing::debug;

use hll_crypto::Difficulty;
use hll_ledger::{HashLinkedLog, LogReader, LogWriter};
use hll_server::{HllServer, ServerConfig};
use hll_store::FileLineStore;
use hll_types::LogEntry;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    match cli.command {
        Command::Append(args) => cmd_append(&config, args, &cli.format),
        Command::Log(args) => cmd_log(&config, args, &cli.format),
        Command::Verify(_) => cmd_verify(&config, &cli.format),
        Command::Serve(args) => cmd_serve(config, args),
    }
}

/// Config file (if any), then command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(file) = &cli.file {
        config.log_path = file.clone();
    }
    if let Some(zeros) = cli.difficulty {
        config.log.difficulty = Difficulty::new(zeros)?;
    }
    if let Some(algorithm) = cli.algorithm {
        config.log.algorithm = algorithm;
    }
    debug!(
        path = %config.log_path.display(),
        difficulty = %config.log.difficulty,
        algorithm = %config.log.algorithm,
        "resolved configuration"
    );
    Ok(config)
}

fn open_log(config: &ServerConfig) -> anyhow::Result<HashLinkedLog<FileLineStore>> {
    let store = FileLineStore::open(&config.log_path, config.sync)
        .with_context(|| format!("opening {}", config.log_path.display()))?;
    Ok(HashLinkedLog::new(store, config.log.clone()))
}

fn cmd_append(config: &ServerConfig, args: AppendArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let log = open_log(config)?;
    let entry = log.append(&args.message)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
        OutputFormat::Text => {
            println!("{} Entry committed", "✓".green().bold());
            println!("  Hash: {}", entry.previous_hash.yellow());
            println!("  Nonce: {}", entry.nonce);
            println!("  Date: {}", entry.date.dimmed());
        }
    }
    Ok(())
}

fn cmd_log(config: &ServerConfig, args: LogArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let log = open_log(config)?;
    let entries = log.read_all()?;
    let skip = args
        .limit
        .map(|n| entries.len().saturating_sub(n))
        .unwrap_or(0);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries[skip..])?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("Log is empty.");
            }
            for (index, entry) in entries.iter().enumerate().skip(skip) {
                println!("{}", render_entry(index, entry));
            }
        }
    }
    Ok(())
}

fn render_entry(index: usize, entry: &LogEntry) -> String {
    let label = if index == 0 {
        "genesis".green().to_string()
    } else {
        format!("#{index}").yellow().to_string()
    };
    format!(
        "{label}  {}  {}  nonce {}\n  {}",
        entry.short_hash().dimmed(),
        entry.date,
        entry.nonce,
        entry.message
    )
}

fn cmd_verify(config: &ServerConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let log = open_log(config)?;
    let report = match log.verify() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e.to_string().red());
            return Err(e.into());
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("{} Hash chain integrity verified", "✓".green().bold());
            println!("  Entries: {}", report.length.to_string().bold());
            println!("  Algorithm: {}", report.algorithm.to_string().cyan());
            let mined = format!("{}/{}", report.difficulty_met, report.length.saturating_sub(1));
            if report.fully_mined() {
                println!("  Difficulty {}: {}", report.difficulty, mined.green());
            } else {
                println!("  Difficulty {}: {}", report.difficulty, mined.yellow());
            }
            if let Some(head) = &report.head_hash {
                println!("  Head: {}", head.yellow());
            }
        }
    }
    Ok(())
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let server = HllServer::open(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli_for(dir: &tempfile::TempDir, args: &[&str]) -> Cli {
        let file = dir.path().join("chain.log");
        let mut argv = vec!["hll", "--file", file.to_str().unwrap(), "-d", "1"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("hll.toml");
        std::fs::write(&config_path, "log_path = \"from-file.log\"\n[log]\ndifficulty = 4\n").unwrap();

        let cli = Cli::try_parse_from([
            "hll", "--config", config_path.to_str().unwrap(), "-d", "2", "verify",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.log_path.to_str(), Some("from-file.log"));
        assert_eq!(config.log.difficulty.zeros(), 2);
    }

    #[test]
    fn impossible_difficulty_is_rejected() {
        let cli = Cli::try_parse_from(["hll", "-d", "65", "verify"]).unwrap();
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn append_log_verify_round() {
        let dir = tempfile::tempdir().unwrap();
        for message in ["first", "second, with comma"] {
            run_command(cli_for(&dir, &["append", message])).unwrap();
        }
        run_command(cli_for(&dir, &["log", "-n", "1"])).unwrap();
        run_command(cli_for(&dir, &["verify", "--format", "json"])).unwrap();

        let config = resolve_config(&cli_for(&dir, &["verify"])).unwrap();
        let entries = open_log(&config).unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].message, "second, with comma");
    }

    #[test]
    fn verify_fails_on_tampered_file() {
        let dir = tempfile::tempdir().unwrap();
        run_command(cli_for(&dir, &["append", "one"])).unwrap();
        run_command(cli_for(&dir, &["append", "two"])).unwrap();

        let path = dir.path().join("chain.log");
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace(",two,", ",tw0,")).unwrap();

        assert!(run_command(cli_for(&dir, &["verify"])).is_err());
    }

    #[test]
    fn render_marks_genesis() {
        colored::control::set_override(false);
        let entry = LogEntry::new("abcdef0123", "msg", "2026-10-17T00:00:00.000Z", 3);
        assert!(render_entry(0, &entry).starts_with("genesis  abcdef01"));
        assert!(render_entry(4, &entry).starts_with("#4"));
    }
}
