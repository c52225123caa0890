use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hll_crypto::DigestAlgorithm;

#[derive(Parser)]
#[command(
    name = "hll",
    about = "Tamper-evident, proof-of-work gated append-only log",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file (same format as the server's)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Line file holding the chain
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Leading '0' hex characters required on every mined hash
    #[arg(short, long, global = true)]
    pub difficulty: Option<usize>,

    /// Link hash function: blake3 or sha256
    #[arg(long, global = true)]
    pub algorithm: Option<DigestAlgorithm>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mine and append a message to the log
    Append(AppendArgs),
    /// Show the validated chain
    Log(LogArgs),
    /// Verify hash chain integrity
    Verify(VerifyArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct AppendArgs {
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Show only the newest N entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct VerifyArgs {}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_append_with_globals() {
        let cli = Cli::try_parse_from([
            "hll", "--file", "chain.log", "-d", "2", "--algorithm", "sha256", "append", "hi, there",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("chain.log")));
        assert_eq!(cli.difficulty, Some(2));
        assert_eq!(cli.algorithm, Some(DigestAlgorithm::Sha256));
        match cli.command {
            Command::Append(args) => assert_eq!(args.message, "hi, there"),
            _ => panic!("expected append"),
        }
    }

    #[test]
    fn parse_log_json() {
        let cli = Cli::try_parse_from(["hll", "log", "-n", "5", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Log(args) => assert_eq!(args.limit, Some(5)),
            _ => panic!("expected log"),
        }
    }

    #[test]
    fn parse_serve_bind() {
        let cli = Cli::try_parse_from(["hll", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Command::Serve(args) => assert_eq!(args.bind.unwrap().port(), 9000),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn rejects_unknown_algorithm() {
        assert!(Cli::try_parse_from(["hll", "--algorithm", "md5", "verify"]).is_err());
    }

    #[test]
    fn append_requires_message() {
        assert!(Cli::try_parse_from(["hll", "append"]).is_err());
    }
}
