use std::path::PathBuf;

use clap::{ArgAction, Parser};
use libcidrmerge::ScanOptions;


/// Merges IP networks, addresses and address ranges into the shortest equivalent list of networks.
///
/// Each input line holds one network (`192.0.2.0/24`, `192.0.2.0/255.255.255.0`), address
/// (`192.0.2.7`) or inclusive range (`192.0.2.7-192.0.2.22`). IPv4 and IPv6 may be mixed.
#[derive(Debug, Parser)]
#[command(name = "cidrmerge", version)]
pub struct Args {
    /// Files to read; `-` reads standard input, which is also read if neither files nor networks
    /// are given
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Network, address or range to merge along with the input (repeatable)
    #[arg(short = 'n', long = "network", value_name = "SPEC")]
    pub networks: Vec<String>,

    /// Reject networks whose address has host bits set
    #[arg(long, env = "CIDRMERGE_STRICT")]
    pub strict: bool,

    /// Warn about and skip lines that cannot be parsed
    #[arg(long)]
    pub skip_invalid: bool,

    /// Output networks as network/netmask instead of network/prefix
    #[arg(long)]
    pub netmask: bool,

    /// Log more details (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// A source of input lines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Args {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            strict: self.strict,
            skip_invalid: self.skip_invalid,
        }
    }

    /// The default log filter; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn inputs(&self) -> Vec<Input> {
        if self.files.is_empty() {
            return if self.networks.is_empty() {
                vec![Input::Stdin]
            } else {
                Vec::new()
            };
        }

        self.files.iter()
            .map(|path| if path.as_os_str() == "-" {
                Input::Stdin
            } else {
                Input::File(path.clone())
            })
            .collect()
    }
}
