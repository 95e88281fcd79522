mod cli;
mod console;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use clap::Parser;
use libcidrmerge::{covered_address_count, merge_all, scan_requests, Family, MaskTable, ScanError, Subnet};
use log::{debug, info};

use crate::cli::{Args, Input};


fn read_input(input: &Input, args: &Args, masks: &MaskTable) -> Result<Vec<Subnet>, String> {
    let options = args.scan_options();
    match input {
        Input::Stdin => {
            debug!("reading standard input");
            let stdin = io::stdin();
            scan_requests(stdin.lock().lines(), &options, masks)
                .map_err(|e| format!("standard input: {}", e))
        },
        Input::File(path) => {
            debug!("reading {}", path.display());
            let file = File::open(path)
                .map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
            scan_requests(BufReader::new(file).lines(), &options, masks)
                .map_err(|e| format!("{}: {}", path.display(), e))
        },
    }
}

fn read_networks(args: &Args, masks: &MaskTable) -> Result<Vec<Subnet>, String> {
    let lines = args.networks.iter()
        .map(|spec| Ok::<_, io::Error>(spec.as_str()));
    scan_requests(lines, &args.scan_options(), masks)
        .map_err(|e| match e {
            ScanError::Line { line_number, source }
                => format!("network argument {}: {}", line_number, source),
            other => other.to_string(),
        })
}

fn write_subnets(subnets: &[Subnet], netmask: bool, masks: &MaskTable) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for subnet in subnets {
        if netmask {
            writeln!(out, "{}", subnet.to_netmask_string(masks))?;
        } else {
            writeln!(out, "{}", subnet)?;
        }
    }
    out.flush()
}

fn log_summary(input_count: usize, merged: &[Subnet], masks: &MaskTable) {
    info!("{} networks in, {} networks out", input_count, merged.len());
    for family in [Family::Ipv4, Family::Ipv6] {
        if let Some(count) = covered_address_count(merged, family, masks) {
            info!("{} {} addresses covered", count, family);
        }
    }
}

fn do_main() -> i32 {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    let masks = MaskTable::shared();

    let mut subnets = match read_networks(&args, masks) {
        Ok(s) => s,
        Err(e) => {
            crate::console::report_error(e);
            return 1;
        },
    };
    for input in args.inputs() {
        match read_input(&input, &args, masks) {
            Ok(s) => subnets.extend(s),
            Err(e) => {
                crate::console::report_error(e);
                return 1;
            },
        }
    }

    if subnets.is_empty() {
        crate::console::report_warning("no networks in input");
    }

    let input_count = subnets.len();
    let merged = merge_all(subnets, masks);
    log_summary(input_count, &merged, masks);

    if let Err(e) = write_subnets(&merged, args.netmask, masks) {
        crate::console::report_error(format!("failed to write output: {}", e));
        return 1;
    }

    0
}

fn main() {
    std::process::exit(do_main());
}
