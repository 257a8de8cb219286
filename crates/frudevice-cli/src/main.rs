use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use frudevice_core::bus::{
    FRU_INTERFACE, FRU_OBJECT_PATH, FruPublisher, MANAGER_INTERFACE, MemoryBus, RESCAN_METHOD,
};
use frudevice_core::{ConfigError, DeviceOpener, ScanConfig, Scanner};
use glob::glob;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "frudevice")]
#[command(version)]
#[command(
    about = "Reads FRU identity data from an EEPROM and publishes it as bus properties.",
    long_about = None,
    after_help = "Examples:\n  frudevice dump\n  frudevice scan --stdout --pretty\n  frudevice serve --device '/sys/bus/i2c/devices/*-0050/eeprom'"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan once and print NAME=value lines.
    Dump {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Scan once and write a versioned JSON report.
    #[command(
        after_help = "Examples:\n  frudevice scan -o fru.json\n  frudevice scan --stdout --pretty"
    )]
    Scan {
        #[command(flatten)]
        source: SourceArgs,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Publish the record and accept ReScan/Get/Quit commands on stdin.
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON file overriding the default scan configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// EEPROM candidate path or glob, tried in the order given (repeatable)
    #[arg(long = "device", value_name = "PATH")]
    devices: Vec<String>,

    /// File holding the server id on its first line
    #[arg(long)]
    server_id_path: Option<PathBuf>,

    /// Manufacturer name to publish
    #[arg(long)]
    manufacturer: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Dump { source } => cmd_dump(source),
        Commands::Scan {
            source,
            output,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_scan(source, output, stdout, pretty, compact, quiet),
        Commands::Serve { source, quiet } => cmd_serve(source, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_dump(source: SourceArgs) -> Result<(), CliError> {
    let config = resolve_config(&source)?;
    let record = Scanner::new(config).scan();

    let mut out = io::stdout().lock();
    for (name, value) in record.properties() {
        writeln!(out, "{name}={value}").context("Failed to write to stdout")?;
    }
    Ok(())
}

fn cmd_scan(
    source: SourceArgs,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = resolve_config(&source)?;
    let output = if stdout {
        None
    } else {
        Some(output.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };

    let scan = Scanner::new(config).scan_detailed();
    let report = frudevice_core::make_scan_report(&scan, &frudevice_core::now_rfc3339());
    let json = serialize_report(&report, pretty, compact)?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, json)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;

    if !quiet {
        match &scan.device {
            Some(device) => eprintln!("OK: read {} -> {}", device.display(), output.display()),
            None => eprintln!("OK: no EEPROM available -> {}", output.display()),
        }
    }
    Ok(())
}

fn cmd_serve(source: SourceArgs, quiet: bool) -> Result<(), CliError> {
    let config = resolve_config(&source)?;
    let mut publisher = FruPublisher::new(MemoryBus::new(), Scanner::new(config));
    publisher.start().context("Failed to publish FRU record")?;
    if !quiet {
        eprintln!("OK: FRU record published on {FRU_OBJECT_PATH}");
    }

    let stdin = io::stdin();
    run_service(&mut publisher, stdin.lock(), io::stdout().lock(), quiet)
}

fn run_service<O, R, W>(
    publisher: &mut FruPublisher<MemoryBus, O>,
    input: R,
    mut out: W,
    quiet: bool,
) -> Result<(), CliError>
where
    O: DeviceOpener,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        match command.to_ascii_lowercase().as_str() {
            "rescan" => {
                publisher
                    .call_method(MANAGER_INTERFACE, RESCAN_METHOD)
                    .context("Rescan failed")?;
                if !quiet {
                    eprintln!("OK: rescanned");
                }
            }
            "get" => print_published(publisher.bus(), &mut out)?,
            "quit" | "exit" => break,
            _ => {
                eprintln!("error: unknown command '{}'", command);
                eprintln!("hint: expected ReScan, Get or Quit");
            }
        }
    }
    Ok(())
}

fn print_published<W: Write>(bus: &MemoryBus, out: &mut W) -> Result<(), CliError> {
    let properties = bus
        .properties(FRU_OBJECT_PATH, FRU_INTERFACE)
        .ok_or_else(|| CliError::new("FRU interface is not published", None))?;
    for (name, value) in properties {
        writeln!(out, "{name}={value}").context("Failed to write to stdout")?;
    }
    out.flush().context("Failed to write to stdout")?;
    Ok(())
}

fn serialize_report(
    report: &frudevice_core::ScanReport,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

const CONFIG_HINT: &str = "expected a JSON object with device_paths, server_id_path, manufacturer";

fn config_error(err: ConfigError) -> CliError {
    CliError::new(err.to_string(), Some(CONFIG_HINT.to_string()))
}

fn resolve_config(source: &SourceArgs) -> Result<ScanConfig, CliError> {
    let mut config = match &source.config {
        Some(path) => ScanConfig::from_json_file(path).map_err(config_error)?,
        None => ScanConfig::default(),
    };

    if !source.devices.is_empty() {
        let mut device_paths = Vec::new();
        for device in &source.devices {
            device_paths.extend(resolve_device(device)?);
        }
        config.device_paths = device_paths;
    }
    if let Some(path) = &source.server_id_path {
        config.server_id_path = path.clone();
    }
    if let Some(manufacturer) = &source.manufacturer {
        config.manufacturer = manufacturer.clone();
    }
    Ok(config)
}

fn resolve_device(device: &str) -> Result<Vec<PathBuf>, CliError> {
    if !is_glob_pattern(device) {
        return Ok(vec![PathBuf::from(device)]);
    }

    let paths = glob(device).map_err(|err| {
        CliError::new(
            format!("invalid device pattern '{}'", device),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path),
            Err(err) => warn!(pattern = device, error = %err, "skipping unreadable match"),
        }
    }
    if matches.is_empty() {
        warn!(pattern = device, "device pattern matched nothing");
    }
    Ok(matches)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use frudevice_core::DEFAULT_MANUFACTURER;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn source_args(devices: &[&str]) -> SourceArgs {
        SourceArgs {
            config: None,
            devices: devices.iter().map(|d| d.to_string()).collect(),
            server_id_path: Some(PathBuf::from("/nonexistent/server_id")),
            manufacturer: None,
        }
    }

    #[test]
    fn device_globs_expand_in_sorted_order() {
        let temp = TempDir::new().expect("tempdir");
        for name in ["2-0055", "2-0050", "3-0050"] {
            let dir = temp.path().join(name);
            fs::create_dir(&dir).expect("mkdir");
            fs::write(dir.join("eeprom"), [0u8; 4]).expect("write");
        }
        let pattern = format!("{}/*-0050/eeprom", temp.path().display());
        let literal = temp.path().join("2-0055").join("eeprom");

        let devices = [literal.to_str().unwrap(), pattern.as_str()];
        let config = resolve_config(&source_args(&devices)).unwrap();
        assert_eq!(
            config.device_paths,
            vec![
                literal,
                temp.path().join("2-0050").join("eeprom"),
                temp.path().join("3-0050").join("eeprom"),
            ]
        );
        assert_eq!(config.manufacturer, DEFAULT_MANUFACTURER);
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let err = resolve_config(&source_args(&["/dev/[eeprom"])).unwrap_err();
        assert!(err.message.contains("invalid device pattern"));
        assert!(err.hint.is_some());
    }

    #[test]
    fn service_loop_handles_commands() {
        let temp = TempDir::new().expect("tempdir");
        let eeprom = temp.path().join("eeprom");
        let mut blob = vec![0u8; 176];
        blob[109..125].copy_from_slice(b"PARTA00000000000");
        fs::write(&eeprom, &blob).expect("write eeprom");

        let config = resolve_config(&source_args(&[eeprom.to_str().unwrap()])).unwrap();
        let mut publisher = FruPublisher::new(MemoryBus::new(), Scanner::new(config));
        publisher.start().unwrap();

        blob[109..125].copy_from_slice(b"PARTB00000000000");
        fs::write(&eeprom, &blob).expect("rewrite eeprom");

        let input = Cursor::new("get\nbogus\n\nReScan\nGET\nquit\nget\n");
        let mut out = Vec::new();
        run_service(&mut publisher, input, &mut out, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        let parts: Vec<_> = text
            .lines()
            .filter(|line| line.starts_with("PRODUCT_PART_NUMBER="))
            .collect();
        assert_eq!(
            parts,
            vec![
                "PRODUCT_PART_NUMBER=PARTA00000000000",
                "PRODUCT_PART_NUMBER=PARTB00000000000",
            ]
        );
    }
}
