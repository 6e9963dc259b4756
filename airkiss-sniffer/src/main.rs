//! AirKiss credential sniffer CLI.
//!
//! Opens a monitor-mode interface (or an offline capture file), feeds every
//! 802.11 data frame into per-station AirKiss decoders, and prints the
//! recovered credentials as soon as one station completes a session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use airkiss_sniffer::{FrameSource, SniffOutcome, Sniffer};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Passive AirKiss credential sniffer",
    long_about = "Recovers Wi-Fi credentials broadcast by an AirKiss provisioning sender by \
                  observing 802.11 frame lengths. Needs a monitor-mode interface tuned to the \
                  sender's channel, or a capture file recorded from one."
)]
struct CliArgs {
    /// Wireless interface to capture from (must be in monitor mode).
    #[arg(
        short = 'i',
        long = "interface",
        required_unless_present = "read_file",
        conflicts_with = "read_file"
    )]
    interface: Option<String>,

    /// Read frames from a pcap capture file instead of a live interface.
    #[arg(short = 'r', long = "read-file")]
    read_file: Option<PathBuf>,

    /// Seconds to wait for a complete credential before giving up.
    #[arg(short = 't', long, default_value_t = 60)]
    timeout: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = CliArgs::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Runs one sniff session.
///
/// # Returns
/// `true` when credentials were decoded, `false` on timeout or an
/// exhausted capture file.
fn run(args: CliArgs) -> Result<bool> {
    let source = match (&args.interface, &args.read_file) {
        (_, Some(path)) => FrameSource::open_file(path)?,
        (Some(interface), None) => FrameSource::open_interface(interface)?,
        // clap enforces that one of the two is present
        (None, None) => unreachable!("clap requires an interface or a capture file"),
    };

    let mut sniffer = Sniffer::new(source, Duration::from_secs(args.timeout));
    match sniffer.run()? {
        SniffOutcome::Decoded(credentials) => {
            println!("SSID:        {}", credentials.ssid_lossy());
            println!("SSID CRC8:   0x{:02X}", credentials.ssid_crc8());
            println!("Random byte: 0x{:02X}", credentials.random_byte());
            println!("Password:    {}", credentials.password_lossy());
            Ok(true)
        }
        SniffOutcome::TimedOut => {
            println!(
                "Timeout: no complete AirKiss session within {} seconds ({} stations seen)",
                args.timeout,
                sniffer.session_count()
            );
            Ok(false)
        }
        SniffOutcome::Exhausted => {
            println!(
                "Capture ended without a complete AirKiss session ({} stations seen)",
                sniffer.session_count()
            );
            Ok(false)
        }
    }
}
