//! Command-line interface for the booking-server binary.

use clap::Parser;
use std::path::PathBuf;

/// Event booking REST API server
#[derive(Parser, Debug)]
#[command(
    name = "booking-server",
    version,
    about = "Event booking REST API",
    after_help = "EXAMPLES:\n    \
                  booking-server                        # Start with booking.toml\n    \
                  booking-server --config prod.toml     # Use a custom config file\n    \
                  JWT_SECRET=... booking-server -v      # Verbose logging"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "booking.toml", env = "BOOKING_CONFIG")]
    pub config: PathBuf,

    /// Enable debug logging (overrides server.log_level)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
