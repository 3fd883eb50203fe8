//! Lightify CLI Client
//!
//! Command-line interface for controlling lights through a bridge.

use std::process;

use clap::{Parser, Subcommand};
use lightify::{BridgeConnection, Config, GroupId, LightId, Rgb};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Lightify CLI
#[derive(Parser, Debug)]
#[command(name = "lightify-cli")]
#[command(about = "Control lights and groups through a Lightify bridge")]
#[command(version)]
struct Args {
    /// Bridge address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:4000")]
    bridge: String,

    /// Reply timeout in milliseconds (0 = wait forever)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all lights
    Lights,

    /// List all groups
    Groups,

    /// Show one light
    Light {
        /// Light id (16 hex characters)
        id: LightId,
    },

    /// Show one group
    Group {
        /// Group id
        id: GroupId,
    },

    /// Switch a light on
    On { id: LightId },

    /// Switch a light off
    Off { id: LightId },

    /// Set brightness
    Bri {
        id: LightId,
        value: u8,

        /// Transition time
        #[arg(long, default_value = "0")]
        time: u16,
    },

    /// Set color temperature (kelvin)
    Temp {
        id: LightId,
        kelvin: u16,

        #[arg(long, default_value = "0")]
        time: u16,
    },

    /// Set RGB color
    Color {
        id: LightId,
        r: u8,
        g: u8,
        b: u8,

        /// Extra byte sent with the color
        #[arg(long, default_value = "255")]
        x: u8,

        #[arg(long, default_value = "0")]
        time: u16,
    },
}

#[derive(Serialize)]
struct Ack {
    ok: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,lightify=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .bridge_addr(&args.bridge)
        .response_timeout_ms(args.timeout_ms)
        .build();

    let conn = match BridgeConnection::open(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    };

    let output = run(&conn, args.command);
    conn.close();

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    }
}

fn run(conn: &BridgeConnection, command: Commands) -> lightify::Result<String> {
    match command {
        Commands::Lights => to_json(&conn.list_lights()?),
        Commands::Groups => to_json(&conn.list_groups()?),
        Commands::Light { id } => to_json(&conn.light_details(id)?),
        Commands::Group { id } => to_json(&conn.group_details(id)?),
        Commands::On { id } => {
            conn.set_on_off(id, true)?;
            to_json(&Ack { ok: true })
        }
        Commands::Off { id } => {
            conn.set_on_off(id, false)?;
            to_json(&Ack { ok: true })
        }
        Commands::Bri { id, value, time } => {
            conn.set_brightness(id, value, time)?;
            to_json(&Ack { ok: true })
        }
        Commands::Temp { id, kelvin, time } => {
            conn.set_temperature(id, kelvin, time)?;
            to_json(&Ack { ok: true })
        }
        Commands::Color { id, r, g, b, x, time } => {
            conn.set_color_with_x(id, Rgb::new(r, g, b), x, time)?;
            to_json(&Ack { ok: true })
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> lightify::Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| lightify::LightifyError::Serialization(e.to_string()))
}
