//! Simple MJPEG relay example
//!
//! Run with: cargo run --example simple_relay UPSTREAM_URL [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example simple_relay http://10.0.0.5:81/stream
//!   cargo run --example simple_relay http://10.0.0.5:81/stream 0.0.0.0:8080
//!   cargo run --example simple_relay http://10.0.0.5:81/stream localhost:3001
//!
//! ## Watching the relayed stream
//!
//! Browser:  open http://localhost:3001/relay-stream
//! HTML:     <img src="http://localhost:3001/relay-stream">
//! ffplay:   ffplay http://localhost:3001/relay-stream
//!
//! ## Checking relay health
//!
//!   curl http://localhost:3001/status
//!
//! ## Features
//!
//! - Reconnect-forever: the relay keeps retrying the camera through
//!   power cycles and network drops
//! - Viewer isolation: a slow or disconnected viewer is evicted without
//!   disturbing the stream for anyone else

use std::net::SocketAddr;

use mjpeg_relay::{Relay, RelayConfig, ServerConfig};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:3001
/// - "localhost:8080" -> 127.0.0.1:8080
/// - "0.0.0.0:8080" -> 0.0.0.0:8080
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 3001;

    // Replace "localhost" with "127.0.0.1"
    let normalized = arg.replace("localhost", "127.0.0.1");

    // Try parsing as SocketAddr first (includes port)
    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    // Try parsing as IP address without port
    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: simple_relay UPSTREAM_URL [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  UPSTREAM_URL    Camera stream URL, e.g. http://10.0.0.5:81/stream");
    eprintln!("  BIND_ADDR       Address to bind to (default: 0.0.0.0:3001)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  simple_relay http://10.0.0.5:81/stream");
    eprintln!("  simple_relay http://10.0.0.5:81/stream 0.0.0.0:8080");
    eprintln!("  simple_relay http://10.0.0.5:81/stream localhost:3001");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let upstream_url = match args.get(1) {
        Some(url) => url.clone(),
        None => {
            eprintln!("Error: missing UPSTREAM_URL");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let bind_addr = match args.get(2) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:3001".parse().unwrap(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mjpeg_relay=debug".parse()?)
                .add_directive("simple_relay=debug".parse()?),
        )
        .init();

    let mut config = RelayConfig::new(&upstream_url);
    config.server = ServerConfig::default().bind(bind_addr);

    println!("Starting MJPEG relay on {}", bind_addr);
    println!();
    println!("Camera:  {}", upstream_url);
    println!("Viewers: http://{}/relay-stream", bind_addr);
    println!("Status:  http://{}/status", bind_addr);
    println!();

    let relay = Relay::new(config)?;

    // Run with Ctrl+C handling
    tokio::select! {
        result = relay.run() => {
            if let Err(e) = result {
                eprintln!("Relay error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    Ok(())
}
