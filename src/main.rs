use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

use domainmap::config::MapConfig;
use domainmap::search::{Cart, ProxyClient};
use domainmap::settings::{seconds, Settings};
use domainmap::{locations, map, server, Error};

#[derive(Parser)]
#[command(name = "domainmap")]
#[command(version)]
#[command(about = "Domain search storefront over a registrar proxy, with an animated network map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animated world map with simulated network pings
    Map {
        /// Animation speed (seconds per frame)
        #[arg(short, long, default_value = "0.03")]
        time: f32,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON file with locations (city, lat, lng, ip)
        #[arg(short, long)]
        locations: Option<PathBuf>,

        /// Maximum concurrent pings
        #[arg(short = 'm', long)]
        max_active: Option<usize>,

        /// Seconds between spawn attempts
        #[arg(short = 'i', long)]
        spawn_interval: Option<f32>,

        /// GeoJSON world map to fetch in the background
        #[arg(short, long)]
        geojson: Option<String>,

        /// Only use the built-in outlines
        #[arg(long)]
        offline: bool,
    },

    /// Run the registrar proxy server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check a name against every supported TLD
    Search {
        /// Search term; any extension is ignored
        term: String,

        /// Proxy base URL
        #[arg(long)]
        proxy: Option<String>,
    },

    /// Register an available domain
    Register {
        /// Full domain name, e.g. example.com
        domain: String,

        /// Add WHOIS privacy
        #[arg(long)]
        privacy: bool,

        /// Add a RapidSSL certificate
        #[arg(long)]
        ssl: bool,

        /// Proxy base URL
        #[arg(long)]
        proxy: Option<String>,
    },

    /// List registrar TLD pricing
    Tlds {
        /// Proxy base URL
        #[arg(long)]
        proxy: Option<String>,
    },
}

fn init_logging() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The map owns the screen; only log there when explicitly asked to
    let is_map = matches!(cli.command, Commands::Map { .. });
    if !is_map || std::env::var_os("RUST_LOG").is_some() {
        init_logging();
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Error> {
    let settings = Settings::load();

    match command {
        Commands::Map {
            time,
            seed,
            locations: locations_file,
            max_active,
            spawn_interval,
            geojson,
            offline,
        } => {
            let defaults = settings.map_config();
            let config = MapConfig {
                time_step: time.clamp(0.005, 1.0),
                seed,
                max_active: max_active.unwrap_or(defaults.max_active),
                spawn_interval: match spawn_interval {
                    None => defaults.spawn_interval,
                    Some(s) => seconds(s).filter(|d| !d.is_zero()).unwrap_or_else(|| {
                        warn!("Invalid --spawn-interval {s}, using {:?}", defaults.spawn_interval);
                        defaults.spawn_interval
                    }),
                },
                geojson_url: if offline { None } else { geojson.or(defaults.geojson_url.clone()) },
                locations: locations_file.or(defaults.locations.clone()),
                ..defaults
            };

            let points = match &config.locations {
                Some(path) => locations::load(path)?,
                None => locations::builtin(),
            };
            map::run(&config, points)
        }

        Commands::Serve { port } => {
            let mut config = settings.server_config();
            if let Some(port) = port {
                config.port = port;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::start_server(config))?;
            Ok(())
        }

        Commands::Search { term, proxy } => {
            let client = ProxyClient::new(proxy.unwrap_or_else(|| settings.proxy_url()));
            let results = client.search(&term)?;
            if results.is_empty() {
                return Ok(());
            }

            println!("AVAILABLE_TARGETS:");
            for result in &results {
                if result.available {
                    let premium = if result.premium { " (premium)" } else { "" };
                    println!("  {:<32} [AVAILABLE] ${}{premium}", result.domain_name, result.price_label());
                } else {
                    println!("  {:<32} [TAKEN]", result.domain_name);
                }
            }
            Ok(())
        }

        Commands::Register {
            domain,
            privacy,
            ssl,
            proxy,
        } => {
            let client = ProxyClient::new(proxy.unwrap_or_else(|| settings.proxy_url()));
            let found = client
                .check(std::slice::from_ref(&domain))?
                .into_iter()
                .find(|r| r.domain_name.eq_ignore_ascii_case(&domain));

            let mut cart = Cart::new();
            let added = found.map(|r| cart.add(r)).unwrap_or(false);
            if !added {
                println!("{domain} is not available");
                return Ok(());
            }
            cart.whois_privacy = privacy;
            cart.ssl = ssl;

            if let Some(response) = client.checkout(&mut cart)? {
                println!("Registration successful: {response}");
            }
            Ok(())
        }

        Commands::Tlds { proxy } => {
            let client = ProxyClient::new(proxy.unwrap_or_else(|| settings.proxy_url()));
            let tlds = client.tlds()?;
            println!("{}", serde_json::to_string_pretty(&tlds)?);
            Ok(())
        }
    }
}
