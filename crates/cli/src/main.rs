//! MarchéNet CLI - a terminal front end for the storefront library.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is kept in MARCHENET_TOKEN_FILE)
//! mn-cli auth login -e awa@example.sn -p '...'
//!
//! # List the subscription packs
//! mn-cli packs
//!
//! # Open a store on the free pack
//! mn-cli vendor onboard --vendor-name "Awa Diop" --shop-name "Chez Awa" \
//!     --address "Dakar" --country SN --phone 771234567 \
//!     --email awa@example.sn --pack "Pack Gratuit"
//!
//! # Would the route guard let me in?
//! mn-cli route /tableau-de-bord
//! ```
//!
//! # Commands
//!
//! - `auth` - `login`, `register`, `logout`, `whoami`
//! - `packs` - Show the pack catalog
//! - `vendor` - `onboard`, `status`, `change-pack`
//! - `route` - Evaluate the route guard for a path
//! - `search` - Product name suggestions

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::{CommandError, Context};

#[derive(Parser)]
#[command(name = "mn-cli")]
#[command(author, version, about = "MarchéNet command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign up, sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Show the subscription packs
    Packs,
    /// Manage your store
    Vendor {
        #[command(subcommand)]
        action: VendorAction,
    },
    /// Evaluate the route guard for a storefront path
    Route {
        /// Path, e.g. `/tableau-de-bord`
        path: String,
    },
    /// Suggest product names
    Search {
        query: String,

        /// Restrict to one country (name or ISO code)
        #[arg(short, long)]
        country: Option<String>,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Local phone number, without the dial code
        #[arg(long)]
        phone: String,

        /// Country name or ISO code (`SN`, `ML`, `CI`, `GN`, `BF`, `TG`, `BJ`)
        #[arg(long, default_value = "SN")]
        country: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the current session
    Whoami,
}

#[derive(Subcommand)]
enum VendorAction {
    /// Open (or reactivate) a store
    Onboard {
        #[arg(long)]
        vendor_name: Option<String>,

        #[arg(long)]
        shop_name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Country name or ISO code
        #[arg(long)]
        country: Option<String>,

        /// Local phone number, without the dial code
        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Pack to subscribe to
        #[arg(long, default_value = "Pack Gratuit")]
        pack: String,
    },
    /// Show the store, its pack and quota
    Status,
    /// Switch pack
    ChangePack {
        /// Pack name, e.g. "Pack Pro"
        pack: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    // The pack catalog is static; no backend needed
    if matches!(cli.command, Commands::Packs) {
        commands::packs::list();
        return Ok(());
    }

    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Packs => {}
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&ctx, &email, password).await?;
            }
            AuthAction::Register {
                email,
                password,
                first_name,
                last_name,
                phone,
                country,
            } => {
                let form = commands::auth::registration(
                    &email, password, first_name, last_name, &phone, &country,
                )?;
                commands::auth::register(&ctx, &form).await?;
            }
            AuthAction::Logout => commands::auth::logout(&ctx).await?,
            AuthAction::Whoami => commands::auth::whoami(&ctx).await?,
        },
        Commands::Vendor { action } => match action {
            VendorAction::Onboard {
                vendor_name,
                shop_name,
                address,
                country,
                phone,
                email,
                pack,
            } => {
                let answers = commands::vendor::ProfileAnswers {
                    vendor_name,
                    shop_name,
                    address,
                    country,
                    phone,
                    email,
                };
                commands::vendor::onboard(&ctx, answers, &pack).await?;
            }
            VendorAction::Status => commands::vendor::status(&ctx).await?,
            VendorAction::ChangePack { pack } => commands::vendor::change_pack(&ctx, &pack).await?,
        },
        Commands::Route { path } => commands::route::check(&ctx, &path).await,
        Commands::Search { query, country } => {
            commands::search::suggest(&ctx, &query, country.as_deref()).await?;
        }
    }
    Ok(())
}
