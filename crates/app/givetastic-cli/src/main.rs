// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use givetastic_core::access::code::normalize;
use givetastic_core::access::{AccessCodeRegistry, SeedCounts};
use givetastic_core::auth::flow::{AuthFlow, EntryMode, EntryRequest};
use givetastic_core::auth::session::Session;
use givetastic_core::config::StoreConfig;
use givetastic_core::models::CodeKind;

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    let args = Cli::parse();
    logging::init(&args.log_level)?;

    if let Commands::Version = args.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(execute(args))
}

async fn execute(args: Cli) -> Result<()> {
    let config = StoreConfig::from_vars(args.store, args.database_url)?;
    let stores = config.connect().await?;
    let registry = AccessCodeRegistry::new(stores.access);

    match args.command {
        Commands::Version => {}
        Commands::Seed {
            team,
            coach,
            company,
        } => {
            let report = registry
                .seed(SeedCounts {
                    team,
                    coach,
                    company,
                })
                .await?;
            for kind in CodeKind::ALL {
                let codes = report.codes(kind);
                if !codes.is_empty() {
                    println!("{kind}: {}", codes.join(" "));
                }
            }
            println!("seeded {} codes", report.total());
        }
        Commands::Issue { kind } => {
            let code = registry.issue(kind).await?;
            println!("{code}");
        }
        Commands::Validate { kind, code } => {
            let code = normalize(&code);
            if !registry.validate(kind, &code).await {
                return Err(Error::Custom(format!("{code} is not a valid {kind} code")));
            }
            println!("{code} is a valid {kind} code");
        }
        Commands::Revoke { kind, code } => {
            let code = normalize(&code);
            if !registry.revoke(kind, &code).await? {
                return Err(Error::Custom(format!("no {kind} code {code}")));
            }
            println!("revoked {kind} code {code}");
        }
        Commands::Login {
            role,
            code,
            name,
            email,
            password,
            sign_in,
        } => {
            let flow = AuthFlow::new(registry, stores.identity);
            let request = EntryRequest {
                mode: if sign_in {
                    EntryMode::SignIn
                } else {
                    EntryMode::SignUp
                },
                role,
                code,
                name,
                email,
                password,
            };

            let mut session = Session::new();
            let landing = flow.submit(&mut session, &request).await?;
            if let Some(user) = session.current_user() {
                println!(
                    "logged in as {} ({}) with {} {}",
                    user.name(),
                    user.role(),
                    user.role().code_label(),
                    user.access_code()
                );
            }
            println!("landing: {landing}");
        }
    }

    Ok(())
}
