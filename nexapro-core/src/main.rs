use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use nexapro_core::domain::{Feature, Params};
use nexapro_core::router::RouteTarget;
use nexapro_core::session::Locale;
use nexapro_core::ui::{Navigator, Notice, NoticeLevel, Notifier, Ui};
use nexapro_core::{AppContext, Config};
use std::io::{BufRead, Write};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nexapro", about = "NexaPro property management client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from NEXAPRO_PASSWORD or prompted when omitted
        #[arg(short, long, env = "NEXAPRO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show session state
    Status,
    /// Show the current profile and its features
    Profile,
    /// List a resource, e.g. `list units -p page=2`
    List {
        resource: String,
        /// Query parameter as key=value
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Run a navigation through the route guard
    Navigate { path: String },
    /// Show or set the UI locale
    Locale { locale: Option<String> },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

/// Notices and navigations on the terminal; confirmations read stdin
struct TerminalUi;

impl Notifier for TerminalUi {
    fn notify(&self, notice: Notice) {
        let prefix = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{}] {}", prefix, notice.message);
    }

    fn confirm(&self, message: &str) -> bool {
        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

impl Navigator for TerminalUi {
    fn navigate(&self, target: RouteTarget) {
        eprintln!("-> {}", target);
    }
}

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password")?;
    Ok(password.trim_end().to_string())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    nexapro_core::telemetry::init(&config.telemetry);

    let cli = Cli::parse();
    let terminal = Arc::new(TerminalUi);
    let ui = Ui::new(terminal.clone(), terminal);
    let ctx = AppContext::init(config, ui).await?;

    let outcome = run(&ctx, cli.command).await;
    ctx.teardown().await;
    outcome
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            if let Err(e) = ctx.login(&username, &password).await {
                let message = ctx
                    .stores()
                    .auth
                    .error()
                    .await
                    .unwrap_or_else(|| e.to_string());
                return Err(anyhow!(message));
            }
            println!("Logged in as {}", username);
        }
        Command::Logout => {
            ctx.logout().await?;
            println!("Logged out");
        }
        Command::Status => {
            let authenticated = ctx.stores().auth.init_auth().await;
            println!("API:           {}", ctx.config().api_base_url);
            println!("Authenticated: {}", authenticated);
            println!("Locale:        {}", ctx.tokens().locale().await);
        }
        Command::Profile => {
            let profile = ctx.stores().profiles.fetch_current_profile().await?;
            print_json(&profile)?;

            let gate = ctx.gate().await;
            if let Some(plan) = gate.plan() {
                println!(
                    "Plan: {} ({} days remaining)",
                    plan.name,
                    gate.days_remaining()
                );
            }
            if gate.is_expired() {
                println!("Subscription expired");
            }
            for feature in Feature::ALL {
                let mark = if gate.has_feature(feature) {
                    "yes"
                } else {
                    "no"
                };
                println!("  {:<22} {}", feature.label(), mark);
            }
        }
        Command::List { resource, params } => {
            let store = ctx
                .stores()
                .list(&resource)
                .ok_or_else(|| anyhow!("Unknown resource: {}", resource))?;
            let params: Params = params.into_iter().collect();
            if let Err(e) = store.fetch_list(params).await {
                ctx.gate().await.handle_api_error(&e);
                return Err(e.into());
            }
            print_json(&store.items().await)?;
        }
        Command::Navigate { path } => {
            let route = ctx.router().push(RouteTarget::path(path)).await?;
            println!("{} ({})", route.name, route.path);
        }
        Command::Locale { locale } => match locale {
            Some(raw) => {
                let locale: Locale = raw.parse().map_err(|e: String| anyhow!(e))?;
                ctx.tokens().set_locale(locale).await?;
                println!("Locale set to {} ({})", locale, locale.label());
            }
            None => {
                let locale = ctx.tokens().locale().await;
                println!("{} ({})", locale, locale.label());
            }
        },
    }
    Ok(())
}
