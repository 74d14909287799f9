use std::io::{self, BufRead, Write};

use tournament_console::{
    AppConfig, Env, GuardDecision, Outcome, create_console,
    routes::{HOME, LOGIN},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The interactive shell around the session core: it wires configuration,
/// logging, durable storage, gateway, session and guard together, then reads
/// commands from stdin. All decisions live in the library; this binary only
/// translates commands into calls and prints the results.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to a sensible local default.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tournament_console=debug".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Console starting in {:?} mode", config.env);
    tracing::info!(api = %config.api_base_url, "backend configured");

    // 4. Session Core Assembly
    let (mut account, guard) = create_console(&config);

    // 5. Command Loop
    // The current page starts at home; every transition goes through the
    // guard, so the shell always lands where a browser would.
    let mut current_page: String = HOME.to_string();
    current_page = settle(&guard, &mut account, &current_page);

    println!("tournament console — commands: open <path> | login <email> <password>");
    println!("  passwd <current> <new> <confirm> | refresh | logout | whoami | routes | quit");
    print_prompt(&current_page);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            ["quit"] | ["exit"] => break,

            ["open", path] => {
                current_page = settle(&guard, &mut account, path);
            }

            ["login", email, password] => match account.login(email, password).await {
                Ok(destination) => {
                    println!("signed in");
                    current_page = settle(&guard, &mut account, destination);
                }
                Err(e) => println!("login failed: {e}"),
            },

            ["passwd", current, new, confirm] => {
                match account.change_password(current, new, confirm).await {
                    Ok(Outcome::Done) => println!("password changed"),
                    Ok(Outcome::RedirectTo(destination)) => {
                        println!("password changed");
                        current_page = settle(&guard, &mut account, destination);
                    }
                    Err(e) => println!("password change failed: {e}"),
                }
            }

            ["refresh"] => match account.refresh_profile().await {
                Ok(Outcome::Done) => println!("profile refreshed"),
                Ok(Outcome::RedirectTo(destination)) => {
                    current_page = settle(&guard, &mut account, destination);
                }
                Err(e) => println!("refresh failed: {e}"),
            },

            ["logout"] => {
                let destination = account.logout().await;
                println!("signed out");
                current_page = settle(&guard, &mut account, destination);
            }

            ["whoami"] => match account.session().current_user() {
                Some(user) => println!(
                    "{} (admin: {}, active: {}, must change password: {})",
                    user.email, user.is_admin, user.is_active, user.must_change_password
                ),
                None => println!("anonymous"),
            },

            ["routes"] => {
                for entry in guard.table().entries() {
                    println!(
                        "  {:<18} {:<16} {}",
                        entry.path,
                        entry.name,
                        if entry.requires_auth { "protected" } else { "public" }
                    );
                }
            }

            [] => {}
            _ => println!("unrecognized command"),
        }

        print_prompt(&current_page);
    }
}

/// settle
///
/// Runs the guard for a target path and follows redirects until a page is
/// allowed. Each redirect destination is itself re-checked, exactly like a
/// browser re-entering the navigation guard; the chain is bounded because
/// every redirect lands on a page its state allows.
fn settle(
    guard: &tournament_console::RouteGuard,
    account: &mut tournament_console::AccountService,
    target: &str,
) -> String {
    let mut page = target.to_string();
    for _ in 0..3 {
        match guard.check(account.session_mut(), &page) {
            GuardDecision::Allow => return page,
            GuardDecision::Redirect(destination) => {
                println!("redirected: {page} -> {destination}");
                page = destination.to_string();
            }
        }
    }
    // Unreachable with the standard table; fall back to the login page.
    LOGIN.to_string()
}

fn print_prompt(current_page: &str) {
    print!("[{current_page}] > ");
    let _ = io::stdout().flush();
}
