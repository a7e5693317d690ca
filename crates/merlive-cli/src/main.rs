//! `merlive` command line entry point

use anyhow::Context;
use clap::{value_parser, Arg, Command};
use merlive_cli::{run_render, AppConfig, StepOutcome};
use merlive_client::ApiClient;
use merlive_render::PlottersRenderer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("merlive")
        .version(merlive_cli::VERSION)
        .about("Visualize Merlive role and permission allocation")
        .long_about(
            "Without a subcommand, fetches the allocation graph and statistics and \
             writes allocation_graph.png, role_stats.png and summary_stats.png.",
        )
        .subcommand(
            Command::new("login")
                .about("Log in and print an access token")
                .arg(Arg::new("email").required(true).help("Account email or phone"))
                .arg(Arg::new("password").required(true).help("Account password")),
        )
        .subcommand(
            Command::new("assign-role")
                .about("Assign a role to a user")
                .arg(
                    Arg::new("user-id")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .help("User id"),
                )
                .arg(
                    Arg::new("role-id")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .help("Role id"),
                ),
        )
        .subcommand(
            Command::new("update-permissions")
                .about("Replace the permissions of a role")
                .arg(
                    Arg::new("role-id")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .help("Role id"),
                )
                .arg(
                    Arg::new("permission-ids")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(u64))
                        .help("Permission ids the role should have"),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

async fn login(client: &ApiClient, email: &str, password: &str) {
    match client.login(email, password).await {
        Ok(token) => {
            println!("Login successful!");
            println!("Token: {token}");
            println!("Put this token in merlive.toml under [api] token, or export MERLIVE_TOKEN.");
        }
        Err(e) => println!("Login failed: {}", e.reason()),
    }
}

async fn assign_role(client: &ApiClient, user_id: u64, role_id: u64) {
    match client.assign_role(user_id, role_id).await {
        Ok(data) => println!("Assigned role {role_id} to user {user_id}: {data}"),
        Err(e) => println!("Failed to assign role: {}", e.reason()),
    }
}

async fn update_permissions(client: &ApiClient, role_id: u64, permission_ids: &[u64]) {
    match client.update_permissions(role_id, permission_ids).await {
        Ok(data) => println!("Updated permissions of role {role_id}: {data}"),
        Err(e) => println!("Failed to update permissions: {}", e.reason()),
    }
}

async fn visualize(client: &ApiClient, config: &AppConfig) {
    if !client.has_token() {
        println!("No access token configured.");
        println!("Get one by running: merlive login <email> <password>");
        return;
    }

    println!("=== Merlive allocation visualization ===");
    let renderer = PlottersRenderer::new(config.output.clone());
    let report = run_render(client, &renderer).await;

    for (artifact, outcome) in report.steps() {
        match outcome {
            StepOutcome::Written(path) => println!("Saved {artifact} to {}", path.display()),
            StepOutcome::Failed(e) if e.is_no_data() => {
                println!("No valid data to display for {artifact}: {e}");
            }
            StepOutcome::Failed(e) => println!("Could not produce {artifact}: {e}"),
            StepOutcome::Skipped { because } => println!("Skipped {artifact}: {because} failed"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let matches = cli().get_matches();

    let config = AppConfig::load().context("failed to load configuration")?;
    let client = ApiClient::new(&config.api).context("failed to create API client")?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    match matches.subcommand() {
        Some(("login", args)) => {
            let email = args.get_one::<String>("email").map_or("", String::as_str);
            let password = args.get_one::<String>("password").map_or("", String::as_str);
            login(&client, email, password).await;
        }
        Some(("assign-role", args)) => {
            let user_id = args.get_one::<u64>("user-id").copied().unwrap_or_default();
            let role_id = args.get_one::<u64>("role-id").copied().unwrap_or_default();
            assign_role(&client, user_id, role_id).await;
        }
        Some(("update-permissions", args)) => {
            let role_id = args.get_one::<u64>("role-id").copied().unwrap_or_default();
            let permission_ids: Vec<u64> = args
                .get_many::<u64>("permission-ids")
                .map(|ids| ids.copied().collect())
                .unwrap_or_default();
            update_permissions(&client, role_id, &permission_ids).await;
        }
        _ => visualize(&client, &config).await,
    }

    Ok(())
}
