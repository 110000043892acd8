use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use dialoguer::Input;
use dotenvy::dotenv;
use sqlx::PgPool;
use stockpoint_auth::{JwtVerifier, create_access_token};
use stockpoint_cli::policy::render_policy;
use stockpoint_cli::seeder::{self, SeedConfig, UsersPerCompany};
use stockpoint_config::{AccessConfig, JwtConfig};
use stockpoint_db::{PgRoleDirectory, init_db_pool, provisioning};
use stockpoint_models::Role;
use stockpoint_rbac::{RoleAuthorizer, RolePolicy, route_path};

#[derive(Parser)]
#[command(name = "stockpoint-cli")]
#[command(about = "Stockpoint CLI - Administrative tools for Stockpoint access control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Who to check: a role name, or a provisioned subject whose role is looked up.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Role name, e.g. `warehouse_manager`
    #[arg(short = 'r', long)]
    role: Option<String>,

    /// Subject identifier of a provisioned user
    #[arg(short = 's', long)]
    subject: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a developer (platform) account
    ProvisionDeveloper {
        /// Subject identifier from the identity provider
        #[arg(short = 's', long)]
        subject: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,
    },
    /// Create a company (tenant)
    CreateCompany {
        /// Company name
        #[arg(short = 'n', long)]
        name: Option<String>,
    },
    /// Issue an identity token for a subject, signed with JWT_SECRET
    IssueToken {
        /// Subject identifier
        #[arg(short = 's', long)]
        subject: Option<String>,
    },
    /// Check whether a role or subject holds a permission
    CheckPermission {
        #[command(flatten)]
        target: Target,

        /// Permission token, e.g. `read`
        #[arg(short = 'a', long)]
        action: String,
    },
    /// Check whether a role or subject may navigate to a route
    CheckRoute {
        #[command(flatten)]
        target: Target,

        /// Route path, e.g. `/warehouse/boxes`
        #[arg(short = 'p', long)]
        path: String,
    },
    /// Print the role table in effect
    ShowPolicy,
    /// Seed the database with fake companies and users
    Seed {
        /// Number of companies to create
        #[arg(short = 'c', long, default_value = "5")]
        companies: usize,

        #[arg(long, default_value = "1")]
        general_managers: usize,

        #[arg(long, default_value = "2")]
        warehouse_managers: usize,

        #[arg(long, default_value = "4")]
        warehouse_salespeople: usize,

        #[arg(long, default_value = "4")]
        pos_salespeople: usize,

        #[arg(long, default_value = "3")]
        skaters: usize,

        #[arg(long, default_value = "20")]
        customers: usize,
    },
    /// Clear all seeded companies and users
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::ProvisionDeveloper { subject, name } => {
            handle_provision_developer(subject, name).await
        }
        Commands::CreateCompany { name } => handle_create_company(name).await,
        Commands::IssueToken { subject } => handle_issue_token(subject),
        Commands::CheckPermission { target, action } => {
            handle_check_permission(target, &action).await
        }
        Commands::CheckRoute { target, path } => handle_check_route(target, &path).await,
        Commands::ShowPolicy => handle_show_policy(),
        Commands::Seed {
            companies,
            general_managers,
            warehouse_managers,
            warehouse_salespeople,
            pos_salespeople,
            skaters,
            customers,
        } => {
            let config = SeedConfig::new(companies).with_users(UsersPerCompany {
                general_managers,
                warehouse_managers,
                warehouse_salespeople,
                pos_salespeople,
                skaters,
                customers,
            });
            handle_seed(config).await
        }
        Commands::ClearSeed => handle_clear_seed().await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

async fn handle_provision_developer(
    subject: Option<String>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let subject = prompt(subject, "Subject")?;
    let name = match name {
        Some(name) => Some(name),
        None => Some(
            Input::<String>::new()
                .with_prompt("Display name")
                .allow_empty(true)
                .interact_text()
                .context("Failed to read display name")?,
        )
        .filter(|n| !n.trim().is_empty()),
    };

    let pool = connect().await?;
    let user = provisioning::insert_platform_user(
        &pool,
        subject.trim(),
        name.as_deref(),
        Role::Developer,
    )
    .await
    .context("Error provisioning developer")?;

    println!("\n✅ Developer provisioned successfully!");
    println!("   Subject: {}", user.subject_id);
    if let Some(name) = user.display_name {
        println!("   Name: {}", name);
    }
    Ok(())
}

async fn handle_create_company(name: Option<String>) -> anyhow::Result<()> {
    let name = prompt(name, "Company name")?;

    let pool = connect().await?;
    let company = provisioning::insert_company(&pool, name.trim())
        .await
        .context("Error creating company")?;

    println!("\n✅ Company created successfully!");
    println!("   ID: {}", company.id);
    println!("   Name: {}", company.name);
    Ok(())
}

fn handle_issue_token(subject: Option<String>) -> anyhow::Result<()> {
    let subject = prompt(subject, "Subject")?;
    let jwt_config = JwtConfig::from_env();

    let token = create_access_token(subject.trim(), &jwt_config)
        .map_err(|e| anyhow!("Error issuing token: {}", e))?;

    println!("{}", token);
    Ok(())
}

/// Resolves the target to a role name. Subjects go through the same
/// authorizer the server uses.
async fn resolve_role(target: Target, policy: &RolePolicy) -> anyhow::Result<String> {
    if let Some(role) = target.role {
        return Ok(role);
    }
    let subject = target
        .subject
        .ok_or_else(|| anyhow!("Either --role or --subject is required"))?;

    let jwt_config = JwtConfig::from_env();
    let pool = connect().await?;
    let authorizer = RoleAuthorizer::new(
        Arc::new(policy.clone()),
        Arc::new(JwtVerifier::new(jwt_config.clone())),
        Arc::new(PgRoleDirectory::new(pool)),
    );

    let token = create_access_token(&subject, &jwt_config)
        .map_err(|e| anyhow!("Error issuing token: {}", e))?;
    let identity = authorizer
        .resolve(&token)
        .await
        .with_context(|| format!("Could not resolve {}", subject))?;

    println!("   {} → {} ({})", subject, identity.role, identity.scope.as_str());
    Ok(identity.role)
}

async fn handle_check_permission(target: Target, action: &str) -> anyhow::Result<()> {
    let access_config = AccessConfig::from_env();
    let policy = RolePolicy::from_path_or_canonical(access_config.policy_path.as_deref())?;
    let role = resolve_role(target, &policy).await?;

    if policy.has_permission(&role, action) {
        println!("✅ {} may {}", role, action);
    } else {
        println!("⛔ {} may not {}", role, action);
    }
    Ok(())
}

async fn handle_check_route(target: Target, path: &str) -> anyhow::Result<()> {
    let path = &route_path::normalize(path).map_err(|e| anyhow!("Invalid route: {}", e))?;

    let access_config = AccessConfig::from_env();
    let policy = RolePolicy::from_path_or_canonical(access_config.policy_path.as_deref())?;
    let role = resolve_role(target, &policy).await?;

    if policy.can_access_route(&role, path) {
        println!("✅ {} may open {}", role, path);
    } else if policy.covers(path) {
        println!("⛔ {} may not open {}", role, path);
    } else {
        println!("ℹ️  {} is not a protected route", path);
    }
    Ok(())
}

fn handle_show_policy() -> anyhow::Result<()> {
    let access_config = AccessConfig::from_env();
    let policy = RolePolicy::from_path_or_canonical(access_config.policy_path.as_deref())?;

    match &access_config.policy_path {
        Some(path) => println!("📜 Policy from {}\n", path.display()),
        None => println!("📜 Built-in policy\n"),
    }
    print!("{}", render_policy(&policy));
    Ok(())
}

async fn handle_seed(config: SeedConfig) -> anyhow::Result<()> {
    let pool = connect().await?;
    seeder::seed_all(&pool, config)
        .await
        .map_err(|e| anyhow!("Error seeding database: {}", e))
}

async fn handle_clear_seed() -> anyhow::Result<()> {
    let pool = connect().await?;
    seeder::clear_all(&pool)
        .await
        .map_err(|e| anyhow!("Error clearing seeded data: {}", e))
}
