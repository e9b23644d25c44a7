use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::postgres::{PgPool, PgPoolOptions};

use carebook_config::DatabaseConfig;
use carebook_core::hash_password;

#[derive(Parser, Debug)]
#[command(name = "carebook-cli")]
#[command(about = "Carebook CLI - Administrative tools for Carebook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a login account
    CreateUser {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Role stored on the account, e.g. doctor or patient
        #[arg(short = 'r', long, default_value = "doctor")]
        role: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = DatabaseConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateUser {
            email,
            password,
            role,
        } => handle_create_user(&pool, email, password, role).await,
    }
}

async fn handle_create_user(
    pool: &PgPool,
    email: Option<String>,
    password: Option<String>,
    role: String,
) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let role = normalize_role(&role)?;
    let id = create_user(pool, email.trim(), &password, &role).await?;

    println!("\n✅ User created successfully!");
    println!("   ID: {}", id);
    println!("   Email: {}", email.trim());
    println!("   Role: {}", role);
    Ok(())
}

/// Roles are matched verbatim by the API, so store them trimmed.
fn normalize_role(role: &str) -> anyhow::Result<String> {
    let role = role.trim();
    if role.is_empty() {
        bail!("Role must not be empty");
    }
    Ok(role.to_string())
}

async fn create_user(pool: &PgPool, email: &str, password: &str, role: &str) -> anyhow::Result<i32> {
    if email.is_empty() || password.is_empty() {
        bail!("Email and password are required");
    }

    let hashed_password = hash_password(password).map_err(|e| e.error)?;

    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (email, password, role)
         VALUES ($1, $2, $3)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(email)
    .bind(&hashed_password)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    match id {
        Some(id) => Ok(id),
        None => bail!("User with this email already exists"),
    }
}
