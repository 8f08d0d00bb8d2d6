use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use edudesk_cli::seeder::{self, SeedConfig};
use edudesk_config::DatabaseConfig;
use edudesk_core::{Role, hash_password};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "edudesk-cli")]
#[command(about = "EduDesk CLI - Administrative tools for EduDesk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a super administrator account
    CreateSuperAdmin {
        /// First name of the super admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the super admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake teachers, subjects, students and attendance
    Seed {
        /// Number of students per class section
        #[arg(short = 's', long, default_value = "20")]
        students: usize,

        /// Number of teachers
        #[arg(short = 't', long, default_value = "12")]
        teachers: usize,

        /// Weekdays of attendance to generate
        #[arg(long, default_value = "10")]
        attendance_days: usize,
    },
    /// Sync the module catalogue and role grants into the database
    SyncModules,
    /// Clear all seeded data (keeps real accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = edudesk_db::init_db_pool(&DatabaseConfig::from_env()).await?;

    match cli.command {
        Commands::CreateSuperAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_super_admin(&pool, first_name, last_name, email, password).await,
        Commands::Seed {
            students,
            teachers,
            attendance_days,
        } => {
            let config = SeedConfig::default()
                .with_students_per_section(students)
                .with_teachers(teachers)
                .with_attendance_days(attendance_days);
            seeder::seed_all(&pool, &config)
                .await
                .context("Error seeding database")?;
            Ok(())
        }
        Commands::SyncModules => {
            let report = edudesk_db::sync_modules(&pool)
                .await
                .context("Error syncing modules")?;
            println!(
                "✅ Synced {} modules and {} role grants ({} stale rows removed)",
                report.modules, report.role_modules, report.removed
            );
            Ok(())
        }
        Commands::ClearSeed => {
            let removed = seeder::clear_all(&pool)
                .await
                .context("Error clearing seeded data")?;
            println!("✅ Removed {} seeded rows", removed);
            Ok(())
        }
    }
}

async fn handle_create_super_admin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let first_name = match first_name {
        Some(value) => value,
        None => Input::new().with_prompt("First name").interact_text()?,
    };
    let last_name = match last_name {
        Some(value) => value,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };
    let email: String = match email {
        Some(value) => value,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };
    let password = match password {
        Some(value) => value,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let email = email.trim().to_lowercase();
    create_super_admin(pool, &first_name, &last_name, &email, &password)
        .await
        .context("Error creating super admin")?;

    println!("\n✅ Super admin created successfully!");
    println!("   Email: {}", email);
    println!("   Name: {} {}", first_name, last_name);
    Ok(())
}

async fn create_super_admin(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let mut tx = pool.begin().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(&mut *tx)
        .await?;
    if exists {
        anyhow::bail!("A user with email {} already exists", email);
    }

    let hashed = hash_password(password).map_err(|e| e.error)?;
    let id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO users (first_name, last_name, email, password, role)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id"#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(&hashed)
    .bind(Role::SuperAdmin)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}
