use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use eventreg_client::{ApiClient, ClientConfig};
use eventreg_core::{my_dashboard, Credentials, Envelope, Record, Resource, SignUp, UploadForm};
use serde::Serialize;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "eventreg", version, about = "Event registration API client")]
struct Cli {
    /// Backend URL (overrides EVENTREG_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Session storage file (overrides EVENTREG_SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "EVENTREG_PASSWORD")]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "EVENTREG_PASSWORD")]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long, default_value = "")]
        no_telp: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Me,
    /// List a resource
    List { resource: Resource },
    /// Fetch one record
    Get { resource: Resource, id: String },
    /// Create a record from a JSON object
    Create { resource: Resource, json: String },
    /// Apply a partial JSON update
    Update {
        resource: Resource,
        id: String,
        json: String,
    },
    /// Delete a record
    Delete { resource: Resource, id: String },
    /// Upload a file as a document or image
    Upload {
        resource: Resource,
        path: PathBuf,
        /// Multipart field name
        #[arg(long, default_value = "file")]
        field: String,
    },
    /// Events the logged-in user registered for, with their schedules
    Dashboard,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json")) {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    let client = ApiClient::from_config(&config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let envelope = client.login(&Credentials { email, password }).await?;
            print_json(&envelope)?;
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
            no_telp,
            role,
        } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            let input = SignUp {
                name,
                email,
                password,
                confirm_password,
                no_telp,
                role,
            };
            print_json(&client.signup(&input).await?)?;
        }
        Commands::Logout => {
            client.logout()?;
            print_json(&Envelope::<()>::empty())?;
        }
        Commands::Me => print_json(&client.get_user_logged().await?)?,
        Commands::List { resource } => print_json(&client.list(resource).await?)?,
        Commands::Get { resource, id } => print_json(&client.get_one(resource, &id).await?)?,
        Commands::Create { resource, json } => {
            let payload = parse_object(&json)?;
            print_json(&client.create(resource, &payload).await?)?;
        }
        Commands::Update { resource, id, json } => {
            let payload = parse_object(&json)?;
            print_json(&client.update(resource, &id, &payload).await?)?;
        }
        Commands::Delete { resource, id } => print_json(&client.delete(resource, &id).await?)?,
        Commands::Upload {
            resource,
            path,
            field,
        } => {
            let form = read_upload(&path, &field).await?;
            print_json(&client.upload(resource, form).await?)?;
        }
        Commands::Dashboard => cmd_dashboard(&client).await?,
    }

    Ok(())
}

async fn cmd_dashboard(client: &ApiClient) -> Result<()> {
    let me = client.get_user_logged().await?;
    let Some(user) = me.data() else {
        bail!("not logged in: {}", me.message().unwrap_or("no user"));
    };
    let registrations = client.get_all_registration().await?;
    let schedules = client.get_all_schedules().await?;

    let enrollments = my_dashboard(
        user,
        records(registrations.data()),
        records(schedules.data()),
    );
    print_json(&Envelope::ok(enrollments))
}

fn records(data: Option<&Record>) -> &[Record] {
    data.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

fn parse_object(json: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(json).context("payload is not valid JSON")?;
    if !value.is_object() {
        bail!("payload must be a JSON object");
    }
    Ok(value)
}

async fn read_upload(path: &Path, field: &str) -> Result<UploadForm> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("upload path has no file name")?
        .to_string();
    let content_type = content_type_for(path);
    Ok(UploadForm::new().file(field, file_name, content_type, bytes))
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
