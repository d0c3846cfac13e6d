use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use corezoid::auth::{self, CredentialStore};
use corezoid::config::{Config, HOST_KEY, VERSION_KEY};
use corezoid::consts::{DEFAULT_PROFILE, DEFAULT_TIMEOUT_SECS, SECRET_ENV_VAR, default_db_path};
use corezoid::transport::http::{HttpConfig, HttpTransport};
use corezoid::{ApiConfig, Client, Credentials, RequestSigner};

#[derive(Parser)]
#[command(name = "corezoid", version, about = "Send signed task batches to Corezoid.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database for credentials and config (default: ~/.corezoid/corezoid.db)
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    /// Credential profile
    #[arg(short, long, global = true, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Override the API base URL
    #[arg(long, global = true)]
    host: Option<String>,

    /// Override the API version
    #[arg(long, global = true)]
    api_version: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Store API credentials for a profile. The secret is prompted for on
    /// a terminal, otherwise taken from COREZOID_API_SECRET or stdin.
    Login {
        #[arg(long)]
        login: String,
    },
    /// Remove stored credentials for a profile
    Logout,
    /// Read or change persistent settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Create one task and send it
    Send {
        /// External id for the task
        #[arg(long = "ref")]
        reference: String,
        /// Target process id
        #[arg(long)]
        conv_id: String,
        /// Task payload as a JSON object
        #[arg(long)]
        data: Option<String>,
        /// Request timeout in seconds
        #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
        /// Disable TLS certificate verification
        #[arg(long, default_value_t = false)]
        insecure: bool,
    },
    /// Print the signature and URL for a body
    Sign {
        #[arg(long)]
        time: u64,
        #[arg(long)]
        body: String,
    },
    /// Check a callback signature; exits non-zero on mismatch
    Verify {
        #[arg(long)]
        sign: String,
        #[arg(long)]
        time: u64,
        #[arg(long)]
        body: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Get { key: ConfigKey },
    Set { key: ConfigKey, value: String },
    Unset { key: ConfigKey },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfigKey {
    Host,
    Version,
}

impl ConfigKey {
    fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Host => HOST_KEY,
            ConfigKey::Version => VERSION_KEY,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = db_path(cli.db.as_ref())?;

    match &cli.command {
        Command::Login { login } => {
            let creds = read_credentials(login)?;
            CredentialStore::open(&db)
                .context("failed to open credential store")?
                .set(&cli.profile, &creds)
                .context("failed to save credentials")?;
            println!("✓ Saved credentials for profile {:?}", cli.profile);
        }
        Command::Logout => {
            CredentialStore::open(&db)
                .context("failed to open credential store")?
                .remove(&cli.profile)
                .context("failed to remove credentials")?;
            println!("✓ Removed credentials for profile {:?}", cli.profile);
        }
        Command::Config { action } => {
            let config = Config::open(&db).context("failed to open config")?;
            match action {
                ConfigAction::Get { key } => match config.get(key.as_str())? {
                    Some(value) => println!("{value}"),
                    None => println!("(unset)"),
                },
                ConfigAction::Set { key, value } => config.set(key.as_str(), value)?,
                ConfigAction::Unset { key } => config.remove(key.as_str())?,
            }
        }
        Command::Send {
            reference,
            conv_id,
            data,
            timeout,
            insecure,
        } => {
            let data = data
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()
                .context("--data is not valid JSON")?;
            let transport = HttpTransport::new(HttpConfig {
                timeout: std::time::Duration::from_secs(*timeout),
                danger_accept_invalid_certs: *insecure,
            })?;
            let mut client = Client::new(build_signer(&cli, &db)?, Box::new(transport));
            client.add_task(reference.clone(), conv_id.clone(), data)?;
            let response = client.send_tasks(true).await?;
            println!("{response}");
        }
        Command::Sign { time, body } => {
            let request = build_signer(&cli, &db)?.sign(*time, body.clone());
            println!("signature: {}", request.signature);
            println!("url:       {}", request.url);
        }
        Command::Verify { sign, time, body } => {
            if build_signer(&cli, &db)?.verify_signature(sign, *time, body) {
                println!("✓ signature valid");
            } else {
                println!("✗ signature mismatch");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Pair `login` with a secret that never touches argv.
fn read_credentials(login: &str) -> anyhow::Result<Credentials> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("API secret: ");
        io::stdout().flush()?;
    } else if let Ok(secret) = std::env::var(SECRET_ENV_VAR) {
        return Ok(Credentials::new(login, secret)?);
    }
    Credentials::with_secret_from(login, &mut stdin.lock()).context("no API secret provided")
}

/// Resolve the database path, creating its parent directory.
fn db_path(explicit: Option<&PathBuf>) -> anyhow::Result<String> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => default_db_path().context("cannot determine home directory")?,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    match path.to_str() {
        Some(s) => Ok(s.to_string()),
        None => bail!("database path is not valid UTF-8: {}", path.display()),
    }
}

/// Credentials from the store (or env), endpoint from config plus flags.
fn build_signer(cli: &Cli, db: &str) -> anyhow::Result<RequestSigner> {
    let store = CredentialStore::open(db).context("failed to open credential store")?;
    let credentials = auth::resolve(Some(&store), &cli.profile).context(
        "no credentials found. Run `corezoid login` or set COREZOID_API_LOGIN / COREZOID_API_SECRET.",
    )?;

    let mut api: ApiConfig = Config::open(db)
        .context("failed to open config")?
        .api_config()?;
    if let Some(host) = &cli.host {
        api = api.with_host(host.clone());
    }
    if let Some(version) = &cli.api_version {
        api = api.with_version(version.clone());
    }

    Ok(RequestSigner::new(credentials, api)?)
}
