use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use skul::{ClientError, Resource, Skul, SkulConfig};
use url::Url;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("--username and --password must be given together")]
    PartialCredentials,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "skul", about = "skul API and live channel CLI")]
struct Cli {
    /// Hosting page URL; the API is served beneath its `/api/`.
    #[arg(long, env = "SKUL_PAGE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Explicit API root, overriding `--base-url`.
    #[arg(long, env = "SKUL_API_ROOT")]
    api_root: Option<String>,

    #[arg(long, value_enum, default_value_t = LoginRole::Admin)]
    role: LoginRole,

    #[arg(long, env = "SKUL_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "SKUL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoginRole {
    Admin,
    Student,
}

#[derive(Subcommand, Debug)]
enum Command {
    Health,
    Whoami,
    Exams(ExamsCommand),
    Logout,
    /// Print text frames from a live channel.
    Listen {
        path: String,
        #[arg(long, help = "Stop after this many frames")]
        max: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct ExamsCommand {
    #[command(subcommand)]
    command: ExamsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ExamsSubcommand {
    List {
        #[arg(long, default_value_t = skul::resources::examination::FIRST_PAGE)]
        page: u32,
    },
    Get {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = SkulConfig::from_env()?;
    config.api_root = Some(resolve_api_root(&cli)?);
    config.auto_refresh = false;
    let skul = Skul::start(&config)?;

    login(&skul, &cli).await?;

    match cli.command {
        Command::Health => {
            let status = skul.client().health().await?;
            println!("{status}");
            Ok(())
        }
        Command::Whoami => run_whoami(&skul).await,
        Command::Exams(exams) => run_exams(&skul, exams).await,
        Command::Logout => {
            skul.client().logout().await?;
            eprintln!("logged out");
            Ok(())
        }
        Command::Listen { path, max } => run_listen(&skul, &path, max).await,
    }
}

fn resolve_api_root(cli: &Cli) -> Result<Url, CliError> {
    if let Some(root) = &cli.api_root {
        return Ok(Url::parse(root)?);
    }
    let page = Url::parse(&cli.base_url)?;
    Ok(skul::config::api_root_from_page(&page)?)
}

async fn login(skul: &Skul, cli: &Cli) -> Result<(), CliError> {
    let (username, password) = match (&cli.username, &cli.password) {
        (Some(username), Some(password)) => (username, password),
        (None, None) => return Ok(()),
        _ => return Err(CliError::PartialCredentials),
    };
    match cli.role {
        LoginRole::Admin => skul.client().admin().login(username, password).await?,
        LoginRole::Student => skul.client().student().login(username, password).await?,
    }
    tracing::info!(role = ?cli.role, %username, "logged in");
    Ok(())
}

async fn run_whoami(skul: &Skul) -> Result<(), CliError> {
    let report = skul.refresh().await;
    for (role, error) in report.failures() {
        tracing::debug!(%role, code = error.error_code(), %error, "lookup failed");
    }
    let snapshot = skul.snapshot();
    print_json(&json!({
        "user": snapshot.user,
        "loading": snapshot.loading,
        "admin": snapshot.is_admin(),
        "student": snapshot.is_student(),
    }))
}

async fn run_exams(skul: &Skul, exams: ExamsCommand) -> Result<(), CliError> {
    match exams.command {
        ExamsSubcommand::List { page } => {
            let listed = skul.client().examination().list(page).await?;
            print_json(&listed)
        }
        ExamsSubcommand::Get { id } => {
            let exam = skul.client().examination().get(&id).await?;
            print_json(&serde_json::to_value(exam)?)
        }
    }
}

async fn run_listen(skul: &Skul, path: &str, max: Option<usize>) -> Result<(), CliError> {
    let channel = skul.client().websocket(path)?;
    eprintln!("connecting to {}", channel.url());
    let mut conn = channel.connect().await?;

    let mut received = 0_usize;
    let mut peer_closed = true;
    while let Some(text) = conn.next_text().await? {
        println!("{text}");
        received = received.saturating_add(1);
        if max.is_some_and(|limit| received >= limit) {
            peer_closed = false;
            break;
        }
    }
    if !peer_closed {
        conn.close().await?;
    }
    eprintln!("live channel done: received={received}");
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
