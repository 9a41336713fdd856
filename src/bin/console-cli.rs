use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(about = "Command-line client for the admin console API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8787")]
    url: String,

    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    username: String,

    #[arg(long, env = "ADMIN_PASSWORD")]
    password: String,

    /// Gateway assertion to forward when the perimeter verifier is enabled.
    #[arg(long, env = "CF_ACCESS_JWT")]
    assertion: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in admin
    Me,
    /// List accounts
    Accounts {
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// List transactions
    Transactions {
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[arg(long)]
        account_id: Option<i64>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Payment service health
    Health,
    /// List stored assets
    Assets {
        #[arg(long, default_value = "")]
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(assertion) = &cli.assertion {
        headers.insert("cf-access-jwt-assertion", HeaderValue::from_str(assertion)?);
    }

    let login = client
        .post(format!("{}/api/admin/login", cli.url))
        .headers(headers.clone())
        .json(&json!({ "username": cli.username, "password": cli.password }))
        .send()
        .await?;
    if !login.status().is_success() {
        return print_response(login).await;
    }

    let session = login
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| raw.split(';').next().filter(|pair| pair.starts_with("admin_session=")))
        .ok_or("login succeeded without a session cookie")?
        .to_string();
    headers.insert(COOKIE, HeaderValue::from_str(&session)?);

    let request = match cli.command {
        Commands::Me => client.get(format!("{}/api/admin/me", cli.url)),
        Commands::Accounts { limit, offset, query } => client
            .get(format!("{}/api/accounts", cli.url))
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string()), ("query", query)]),
        Commands::Transactions { limit, account_id, status } => {
            let mut params = vec![("limit", limit.to_string())];
            if let Some(id) = account_id {
                params.push(("accountId", id.to_string()));
            }
            if let Some(status) = status {
                params.push(("status", status));
            }
            client
                .get(format!("{}/api/transactions", cli.url))
                .query(&params)
        }
        Commands::Health => client.get(format!("{}/api/payment/health", cli.url)),
        Commands::Assets { prefix } => client
            .get(format!("{}/api/assets/list", cli.url))
            .query(&[("prefix", prefix)]),
    };

    print_response(request.headers(headers).send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: console API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
