use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use uuid::Uuid;

use stormer::execute::{Auth, BodyMode, HttpMethod, KeyValueEntry, RequestDraft};
use stormer::store::Collection;

#[derive(Parser)]
#[command(name = "stormer-cli")]
#[command(about = "Command-line client for the Stormer API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the service is up
    Health,
    /// Send a request through the service
    Send(SendArgs),
    /// Send a request saved in a collection
    Run {
        collection: Uuid,
        /// Name of the saved request
        request: String,
    },
    /// List recent executions
    History,
    /// Forget all recorded executions
    ClearHistory,
    /// List saved collections
    Collections,
}

#[derive(Args)]
struct SendArgs {
    /// Target URL; http:// is assumed when no scheme is given
    target: String,
    #[arg(short = 'X', long, default_value = "GET")]
    method: HttpMethod,
    /// Header as "Name: value"
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,
    /// Query parameter as key=value
    #[arg(short = 'q', long = "param")]
    params: Vec<String>,
    /// Cookie as key=value
    #[arg(short = 'c', long = "cookie")]
    cookies: Vec<String>,
    /// Raw body; sent as JSON when it parses as an object or array
    #[arg(short = 'd', long = "data", conflicts_with = "form")]
    data: Option<String>,
    /// Form field as key=value
    #[arg(long)]
    form: Vec<String>,
    #[arg(long, conflicts_with = "basic")]
    bearer: Option<String>,
    /// Basic credentials as user:pass
    #[arg(long)]
    basic: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{base}/api/health")).send().await?;
            print_response(res).await?;
        }
        Commands::Send(args) => {
            let draft = build_draft(args)?;
            send_draft(&client, base, &draft).await?;
        }
        Commands::Run { collection, request } => {
            let res = client
                .get(format!("{base}/api/collections/{collection}"))
                .send()
                .await?;
            if !res.status().is_success() {
                eprintln!("Error: API returned status {}", res.status());
                return Ok(());
            }
            let collection: Collection = res.json().await?;
            let saved = collection
                .find_request(&request)
                .ok_or_else(|| format!("no request named `{request}` in `{}`", collection.name))?;
            ensure_sendable(&saved.draft)?;
            send_draft(&client, base, &saved.draft).await?;
        }
        Commands::History => {
            let res = client.get(format!("{base}/api/history")).send().await?;
            print_response(res).await?;
        }
        Commands::ClearHistory => {
            let res = client.delete(format!("{base}/api/history")).send().await?;
            if res.status().is_success() {
                println!("History cleared");
            } else {
                eprintln!("Error: API returned status {}", res.status());
            }
        }
        Commands::Collections => {
            let res = client.get(format!("{base}/api/collections")).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn build_draft(args: SendArgs) -> Result<RequestDraft, String> {
    let mut draft = RequestDraft::new(args.method, args.target);
    draft.headers = parse_pairs(&args.headers, ':')?;
    draft.params = parse_pairs(&args.params, '=')?;
    draft.cookies = parse_pairs(&args.cookies, '=')?;
    if !args.form.is_empty() {
        draft.body_mode = BodyMode::Form;
        draft.body_items = parse_pairs(&args.form, '=')?;
    } else if let Some(data) = args.data {
        draft.body = data;
    }
    draft.auth = match (args.bearer, args.basic) {
        (Some(token), _) => Auth::Bearer { token: Some(token) },
        (None, Some(creds)) => {
            let (user, pass) = creds.split_once(':').unwrap_or((creds.as_str(), ""));
            Auth::Basic {
                username: Some(user.to_string()),
                password: Some(pass.to_string()),
            }
        }
        (None, None) => Auth::None,
    };
    ensure_sendable(&draft)?;
    Ok(draft)
}

fn ensure_sendable(draft: &RequestDraft) -> Result<(), String> {
    if draft.is_sendable() {
        Ok(())
    } else {
        Err("a URL is required".to_string())
    }
}

async fn send_draft(
    client: &reqwest::Client,
    base: &str,
    draft: &RequestDraft,
) -> Result<(), Box<dyn std::error::Error>> {
    let res = client
        .post(format!("{base}/api/execute"))
        .json(&draft.to_spec())
        .send()
        .await?;
    // Failure envelopes carry useful detail, so print them regardless of status.
    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn parse_pairs(raw: &[String], sep: char) -> Result<Vec<KeyValueEntry>, String> {
    raw.iter()
        .map(|item| {
            item.split_once(sep)
                .map(|(k, v)| KeyValueEntry::new(k.trim(), v.trim()))
                .ok_or_else(|| format!("expected `key{sep}value`, got `{item}`"))
        })
        .collect()
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
