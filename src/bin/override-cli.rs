use clap::{Parser, Subcommand};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;

#[derive(Parser)]
#[command(name = "override-cli")]
#[command(about = "Inspect and change request-scoped config overrides", long_about = None)]
struct Cli {
    /// Base URL of the service.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Mount path of the override admin surface.
    #[arg(short, long, default_value = "/config_override")]
    mount: String,

    /// Override cookie to send, as `name=value`.
    #[arg(short, long)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the override set the service sees for this cookie
    Show,
    /// Override one whitelisted key
    Update { key: String, value: String },
    /// Expire the override cookie
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()?;

    let mut headers = HeaderMap::new();
    if let Some(cookie) = &cli.cookie {
        headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
    }

    let base = format!("{}{}", cli.url.trim_end_matches('/'), cli.mount);
    let url = match &cli.command {
        Commands::Show => format!("{}/", base),
        Commands::Update { key, value } => format!(
            "{}/update/{}/{}/",
            base,
            utf8_percent_encode(key, NON_ALPHANUMERIC),
            utf8_percent_encode(value, NON_ALPHANUMERIC)
        ),
        Commands::Reset => format!("{}/reset/", base),
    };

    let res = client.get(url).headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    for value in res.headers().get_all(SET_COOKIE) {
        println!("Set-Cookie: {}", value.to_str()?);
    }
    println!("{}", res.text().await?);
    Ok(())
}
