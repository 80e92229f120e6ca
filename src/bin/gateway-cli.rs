use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for a running content gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway liveness
    Health,
    /// Exchange a GitHub OAuth authorization code for a token
    Oauth {
        /// Authorization code from the OAuth redirect
        code: String,
    },
    /// Transcribe a local audio recording
    Transcribe {
        /// Audio file to upload
        file: PathBuf,
        /// Mime type declared in the data URI
        #[arg(long, default_value = "audio/webm")]
        mime: String,
    },
    /// Start a text-to-video generation
    Video {
        /// Text prompt
        prompt: String,
        /// Aspect ratio, e.g. 16:9
        #[arg(long)]
        aspect_ratio: Option<String>,
        /// Ask for a seamlessly looping clip
        #[arg(long = "loop")]
        looping: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Oauth { code } => {
            client
                .post(format!("{}/api/github-oauth", base))
                .json(&json!({ "code": code }))
                .send()
                .await?
        }
        Commands::Transcribe { file, mime } => {
            let audio = tokio::fs::read(&file).await?;
            let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(&audio));
            client
                .post(format!("{}/api/transcribe", base))
                .json(&json!({ "audioData": data_uri }))
                .send()
                .await?
        }
        Commands::Video {
            prompt,
            aspect_ratio,
            looping,
        } => {
            let mut body = json!({ "prompt": prompt });
            if let Some(ratio) = aspect_ratio {
                body["aspectRatio"] = json!(ratio);
            }
            if looping {
                body["loop"] = json!(true);
            }
            client
                .post(format!("{}/api/generate-video", base))
                .json(&body)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
        Ok(())
    } else {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
}
