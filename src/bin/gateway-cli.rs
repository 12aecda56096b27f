use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};

use service_gateway::registry::Service;
use service_gateway::render::Renderer;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for a running service gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "MICRO_WEB_URL", default_value = "http://localhost:8082")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered services
    Services,
    /// Show every version of a service
    Service { name: String },
    /// Print an example payload for an endpoint
    Example {
        service: String,
        endpoint: String,
        /// Render the response instead of the request
        #[arg(long)]
        response: bool,
    },
    /// Call an endpoint through the gateway
    Call {
        service: String,
        endpoint: String,
        #[arg(default_value = "{}")]
        request: String,
    },
}

#[derive(Deserialize)]
struct ServicesBody {
    services: Vec<Service>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut json_headers = HeaderMap::new();
    json_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match cli.command {
        Commands::Services => {
            let res = client
                .get(format!("{}/registry", cli.url))
                .headers(json_headers)
                .send()
                .await?;
            let Some(body) = services_body(res).await? else {
                return Ok(());
            };
            for service in body.services {
                println!("{}", service.name);
            }
        }
        Commands::Service { name } => {
            let res = client
                .get(format!("{}/registry", cli.url))
                .query(&[("service", &name)])
                .headers(json_headers)
                .send()
                .await?;
            if let Some(body) = services_body(res).await? {
                println!("{}", serde_json::to_string_pretty(&body.services)?);
            }
        }
        Commands::Example {
            service,
            endpoint,
            response,
        } => {
            let res = client
                .get(format!("{}/registry", cli.url))
                .query(&[("service", &service)])
                .headers(json_headers)
                .send()
                .await?;
            let Some(body) = services_body(res).await? else {
                return Ok(());
            };

            let found = body
                .services
                .iter()
                .flat_map(|s| s.endpoints.iter())
                .find(|e| e.name == endpoint);
            let Some(found) = found else {
                eprintln!("Error: {} has no endpoint {}", service, endpoint);
                return Ok(());
            };

            let mut renderer = Renderer::new();
            let request = renderer.render(found.request.as_ref());
            if response {
                println!("{}", renderer.render(found.response.as_ref()));
            } else {
                println!("{}", request);
            }
            for warning in renderer.warnings() {
                eprintln!("warning: {}", warning);
            }
        }
        Commands::Call {
            service,
            endpoint,
            request,
        } => {
            let res = client
                .post(format!("{}/rpc", cli.url))
                .json(&json!({
                    "service": service,
                    "endpoint": endpoint,
                    "request": request,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn services_body(res: reqwest::Response) -> Result<Option<ServicesBody>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }
    Ok(Some(res.json().await?))
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: call returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
