use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "intake-cli")]
#[command(about = "Command-line client for the form intake service", long_about = None)]
struct Cli {
    #[arg(short, long, env = "INTAKE_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service and database status
    Health,
    /// Fetch the latest news items
    News,
    /// Subscribe an email address to the newsletter
    Subscribe { email: String },
    /// Submit the main contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        services: String,
        #[arg(long)]
        message: String,
    },
    /// Submit the icon contact form
    IconContact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{base}/health")),
        Commands::News => client.get(format!("{base}/api/news")),
        Commands::Subscribe { email } => client
            .post(format!("{base}/api/newsletter"))
            .json(&json!({ "email": email })),
        Commands::Contact {
            name,
            email,
            phone,
            company,
            services,
            message,
        } => client.post(format!("{base}/api/contact")).json(&json!({
            "name": name,
            "email": email,
            "phone": phone,
            "company": company,
            "services": services,
            "message": message,
        })),
        Commands::IconContact {
            name,
            email,
            message,
        } => client.post(format!("{base}/api/icon-contact")).json(&json!({
            "name": name,
            "email": email,
            "message": message,
        })),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {status}");
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{text}"),
    }

    if status.is_success() {
        Ok(())
    } else {
        std::process::exit(1)
    }
}
