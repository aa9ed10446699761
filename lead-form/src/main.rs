use clap::Parser;
use dotenv::dotenv;
use lead_form::controller::{LeadForm, SubmitOutcome};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Submit a lead to the intake service from the command line.
#[derive(Parser)]
struct Args {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    age: String,
    #[arg(long)]
    city: String,
    /// Free-text city, used when --city is "Other".
    #[arg(long)]
    other_city: Option<String>,
    /// Lead intake endpoint; falls back to LEAD_API_URL.
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let api_url = args
        .api_url
        .or_else(|| std::env::var("LEAD_API_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8080/api/lead".to_string());

    let mut form = LeadForm::new();
    form.draft.first_name = args.first_name;
    form.draft.last_name = args.last_name;
    form.draft.phone = args.phone;
    form.draft.email = args.email;
    form.draft.company = args.company.unwrap_or_default();
    form.draft.linkedin = args.linkedin.unwrap_or_default();
    form.draft.age = args.age;
    form.select_city(&args.city);
    if let Some(text) = args.other_city {
        form.set_custom_city(&text);
    }

    let client = reqwest::Client::new();
    match form.submit(&client, &api_url).await {
        SubmitOutcome::Redirect(path) => info!("Lead accepted, continue to {path}"),
        SubmitOutcome::Invalid(messages) => {
            for message in &messages {
                error!("{message}");
            }
            std::process::exit(1);
        }
        SubmitOutcome::Error => {
            if let Some(message) = form.submit_error() {
                error!("{message}");
            }
            std::process::exit(1);
        }
    }
}
