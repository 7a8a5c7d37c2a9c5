use clap::{Parser, Subcommand};
use keephub::errors::NodeError;
use keephub::node::ExecutionInput;
use keephub::utils::input::InputSource;

#[derive(Parser, Debug)]
#[command(name = "keephub")]
#[command(about = "Run Keephub API operations over a batch of workflow items")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute one request read as JSON and print the output items
    Run {
        /// Request file, or `-` for stdin
        #[arg(long, short)]
        input: Option<String>,

        /// Emit an error item for failed input items instead of aborting
        #[arg(long)]
        continue_on_fail: bool,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the API host derived from a front-end URL
    DeriveHost {
        url: String,
    },
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, NodeError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|err| NodeError::internal(format!("Failed to render output: {}", err)))
}

async fn run(command: Commands) -> Result<(), NodeError> {
    match command {
        Commands::Run {
            input,
            continue_on_fail,
            pretty,
        } => {
            let raw = InputSource::from_arg(input.as_deref())?.read_to_string()?;
            let mut request: ExecutionInput = serde_json::from_str(&raw)?;
            request.continue_on_fail |= continue_on_fail;
            let items = keephub::app::execute(&request).await?;
            println!("{}", render(&items, pretty)?);
        }
        Commands::DeriveHost { url } => {
            println!("{}", keephub::utils::api_url::derive_api_host(&url)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(err) = run(args.command).await {
        match serde_json::to_string(&err) {
            Ok(serialized) => eprintln!("{}", serialized),
            Err(_) => eprintln!("keephub: {}", err),
        }
        std::process::exit(1);
    }
}
