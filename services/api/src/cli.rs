use crate::commands;
use crate::demo::run_demo;
use crate::server;
use clap::{Args, Parser, Subcommand};
use street_paws::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "street-paws",
    about = "Run the shelter adoption API or talk to it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through the Bruno adoption from request to certificate in-process
    Demo,
    /// Store a bearer token for later commands
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored bearer token
    Logout,
    /// Adoption requests owned by the signed-in adopter
    Requests {
        #[command(subcommand)]
        command: RequestsCommand,
    },
    /// Weekly follow-up reports
    FollowUp {
        #[command(subcommand)]
        command: FollowUpCommand,
    },
    /// Print the certificate data of an approved adoption
    Certificate { request_id: String },
    /// Toggle a dog in the local favorites list
    Favorite { dog_id: String },
    /// Toggle an event in the local calendar bookmarks
    Bookmark { event_id: String },
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
    /// List your requests, newest first
    Mine,
}

#[derive(Subcommand, Debug)]
enum FollowUpCommand {
    /// Show completed weeks and the next week due
    Summary { request_id: String },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo => run_demo(),
        Command::Login { token } => commands::blocking(move |config| commands::login(config, &token)).await,
        Command::Logout => commands::blocking(commands::logout).await,
        Command::Requests {
            command: RequestsCommand::Mine,
        } => commands::blocking(commands::my_requests).await,
        Command::FollowUp {
            command: FollowUpCommand::Summary { request_id },
        } => commands::blocking(move |config| commands::follow_up_summary(config, &request_id)).await,
        Command::Certificate { request_id } => {
            commands::blocking(move |config| commands::certificate(config, &request_id)).await
        }
        Command::Favorite { dog_id } => {
            commands::blocking(move |config| commands::favorite(config, &dog_id)).await
        }
        Command::Bookmark { event_id } => {
            commands::blocking(move |config| commands::bookmark(config, &event_id)).await
        }
    }
}
