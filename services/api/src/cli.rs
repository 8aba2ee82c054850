use crate::normalize::{run_normalize, NormalizeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_rubric::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Rubric",
    about = "Normalize job rubrics and serve the rubric editing API",
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
    /// Normalize a rubric payload file and print the canonical document
    Normalize(NormalizeArgs),
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
        Command::Normalize(args) => run_normalize(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["talent-rubric-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn normalize_flags_parse() {
        let cli = Cli::try_parse_from([
            "talent-rubric-api",
            "normalize",
            "--input",
            "rubric.json",
            "--preview",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Normalize(args)) => {
                assert_eq!(args.input.to_str(), Some("rubric.json"));
                assert!(args.preview);
                assert!(!args.compact);
            }
            other => panic!("expected normalize command, got {other:?}"),
        }
    }
}
