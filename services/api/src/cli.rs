use crate::demo::{run_catalog, run_demo, run_evaluate, CatalogArgs, DemoArgs, EvaluateArgs};
use crate::server;
use admission_form::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Admission Form Service",
    about = "Validate admission form answers and serve form sessions over HTTP",
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
    /// Evaluate an applicant record stored as JSON
    Evaluate(EvaluateArgs),
    /// List a reference catalog
    Catalog(CatalogArgs),
    /// Walk a sample applicant through every form step
    Demo(DemoArgs),
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
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Catalog(args) => run_catalog(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["admission-form-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn catalog_takes_a_kind_and_optional_state() {
        let cli = Cli::try_parse_from([
            "admission-form-api",
            "catalog",
            "municipalities",
            "--state-id",
            "9",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Catalog(args)) => {
                assert_eq!(args.kind, "municipalities");
                assert_eq!(args.state_id, Some(9));
            }
            other => panic!("expected catalog command, got {other:?}"),
        }
    }

    #[test]
    fn evaluate_rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "admission-form-api",
            "evaluate",
            "--record",
            "applicant.json",
            "--today",
            "01/08/2025",
        ]);
        assert!(result.is_err());
    }
}
