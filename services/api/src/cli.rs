use crate::demo::{run_catalog, run_demo, run_quote, CatalogArgs, DemoArgs, QuoteArgs};
use crate::server;
use athletic_labs::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Athletic Labs Ordering",
    about = "Run the Athletic Labs catering service or price orders from the command line",
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
    /// Price a single order: subtotal, tax, rush surcharge, and total
    Quote(QuoteArgs),
    /// List the menu templates currently offered to teams
    Catalog(CatalogArgs),
    /// Walk through placing, cancelling, and delivering orders in memory
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
        Command::Quote(args) => run_quote(args),
        Command::Catalog(args) => run_catalog(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn quote_arguments_parse() {
        let cli = Cli::try_parse_from([
            "athletic-labs-api",
            "quote",
            "--unit-price",
            "49.00",
            "--people",
            "60",
            "--delivery",
            "2026-04-10T14:00:00Z",
        ])
        .expect("quote arguments parse");

        match cli.command {
            Some(Command::Quote(args)) => {
                assert_eq!(args.people, 60);
                assert!(args.delivery.is_some());
                assert!(args.tax_rate.is_none());
            }
            other => panic!("expected quote command, got {other:?}"),
        }
    }
}
