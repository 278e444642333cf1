use clap::Parser;
use idstore_cli::{logging, Commands, Connection};

#[derive(Parser)]
#[command(name = "idstore")]
#[command(about = "Signed, cached access to the idstore identity service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Failed to initialize tracing: {e}");
    }

    cli.command.execute(&cli.connection)
}
