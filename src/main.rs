use clap::{ArgAction, ArgGroup, Parser};
use tracing_subscriber::EnvFilter;
use update_alternatives::config::{Config, OFFLINE_ROOT_ENV};
use update_alternatives::output::Format;

#[derive(Parser)]
#[command(
    name = "update-alternatives",
    version,
    about = "Maintain symlinks to the highest-priority alternative of a command",
    after_help = "  <link> is the link pointing to the provided path (ie. /usr/bin/foo).\n  \
                  <name> is the name in the alternatives registry (ie. foo)\n  \
                  <path> is the name referred to (ie. /usr/bin/foo-extra-spiffy)\n  \
                  <priority> is an integer; options with higher numbers are chosen."
)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["install", "remove", "display"])
))]
struct Cli {
    /// Register <path> as an alternative for <name>, reachable through <link>
    #[arg(
        long,
        num_args = 4,
        action = ArgAction::Set,
        value_names = ["link", "name", "path", "priority"],
        allow_negative_numbers = true
    )]
    install: Option<Vec<String>>,
    /// Unregister <path> as an alternative for <name>
    #[arg(long, num_args = 2, action = ArgAction::Set, value_names = ["name", "path"])]
    remove: Option<Vec<String>>,
    /// Show the registered alternatives for <name> and the current link
    #[arg(long, value_name = "name")]
    display: Option<String>,
    /// Output format for --display and errors
    #[arg(long, value_enum, default_value = "pretty")]
    format: Format,
    /// Operate on a staging tree instead of the real root
    #[arg(long, env = OFFLINE_ROOT_ENV, default_value = "", hide_default_value = true)]
    offline_root: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;
    if let Err(e) = run(cli) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            Format::Pretty => eprintln!("error: {e}"),
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> update_alternatives::error::Result<()> {
    let config = Config::new(cli.offline_root);

    if let Some(args) = cli.install {
        let [link, name, path, priority] = args.as_slice() else {
            unreachable!("clap enforces four values for --install");
        };
        update_alternatives::commands::install::run(&config, link, name, path, priority)?;
    } else if let Some(args) = cli.remove {
        let [name, path] = args.as_slice() else {
            unreachable!("clap enforces two values for --remove");
        };
        update_alternatives::commands::remove::run(&config, name, path)?;
    } else if let Some(name) = cli.display {
        update_alternatives::commands::display::run(&config, &name, cli.format)?;
    }
    Ok(())
}
