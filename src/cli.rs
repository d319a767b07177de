//! Command-line interface for recipe-box.
//!
//! Uses lexopt to keep argument parsing dependency-light.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line arguments.
///
/// Options left unset here defer to the environment and config file.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Path to the recipe catalog.
    pub recipes: Option<PathBuf>,
    /// Path to the favorites file.
    pub favorites: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('r') | Long("recipes") => {
                result.recipes = Some(parser.value()?.parse()?);
            }
            Short('f') | Long("favorites") => {
                result.favorites = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"recipe-box {version}
Recipe catalog server with ingredient matching

USAGE:
    recipe-box [OPTIONS]

OPTIONS:
    -H, --host <ADDR>        Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>        Port to listen on [default: 3000]
    -c, --config <FILE>      Path to configuration file (JSON)
    -r, --recipes <FILE>     Recipe catalog [default: data/recipes.json]
    -f, --favorites <FILE>   Favorites file (in-memory when unset)
    -l, --log-level <LVL>    Log level (error, warn, info, debug, trace)
    -h, --help               Print help
    -V, --version            Print version

ENVIRONMENT VARIABLES:
    RECIPE_BOX_HOST          Host address (overrides config)
    RECIPE_BOX_PORT          Port number (overrides config)
    RECIPE_BOX_SITE_URL      Public site URL used for auth redirects
    RECIPE_BOX_CATALOG       Recipe catalog path
    RECIPE_BOX_FAVORITES     Favorites file path
    RECIPE_BOX_LOG_LEVEL     Log level (overrides config)
    RUST_LOG                 Alternative log level setting

EXAMPLES:
    # Serve the bundled catalog on localhost:3000
    recipe-box

    # Listen on all interfaces with a custom catalog
    recipe-box -H 0.0.0.0 -p 8080 -r /srv/recipes.json

    # Start with config file
    recipe-box -c /etc/recipe-box/config.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("recipe-box {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
