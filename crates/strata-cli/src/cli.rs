use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata: stream an object graph and convert it to renderable geometry",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Loader configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load an object URL from a JSON dump and convert its geometry
    Load(LoadArgs),
    /// Print the effective loader configuration
    Config(ConfigArgs),
    /// Persist an access token to the configured token file
    Token(TokenArgs),
}

#[derive(Args)]
pub struct LoadArgs {
    /// Object URL: https://host/streams/{stream}/objects/{object}
    pub url: String,
    /// JSON dump holding the stored objects
    #[arg(long)]
    pub dump: PathBuf,
    /// Access token presented to the store
    #[arg(long)]
    pub token: Option<String>,
    /// List every converted object
    #[arg(long)]
    pub objects: bool,
}

#[derive(Args)]
pub struct ConfigArgs {}

#[derive(Args)]
pub struct TokenArgs {
    pub token: String,
    /// Token file to write, overriding the configured one
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_load() {
        let cli = Cli::try_parse_from([
            "strata",
            "load",
            "https://x/streams/s/objects/o",
            "--dump",
            "objects.json",
        ])
        .unwrap();
        if let Command::Load(args) = cli.command {
            assert_eq!(args.url, "https://x/streams/s/objects/o");
            assert_eq!(args.dump, PathBuf::from("objects.json"));
            assert!(args.token.is_none());
            assert!(!args.objects);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_load_with_token() {
        let cli = Cli::try_parse_from([
            "strata", "load", "u", "--dump", "d.json", "--token", "abc", "--objects",
        ])
        .unwrap();
        if let Command::Load(args) = cli.command {
            assert_eq!(args.token, Some("abc".into()));
            assert!(args.objects);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn load_requires_dump() {
        assert!(Cli::try_parse_from(["strata", "load", "u"]).is_err());
    }

    #[test]
    fn parse_token() {
        let cli = Cli::try_parse_from(["strata", "token", "secret", "--path", "/tmp/t"]).unwrap();
        if let Command::Token(args) = cli.command {
            assert_eq!(args.token, "secret");
            assert_eq!(args.path, Some(PathBuf::from("/tmp/t")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli =
            Cli::try_parse_from(["strata", "--verbose", "--config", "strata.toml", "config"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("strata.toml")));
        assert!(matches!(cli.command, Command::Config(_)));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["strata", "--format", "json", "config"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
