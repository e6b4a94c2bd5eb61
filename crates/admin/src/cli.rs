//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// WhereToGo admin - manage categories, places, features and users
#[derive(Parser, Debug)]
#[command(name = "wheretogo-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one page of a resource list
    List(ListArgs),

    /// Delete one entity
    Delete(DeleteArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Categories,
    Places,
    Features,
    Users,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Categories => "categories",
            ResourceKind::Places => "places",
            ResourceKind::Features => "features",
            ResourceKind::Users => "users",
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub resource: ResourceKind,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter as key=value; repeat a key to match any of its values
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Sort key
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (defaults to WHERETOGO_PAGE_SIZE)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub resource: ResourceKind,

    pub id: i64,

    /// Confirm the deletion; without it nothing is deleted
    #[arg(short, long)]
    pub yes: bool,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "wheretogo-admin",
            "list",
            "places",
            "--filter",
            "category=1",
            "-f",
            "category=2",
            "--sort",
            "rating",
            "--desc",
        ])
        .unwrap();

        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.resource, ResourceKind::Places);
        assert_eq!(args.filters.len(), 2);
        assert!(args.desc);
        assert_eq!(args.page, 1);
    }

    #[test]
    fn test_filter_requires_key_and_value() {
        assert!(parse_filter("open=true").is_ok());
        assert!(parse_filter("open").is_err());
        assert!(parse_filter("=true").is_err());
    }
}
