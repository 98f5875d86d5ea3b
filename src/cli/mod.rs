// CLI module: server startup and administrative commands

pub mod catalog;
pub mod migrate;

use clap::{Parser, Subcommand, ValueEnum};

use crate::errors::internal::CatalogKind;

/// Local business directory backend
#[derive(Parser)]
#[command(name = "localbiz-backend")]
#[command(about = "Local business directory backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run migrations and start the HTTP server (default)
    Serve,

    /// Run pending database migrations and exit
    Migrate,

    /// Manage the service, brand and specialization catalogs
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Add a catalog entry
    Add {
        #[arg(long, value_enum)]
        kind: CatalogKindArg,

        #[arg(long)]
        name: String,
    },

    /// List catalog entries
    List {
        #[arg(long, value_enum)]
        kind: CatalogKindArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CatalogKindArg {
    Service,
    Brand,
    Specialization,
}

impl From<CatalogKindArg> for CatalogKind {
    fn from(arg: CatalogKindArg) -> Self {
        match arg {
            CatalogKindArg::Service => CatalogKind::Service,
            CatalogKindArg::Brand => CatalogKind::Brand,
            CatalogKindArg::Specialization => CatalogKind::Specialization,
        }
    }
}
