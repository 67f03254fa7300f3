//! Clap derive structures for the `storefront` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// storefront -- admin CLI for a product catalog API
#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    version,
    about = "Browse and administer a storefront product catalog",
    long_about = "Browse the catalog, inspect products, and add, edit or delete\n\
        products against a fakestoreapi-compatible REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API profile to use
    #[arg(long, short = 'p', env = "STOREFRONT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Product API root (overrides profile)
    #[arg(long, env = "STOREFRONT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STOREFRONT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "STOREFRONT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and manage products
    #[command(alias = "p")]
    Products(ProductsArgs),

    /// Add a product to the cart
    Cart(CartArgs),

    /// Show the featured product
    Home,

    /// Resolve a storefront path and render its view
    Open {
        /// Path such as /products/category/jewelery or /products/details/3
        path: String,
    },

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List {
        /// Only show products in this category (case-insensitive)
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Show one product
    Get {
        /// Product ID
        id: String,
    },

    /// List categories present in the catalog
    Categories,

    /// Add a product (prompts for missing fields on a terminal)
    Add(ProductFields),

    /// Edit a product (unset fields keep their current values)
    Edit {
        /// Product ID
        id: String,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: String,
    },
}

/// Field values for the add and edit forms.
#[derive(Debug, Default, Args)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub title: Option<String>,

    /// Price, e.g. 19.99
    #[arg(long)]
    pub price: Option<String>,

    /// Product description (at most 500 characters)
    #[arg(long)]
    pub description: Option<String>,

    /// Category, or "other" together with --custom-category
    #[arg(long)]
    pub category: Option<String>,

    /// Category name used when --category is "other"
    #[arg(long)]
    pub custom_category: Option<String>,

    /// Image file (.jpg, .jpeg, .png, .gif, .svg)
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl ProductFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.custom_category.is_none()
            && self.image.is_none()
    }
}

// ── Cart ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Add a quantity of a product to the cart
    Add {
        /// Product ID
        id: String,

        /// Quantity (values below 1 become 1)
        #[arg(long, short = 'n', default_value = "1", allow_hyphen_values = true)]
        quantity: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Config key (api_url, ca_cert, timeout, confirmation_delay_ms,
        /// redirect_countdown_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
