use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "hyper-shopping")]
#[command(about = "Categorize shopping lists and sort them by shop route")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.hyper-shopping)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShowTarget {
    /// Known categories
    Categories,
    /// Hypernym -> category synonyms
    Synonyms,
    /// Item -> category assignments
    Items,
    /// Shop routes
    Shops,
    /// Item -> department map used for sorting
    Departments,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the category of each item, asking when unsure
    Categorize {
        /// Items to categorize (e.g., "Sour cream" "Frozen Chips")
        items: Vec<String>,

        /// Read items from a card file instead
        #[arg(long, conflicts_with = "items")]
        card: Option<PathBuf>,

        /// Checklist of the card to read (default: ask when there are several)
        #[arg(long, requires = "card")]
        checklist: Option<String>,
    },

    /// Sort a card's checklists by a shop's route
    Sort {
        /// Card file (JSON)
        #[arg(long)]
        card: PathBuf,

        /// Shop whose route to follow
        #[arg(short, long, default_value = "smart")]
        shop: String,

        /// Use item categories as departments
        #[arg(long)]
        by_category: bool,

        /// Write the sorted card here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display stored data
    Show {
        #[arg(value_enum)]
        target: ShowTarget,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage hypernym synonyms
    Synonym {
        #[command(subcommand)]
        action: SynonymAction,
    },

    /// Manage shop routes
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },

    /// Manage item departments
    Department {
        #[command(subcommand)]
        action: DepartmentAction,
    },

    /// Interactively create a shopping card
    Create {
        /// Card file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Card name
        #[arg(long, default_value = "Shopping")]
        name: String,
    },

    /// Manage the WordNet dataset
    Wordnet {
        #[command(subcommand)]
        action: WordnetAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum SynonymAction {
    /// Map a hypernym to a category
    Add {
        /// Hypernym (e.g., dairy_product)
        hypernym: String,
        /// Category name
        category: String,
    },
}

#[derive(Subcommand)]
pub enum ShopAction {
    /// Add or replace a shop route
    Add {
        /// Shop name
        name: String,
        /// Departments in walking order
        #[arg(required = true)]
        departments: Vec<String>,
    },
    /// Remove a shop route
    Remove {
        /// Shop name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum DepartmentAction {
    /// Set the department of an item
    Set {
        /// Item name
        item: String,
        /// Department name
        department: String,
    },
}

#[derive(Subcommand)]
pub enum WordnetAction {
    /// Show where the dataset is expected and whether it is present
    Status,
    /// Download the dataset
    Fetch,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., spelling.max_edit_distance)
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Value
        value: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
    /// Initialize config file with defaults
    Init,
}
