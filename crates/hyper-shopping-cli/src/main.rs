use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use hyper_shopping_core::card::{load_shopping_card, Card, CheckItem, Checklist};
use hyper_shopping_core::category::{CategoryResolver, CategoryStore};
use hyper_shopping_core::config::Config;
use hyper_shopping_core::lexical::{fetch_dataset, WordNet};
use hyper_shopping_core::normalize::normalize_key;
use hyper_shopping_core::prompt::{Prompt, Prompter};
use hyper_shopping_core::route::{sort_card, DepartmentLookup, Route};
use hyper_shopping_core::spelling::{SpellingAdvisor, SpellingDictionary};
use hyper_shopping_core::{Result, ShoppingError};

mod args;
use args::{
    CategoryAction, Cli, Commands, ConfigAction, DepartmentAction, Shell, ShopAction,
    ShowTarget, SynonymAction, WordnetAction,
};

mod prompt;
use prompt::TerminalPrompter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);
    tracing::debug!(base_dir = %base_dir.display(), "resolved base dir");

    let result = match cli.command {
        Some(Commands::Categorize {
            items,
            card,
            checklist,
        }) => handle_categorize(&base_dir, items, card.as_deref(), checklist.as_deref()),
        Some(Commands::Sort {
            card,
            shop,
            by_category,
            output,
        }) => handle_sort(&base_dir, &card, &shop, by_category, output.as_deref()),
        Some(Commands::Show { target }) => handle_show(target, &base_dir),
        Some(Commands::Category { action }) => handle_category(action, &base_dir),
        Some(Commands::Synonym { action }) => handle_synonym(action, &base_dir),
        Some(Commands::Shop { action }) => handle_shop(action, &base_dir),
        Some(Commands::Department { action }) => handle_department(action, &base_dir),
        Some(Commands::Create { output, name }) => handle_create(&output, &name),
        Some(Commands::Wordnet { action }) => handle_wordnet(action, &base_dir),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "hyper-shopping", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("HYPER_SHOPPING_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".hyper-shopping"))
        .unwrap_or_else(|| PathBuf::from(".hyper-shopping"))
}

// =============================================================================
// Categorize
// =============================================================================

fn handle_categorize(
    base_dir: &Path,
    items: Vec<String>,
    card: Option<&Path>,
    checklist: Option<&str>,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let mut prompter = TerminalPrompter::stdio();

    let items = match card {
        Some(path) => match card_items(path, checklist, &mut prompter)? {
            Some(items) => items,
            None => {
                println!("Aborted.");
                return Ok(());
            }
        },
        None => items,
    };

    if items.is_empty() {
        println!("No items to categorize.");
        return Ok(());
    }

    let wordnet = open_wordnet(base_dir, &config, &mut prompter)?;
    let mut store = CategoryStore::open_in(base_dir)?;

    let dictionary = SpellingDictionary::load(config.dictionary_path(base_dir))?;
    let mut speller = SpellingAdvisor::new(dictionary, config.spelling.max_edit_distance);
    speller.extend(
        wordnet
            .lemmas()
            .into_iter()
            .filter(|lemma| lemma.chars().all(char::is_alphabetic)),
    );
    tracing::debug!(words = speller.dictionary().len(), "spelling dictionary ready");

    let mut failures = Vec::new();
    {
        let mut resolver = CategoryResolver::new(&mut store, &wordnet, &mut speller, &mut prompter);

        for (i, item) in items.iter().enumerate() {
            println!();
            println!("{} {}", format!("{}.", i + 1).dimmed(), item.bold());

            match resolver.resolve(item) {
                Ok(resolution) => {
                    let note = if resolution.remembered {
                        " (remembered)".dimmed().to_string()
                    } else {
                        String::new()
                    };
                    println!("   {} {}{}", "->".green(), resolution.category.cyan(), note);
                }
                Err(e) if e.is_per_item() => {
                    tracing::warn!(item = %item, error = %e, "item skipped");
                    println!("   {} {}", "[SKIPPED]".yellow().bold(), e);
                    failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    println!();
    if failures.is_empty() {
        println!("{} {} item(s) categorized", "Done:".green(), items.len());
        return Ok(());
    }

    println!(
        "{} {} of {} item(s) could not be categorized",
        "Summary:".yellow(),
        failures.len(),
        items.len()
    );
    Err(failures.remove(0))
}

/// Item names of the chosen checklist; `None` when the user backs out
fn card_items(
    path: &Path,
    checklist: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<Option<Vec<String>>> {
    let card = load_shopping_card(path)?;

    let text = format!(
        "'{}' (last active {})",
        card.name,
        card.date_last_activity.format("%Y-%m-%d %H:%M")
    );
    if !prompter.confirm(Prompt::new("Is this the right card?", &text))? {
        return Ok(None);
    }

    let list = match checklist {
        Some(name) => card.checklist(name)?,
        None => match card.checklists.as_slice() {
            [] => return Ok(Some(Vec::new())),
            [only] => only,
            lists => {
                let names: Vec<String> = lists.iter().map(|c| c.name.clone()).collect();
                match prompter.choose_one(Prompt::new("Choose checklist", &card.name), &names)? {
                    Some(name) => card.checklist(&name)?,
                    None => return Ok(None),
                }
            }
        },
    };

    Ok(Some(
        list.item_names().into_iter().map(String::from).collect(),
    ))
}

/// Open WordNet, offering to download it when missing
fn open_wordnet(base_dir: &Path, config: &Config, prompter: &mut dyn Prompter) -> Result<WordNet> {
    let dir = config.wordnet_dir(base_dir);
    match WordNet::open(&dir) {
        Err(ShoppingError::DatasetMissing { path }) => {
            let text = format!(
                "{} was not found. Download it from {}?",
                path.display(),
                config.wordnet.url
            );
            if !prompter.confirm(Prompt::new("WordNet dataset is missing", &text))? {
                return Err(ShoppingError::DatasetMissing { path });
            }
            let dict = fetch_wordnet(base_dir, config)?;
            WordNet::open(&dict)
        }
        other => other,
    }
}

fn fetch_wordnet(base_dir: &Path, config: &Config) -> Result<PathBuf> {
    println!("Downloading {} ...", config.wordnet.url);
    let dict = fetch_dataset(&config.wordnet.url, &base_dir.join("wordnet"))?;
    println!("{} {}", "Fetched:".green(), dict.display());

    if dict != config.wordnet_dir(base_dir) {
        println!(
            "{} wordnet.dir points to {}; set it to {} to use the download",
            "Note:".yellow(),
            config.wordnet_dir(base_dir).display(),
            dict.display()
        );
    }
    Ok(dict)
}

// =============================================================================
// Sort
// =============================================================================

fn handle_sort(
    base_dir: &Path,
    card_path: &Path,
    shop: &str,
    by_category: bool,
    output: Option<&Path>,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let route = config.shop(shop)?;
    let card = load_shopping_card(card_path)?;

    let checklists = if by_category {
        let store = CategoryStore::open_in(base_dir)?;
        sort_with(&card, route, &store)?
    } else {
        sort_with(&card, route, &config.departments)?
    };
    let sorted = Card { checklists, ..card };

    println!();
    println!("{} {} ({})", "Route:".bold(), shop.cyan(), route.departments().join(" -> "));
    for checklist in &sorted.checklists {
        println!();
        println!("{}", checklist.name.bold());
        for item in &checklist.check_items {
            println!("  {:>3}. {}", item.pos, item.name);
        }
    }
    println!();

    if let Some(output) = output {
        sorted.save(output)?;
        println!("{} {}", "Saved:".green(), output.display());
    }

    Ok(())
}

fn sort_with(card: &Card, route: &Route, lookup: &dyn DepartmentLookup) -> Result<Vec<Checklist>> {
    tracing::debug!(card = %card.name, checklists = card.checklists.len(), "sorting card");
    sort_card(card, route, lookup)
}

// =============================================================================
// Stored data
// =============================================================================

fn handle_show(target: ShowTarget, base_dir: &Path) -> Result<()> {
    println!();
    match target {
        ShowTarget::Categories => {
            let store = CategoryStore::open_in(base_dir)?;
            for category in store.known_categories() {
                println!("  {}", category.cyan());
            }
        }
        ShowTarget::Synonyms => {
            let store = CategoryStore::open_in(base_dir)?;
            for (hypernym, category) in store.category_synonyms() {
                println!("  {} -> {}", hypernym, category.cyan());
            }
        }
        ShowTarget::Items => {
            let store = CategoryStore::open_in(base_dir)?;
            if store.item_categories().is_empty() {
                println!("  {}", "(no items categorized yet)".dimmed());
            }
            for (item, category) in store.item_categories() {
                println!("  {} -> {}", item, category.cyan());
            }
        }
        ShowTarget::Shops => {
            let config = Config::load(base_dir)?;
            for (name, route) in &config.shops {
                println!("  {}: {}", name.cyan(), route.departments().join(" -> "));
            }
        }
        ShowTarget::Departments => {
            let config = Config::load(base_dir)?;
            if config.departments.is_empty() {
                println!("  {}", "(no departments set)".dimmed());
            }
            for (item, department) in config.departments.iter() {
                println!("  {} -> {}", item, department.cyan());
            }
        }
    }
    println!();

    Ok(())
}

fn handle_category(action: CategoryAction, base_dir: &Path) -> Result<()> {
    match action {
        CategoryAction::Add { name } => {
            let category = non_empty_key("category", &name)?;
            let mut store = CategoryStore::open_in(base_dir)?;
            store.add_category(&category)?;
            println!("{} {}", "Added category:".green(), category);
        }
    }

    Ok(())
}

fn handle_synonym(action: SynonymAction, base_dir: &Path) -> Result<()> {
    match action {
        SynonymAction::Add { hypernym, category } => {
            let hypernym = non_empty_key("hypernym", &hypernym)?;
            let category = non_empty_key("category", &category)?;
            let mut store = CategoryStore::open_in(base_dir)?;
            store.add_category(&category)?;
            store.add_category_synonym(&hypernym, &category)?;
            println!("{} {} -> {}", "Added synonym:".green(), hypernym, category);
        }
    }

    Ok(())
}

fn handle_shop(action: ShopAction, base_dir: &Path) -> Result<()> {
    let mut config = Config::load(base_dir)?;
    match action {
        ShopAction::Add { name, departments } => {
            let route = Route::new(departments);
            println!(
                "{} {}: {}",
                "Saved shop:".green(),
                name,
                route.departments().join(" -> ")
            );
            config.shops.insert(name, route);
        }
        ShopAction::Remove { name } => {
            if config.shops.remove(&name).is_none() {
                return Err(ShoppingError::ShopNotFound { name });
            }
            println!("{} {}", "Removed shop:".green(), name);
        }
    }
    config.save(base_dir)
}

fn handle_department(action: DepartmentAction, base_dir: &Path) -> Result<()> {
    match action {
        DepartmentAction::Set { item, department } => {
            let mut config = Config::load(base_dir)?;
            config.departments.set(&item, &department);
            config.save(base_dir)?;
            println!("{} {} -> {}", "Set:".green(), normalize_key(&item), department);
        }
    }

    Ok(())
}

fn non_empty_key(what: &str, text: &str) -> Result<String> {
    let key = normalize_key(text);
    if key.is_empty() {
        return Err(ShoppingError::InvalidConfigValue {
            key: what.to_string(),
            message: format!("'{}' has no usable characters", text),
        });
    }
    Ok(key)
}

// =============================================================================
// Create
// =============================================================================

fn handle_create(output: &Path, name: &str) -> Result<()> {
    let mut prompter = TerminalPrompter::stdio();

    let mut items: Vec<String> = Vec::new();
    loop {
        let text = format!("{} item(s) so far; leave blank to finish", items.len());
        match prompter.ask_text(Prompt::new("Add shopping item", &text))? {
            Some(item) => items.push(item),
            None => break,
        }
    }

    if items.is_empty() {
        println!("No items entered.");
        return Ok(());
    }

    let text = format!("You've entered: {}", items.join(", "));
    if !prompter.confirm(Prompt::new("Create the card?", &text))? {
        println!("Aborted.");
        return Ok(());
    }

    let card = new_card(name, &items);
    card.save(output)?;
    tracing::info!(path = %output.display(), items = items.len(), "card created");
    println!("{} {}", "Created:".green(), output.display());

    Ok(())
}

fn new_card(name: &str, items: &[String]) -> Card {
    let card_id = Uuid::new_v4().to_string();
    let checklist = Checklist {
        id: Uuid::new_v4().to_string(),
        id_card: card_id.clone(),
        name: "Items".to_string(),
        check_items: items
            .iter()
            .enumerate()
            .map(|(i, item)| CheckItem::new(Uuid::new_v4().to_string(), item.as_str(), i + 1))
            .collect(),
    };

    Card {
        id: card_id,
        name: name.to_string(),
        date_last_activity: Utc::now(),
        checklists: vec![checklist],
    }
}

// =============================================================================
// WordNet
// =============================================================================

fn handle_wordnet(action: WordnetAction, base_dir: &Path) -> Result<()> {
    let config = Config::load(base_dir)?;
    match action {
        WordnetAction::Status => {
            let dir = config.wordnet_dir(base_dir);
            match WordNet::check(&dir) {
                Ok(()) => println!("{} {}", "Available:".green(), dir.display()),
                Err(e) => {
                    println!("{} {}", "Missing:".yellow(), dir.display());
                    println!("  {}", e);
                    println!("  Run `hyper-shopping wordnet fetch` to download it.");
                }
            }
        }
        WordnetAction::Fetch => {
            fetch_wordnet(base_dir, &config)?;
        }
    }

    Ok(())
}

// =============================================================================
// Config
// =============================================================================

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(ShoppingError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
