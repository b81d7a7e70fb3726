// koszyk - a shopping list that learns where your groceries belong
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use koszyk_lib::{
    core::{classify, group_by_category, ListService, UNASSIGNED_LABEL},
    db::Shop,
    Database, KoszykError, Result,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Grab whatever the user typed
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    let result = match command.as_str() {
        "list" => handle_list(&args[2..]).await,
        "add" => handle_add(&args[2..]).await,
        "edit" => handle_edit(&args[2..]).await,
        "done" => handle_done(&args[2..]).await,
        "remove" => handle_remove(&args[2..]).await,
        "clear" => handle_clear(&args[2..]).await,
        "shops" => handle_shops().await,
        "add-shop" => handle_add_shop(&args[2..]).await,
        "remove-shop" => handle_remove_shop(&args[2..]).await,
        "categories" => handle_categories().await,
        "add-category" => handle_add_category(&args[2..]).await,
        "remove-category" => handle_remove_category(&args[2..]).await,
        "classify" => handle_classify(&args[2..]).await,
        "status" => handle_status().await,
        "version" | "-v" | "--version" => {
            println!("koszyk v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

/// Parsed `--flag value` pairs plus the leftover positional words
struct ParsedArgs {
    positional: Vec<String>,
    qty: Option<String>,
    category: Option<String>,
    name: Option<String>,
    shop: Option<String>,
}

fn parse_args(args: &[String]) -> ParsedArgs {
    let mut parsed = ParsedArgs {
        positional: Vec::new(),
        qty: None,
        category: None,
        name: None,
        shop: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--qty" => {
                i += 1;
                if i < args.len() {
                    parsed.qty = Some(args[i].clone());
                }
            }
            "--category" => {
                i += 1;
                if i < args.len() {
                    parsed.category = Some(args[i].clone());
                }
            }
            "--name" => {
                i += 1;
                if i < args.len() {
                    parsed.name = Some(args[i].clone());
                }
            }
            "--shop" => {
                i += 1;
                if i < args.len() {
                    parsed.shop = Some(args[i].clone());
                }
            }
            arg => parsed.positional.push(arg.to_string()),
        }
        i += 1;
    }

    parsed
}

/// Resolve a shop by name, or fall back to the default shop
async fn resolve_shop(db: &Database, name: Option<&str>) -> Result<Shop> {
    match name {
        Some(name) => db
            .get_shop_by_name(name)
            .await?
            .ok_or_else(|| KoszykError::ShopNotFound(name.to_string())),
        None => db.ensure_default_shop().await,
    }
}

async fn handle_list(args: &[String]) -> Result<()> {
    let parsed = parse_args(args);
    let db = get_database().await?;
    let shop = resolve_shop(&db, parsed.positional.first().map(String::as_str)).await?;

    let items = db.get_items(shop.id).await?;

    if items.is_empty() {
        println!("Nothing on the list for '{}'.", shop.name);
        return Ok(());
    }

    println!("\n{} ({} items)", shop.name, items.len());
    println!("{}", "=".repeat(60));

    for group in group_by_category(&items) {
        println!("\n{}:", group.label);
        for item in group.items {
            let mark = if item.done { "✓" } else { " " };
            let qty = item
                .qty
                .as_deref()
                .map(|q| format!(" ({})", q))
                .unwrap_or_default();
            println!("  [{}] {:>3}. {}{}", mark, item.id, item.name, qty);
        }
    }

    println!("\n{}", "=".repeat(60));

    Ok(())
}

async fn handle_add(args: &[String]) -> Result<()> {
    let parsed = parse_args(args);

    if parsed.positional.is_empty() {
        eprintln!("Error: no item name provided");
        return Ok(());
    }

    let name = parsed.positional.join(" ");
    let db = Arc::new(get_database().await?);
    let shop = resolve_shop(&db, parsed.shop.as_deref()).await?;

    let service = ListService::new(Arc::clone(&db));
    let added = service
        .add_item(
            shop.id,
            &name,
            parsed.qty.as_deref(),
            parsed.category.as_deref(),
        )
        .await?;

    if added.auto_classified {
        println!(
            "✓ Added '{}' to {} ({})",
            added.item.name, shop.name, added.category
        );
    } else if added.learned {
        println!(
            "✓ Added '{}' to {} ({}) - keyword learned",
            added.item.name, shop.name, added.category
        );
    } else if added.item.category.is_none() {
        println!("✓ Added '{}' to {} ({})", added.item.name, shop.name, UNASSIGNED_LABEL);
        println!("  No category matched. Teach me with:");
        println!("  koszyk edit {} --category <name>", added.item.id);
    } else {
        println!(
            "✓ Added '{}' to {} ({})",
            added.item.name, shop.name, added.category
        );
    }

    Ok(())
}

async fn handle_edit(args: &[String]) -> Result<()> {
    let parsed = parse_args(args);

    let Some(id) = parsed.positional.first().and_then(|s| s.parse::<i64>().ok()) else {
        eprintln!("Error: no item id provided");
        return Ok(());
    };

    let db = Arc::new(get_database().await?);
    let service = ListService::new(Arc::clone(&db));

    let edited = service
        .edit_item(
            id,
            parsed.name.as_deref(),
            parsed.qty.as_deref(),
            parsed.category.as_deref(),
        )
        .await?;

    if edited.learned {
        println!(
            "✓ Updated '{}' ({}) - keyword learned",
            edited.item.name, edited.category
        );
    } else {
        println!("✓ Updated '{}' ({})", edited.item.name, edited.category);
    }

    Ok(())
}

async fn handle_done(args: &[String]) -> Result<()> {
    let Some(id) = args.first().and_then(|s| s.parse::<i64>().ok()) else {
        eprintln!("Error: no item id provided");
        return Ok(());
    };

    let db = get_database().await?;

    let item = db
        .get_item_by_id(id)
        .await?
        .ok_or(KoszykError::ItemNotFound(id))?;
    let done = db.toggle_done(id).await?;

    if done {
        println!("✓ '{}' checked off", item.name);
    } else {
        println!("  '{}' back on the list", item.name);
    }

    Ok(())
}

async fn handle_remove(args: &[String]) -> Result<()> {
    let Some(id) = args.first().and_then(|s| s.parse::<i64>().ok()) else {
        eprintln!("Error: no item id provided");
        return Ok(());
    };

    let db = get_database().await?;

    let item = db
        .get_item_by_id(id)
        .await?
        .ok_or(KoszykError::ItemNotFound(id))?;
    db.delete_item(id).await?;

    println!("✓ Removed '{}'", item.name);

    Ok(())
}

async fn handle_clear(args: &[String]) -> Result<()> {
    let parsed = parse_args(args);
    let db = get_database().await?;
    let shop = resolve_shop(&db, parsed.positional.first().map(String::as_str)).await?;

    db.clear_items(shop.id).await?;
    println!("✓ Cleared all items from '{}'", shop.name);

    Ok(())
}

async fn handle_shops() -> Result<()> {
    let db = get_database().await?;
    let shops = db.get_shops().await?;

    if shops.is_empty() {
        println!("No shops yet. Create one with: koszyk add-shop <name>");
        return Ok(());
    }

    println!("\nShops:");
    println!("{}", "=".repeat(60));
    for shop in shops {
        let items = db.get_items(shop.id).await?;
        let pending = items.iter().filter(|i| !i.done).count();
        println!("  {} ({} open items)", shop.name, pending);
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_add_shop(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: no shop name provided");
        return Ok(());
    }

    let name = args.join(" ");
    let db = get_database().await?;
    let shop = db.create_shop(&name).await?;

    println!("✓ Created shop '{}'", shop.name);

    Ok(())
}

async fn handle_remove_shop(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: no shop name provided");
        return Ok(());
    }

    let name = args.join(" ");
    let db = get_database().await?;

    let shop = db
        .get_shop_by_name(&name)
        .await?
        .ok_or_else(|| KoszykError::ShopNotFound(name.clone()))?;
    db.delete_shop(shop.id).await?;

    println!("✓ Removed shop '{}' and its items", shop.name);

    Ok(())
}

async fn handle_categories() -> Result<()> {
    let db = get_database().await?;
    let categories = db.get_categories().await?;

    if categories.is_empty() {
        println!("No categories yet. Create one with: koszyk add-category <name> [keywords...]");
        return Ok(());
    }

    println!("\nCategories:");
    println!("{}", "=".repeat(60));
    for category in categories {
        let keywords = category.keyword_list();
        if keywords.is_empty() {
            println!("  {} (no keywords yet)", category.name);
        } else {
            println!("  {} - {}", category.name, keywords.join(", "));
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_add_category(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: no category name provided");
        return Ok(());
    }

    let name = &args[0];
    let keywords: Vec<String> = args[1..].to_vec();

    let db = get_database().await?;
    let category = db.create_category(name, &keywords).await?;

    println!(
        "✓ Created category '{}' with {} keyword(s)",
        category.name,
        category.keyword_list().len()
    );

    Ok(())
}

async fn handle_remove_category(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: no category name provided");
        return Ok(());
    }

    let name = args.join(" ");
    let db = get_database().await?;

    let category = db
        .get_category_by_name(&name)
        .await?
        .ok_or_else(|| KoszykError::CategoryNotFound(name.clone()))?;
    db.delete_category(category.id).await?;

    println!("✓ Removed category '{}'", category.name);

    Ok(())
}

async fn handle_classify(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: no item name provided");
        return Ok(());
    }

    let name = args.join(" ");
    let db = get_database().await?;
    let categories = db.get_categories().await?;

    match classify(&name, &categories) {
        Some(category) => println!("'{}' -> {}", name, category),
        None => println!("'{}' -> no match (would go to {})", name, UNASSIGNED_LABEL),
    }

    Ok(())
}

async fn handle_status() -> Result<()> {
    let db = get_database().await?;
    let stats = db.stats().await?;

    println!("\nkoszyk Status");
    println!("{}", "=".repeat(60));
    println!("  Database:   {}", db.path().display());
    println!("  Shops:      {}", stats.total_shops);
    println!("  Categories: {}", stats.total_categories);
    println!("  Items:      {} ({} open)", stats.total_items, stats.pending_items);
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn get_database() -> Result<Database> {
    let home = dirs::home_dir().expect("Could not find home directory");
    let db_path = home.join(".koszyk").join("koszyk.db");
    Database::new(db_path).await
}

fn print_usage() {
    println!(
        r#"koszyk v{} - Your shopping list learns your categories

USAGE:
    koszyk <COMMAND> [OPTIONS]

COMMANDS:
    list [shop]                        Show items grouped by category
    add <name> [--qty Q] [--category C] [--shop S]
                                       Add an item (auto-classified)
    edit <id> [--name N] [--qty Q] [--category C]
                                       Edit an item; overrides teach keywords
    done <id>                          Check an item off (or back on)
    remove <id>                        Remove an item
    clear [shop]                       Remove all items from a shop
    shops                              List shops
    add-shop <name>                    Create a shop
    remove-shop <name>                 Remove a shop and its items
    categories                         Show categories and their keywords
    add-category <name> [keywords...]  Create a category
    remove-category <name>             Remove a category
    classify <name>                    Dry-run the classifier on a name
    status                             Show database statistics
    version                            Show version
    help                               Show this help

EXAMPLES:
    koszyk add-category Nabiał mleko ser masło
    koszyk add "mleko kokosowe" --qty 2
    koszyk add Śrubokręt --category Dom
    koszyk edit 3 --category Owoce
    koszyk list

Items whose names match no keyword land under "{}". Assigning them a
category teaches the matching keywords for next time.
"#,
        env!("CARGO_PKG_VERSION"),
        UNASSIGNED_LABEL
    );
}
