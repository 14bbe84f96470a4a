use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use log::warn;

use warehouseops::api::statistics::DEFAULT_MOVEMENT_PERIOD;
use warehouseops::catalog::{ProductQuery, SortKey, SortOrder, TypeFilter};
use warehouseops::models::{Product, ProductId};
use warehouseops::session::{login, FileSessionStore, SessionStore};
use warehouseops::{Config, HttpClient, Inventory, SubmitOutcome};

const CURRENCY: &str = "MAD";

#[derive(Parser)]
#[command(name = "warehouseops", about = "Stock management for warehousemen")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with your secret key
    Login { secret_key: String },
    /// Forget the stored session
    Logout,
    /// Your warehouse's figures and your latest edits (default)
    Dashboard,
    /// List products
    Products {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long = "type", default_value = "all")]
        product_type: String,
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,
        #[arg(long)]
        desc: bool,
        /// Only products stocked at your warehouse
        #[arg(long)]
        mine: bool,
    },
    /// Look a product up by barcode
    Scan { barcode: String },
    /// Change your warehouse's quantity of a product by DELTA units
    Adjust {
        product_id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Server-wide statistics
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Price,
    Quantity,
    Supplier,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Price => SortKey::Price,
            SortArg::Quantity => SortKey::Quantity,
            SortArg::Supplier => SortKey::Supplier,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = HttpClient::new(&config)?;
    let store = FileSessionStore::new(&config.session_file);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Login { secret_key } => {
            let session = login(&client, &secret_key).await?;
            store.save(&session)?;
            println!(
                "Signed in as {} (warehouse {})",
                session.name, session.warehouse_id
            );
        }
        Command::Logout => {
            match store.load()? {
                Some(session) => Inventory::start(client, session).end(&store)?,
                None => store.clear()?,
            }
            println!("Signed out");
        }
        Command::Stats => print_server_statistics(&client, &store).await?,
        command => {
            let session = store
                .load()?
                .context("not signed in; run `warehouseops login <secret-key>` first")?;
            let mut inventory =
                Inventory::start(client, session).with_recent_limit(config.recent_edits_limit);
            run(&mut inventory, command).await?;
        }
    }

    Ok(())
}

async fn run(inventory: &mut Inventory<HttpClient>, command: Command) -> Result<()> {
    match command {
        Command::Dashboard => {
            load(inventory).await?;
            let dashboard = inventory.dashboard();
            println!("Warehouse {}", inventory.session().warehouse_id);
            println!("  Total products: {}", dashboard.stats.total_products);
            println!("  Out of stock:   {}", dashboard.stats.out_of_stock);
            println!("  Total value:    {} {}", dashboard.stats.total_value, CURRENCY);
            println!("Recent updates");
            if dashboard.recent.is_empty() {
                println!("  No recent activity");
            }
            for product in &dashboard.recent {
                let at = product.last_edit().map(|e| e.at.as_str()).unwrap_or("-");
                println!("  {}  {}  ({})", product.id, product.name, at);
            }
        }
        Command::Products {
            search,
            product_type,
            sort,
            desc,
            mine,
        } => {
            load(inventory).await?;
            let query = ProductQuery {
                search,
                product_type: TypeFilter::parse(&product_type),
                warehouse: mine.then_some(inventory.session().warehouse_id),
                sort_by: sort.into(),
                order: if desc { SortOrder::Desc } else { SortOrder::Asc },
            };
            for product in query.apply(inventory.repository().products()) {
                print_product(product);
            }
        }
        Command::Scan { barcode } => match inventory.lookup_barcode(&barcode).await? {
            Some(product) => print_product(&product),
            None => println!("Product not found"),
        },
        Command::Adjust { product_id, delta } => {
            load(inventory).await?;
            let id = ProductId::new(product_id);
            let Some(mut edit) = inventory.begin_edit(&id) else {
                bail!(
                    "product {} has no stock entry at warehouse {}",
                    id,
                    inventory.session().warehouse_id
                );
            };

            edit.shift(delta);

            let warehouse_id = inventory.session().warehouse_id;
            let outcome = inventory
                .submit_edit(&mut edit, |product| {
                    if let Some(stock) = product.stock_for(warehouse_id) {
                        println!("{} now has {} units here", product.name, stock.quantity);
                    }
                })
                .await?;
            if outcome == SubmitOutcome::Unchanged {
                println!("Quantity unchanged");
            }
        }
        Command::Login { .. } | Command::Logout | Command::Stats => {}
    }
    Ok(())
}

async fn load(inventory: &mut Inventory<HttpClient>) -> Result<()> {
    inventory.refresh().await.context("Error loading products")
}

fn print_product(product: &Product) {
    let stock = if product.stocks.is_empty() {
        "out of stock".to_string()
    } else {
        format!("{} in stock", product.total_quantity())
    };
    println!(
        "{}  {}  [{}]  {}  {}  {}",
        product.id,
        product.name,
        product.product_type,
        product.supplier,
        price_label(product),
        stock
    );
}

fn price_label(product: &Product) -> String {
    match product.solde {
        Some(solde) => format!("{} {} (was {} {})", product.price, CURRENCY, solde, CURRENCY),
        None => format!("{} {}", product.price, CURRENCY),
    }
}

async fn print_server_statistics(client: &HttpClient, store: &FileSessionStore) -> Result<()> {
    println!("Total products: {}", client.total_products().await);
    println!("Out of stock:   {}", client.out_of_stock().await);
    println!("Stock value:    {} {}", client.total_stock_value().await, CURRENCY);

    match client.most_moved_products(DEFAULT_MOVEMENT_PERIOD).await {
        Ok(moved) => println!("Most moved ({}): {}", DEFAULT_MOVEMENT_PERIOD, moved),
        Err(err) => warn!("Error fetching most moved products: {}", err),
    }

    if let Some(session) = store.load()? {
        match client.warehouse_statistics(session.warehouse_id).await {
            Ok(stats) => println!("Warehouse {}: {}", session.warehouse_id, stats),
            Err(err) => warn!("Error fetching warehouse statistics: {}", err),
        }
    }
    Ok(())
}
