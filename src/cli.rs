use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::str::FromStr;

use crate::commands::{
    BrowseOptions, cmd_browse, cmd_cart_add, cmd_cart_clear, cmd_cart_login, cmd_cart_logout,
    cmd_cart_remove, cmd_cart_show, cmd_cart_update, cmd_config_get, cmd_config_set,
    cmd_config_show, cmd_locale, cmd_url_build, cmd_url_parse,
};
use crate::config::Config;
use crate::error::Result;
use crate::query::{ListFilters, SortOption, parse_status_filter};
use crate::remote::{ApiClient, ResourceSource};
use crate::store::CartItem;
use crate::types::{Locale, OrderStatus, VALID_LOCALES};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse a marketplace catalogue from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format flags shared by every command.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Flags shared by the list-browsing commands.
#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    /// Items per page (default: config per_page)
    #[arg(long, value_parser = parse_positive)]
    pub per_page: Option<u32>,

    /// Stop after this many items
    #[arg(long)]
    pub limit: Option<usize>,

    /// Viewport height in rows
    #[arg(long, default_value_t = crate::commands::DEFAULT_ROWS, value_parser = parse_positive)]
    pub rows: u32,

    /// Print the filter URL for this view
    #[arg(long)]
    pub url: bool,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the product catalogue
    #[command(visible_alias = "p")]
    Products {
        /// Category ids, comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        category: Vec<u64>,

        /// Shop ids, comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        shop: Vec<u64>,

        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// Browse trending products
    Trending {
        /// Category ids, comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        category: Vec<u64>,

        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// Browse new arrivals
    NewArrivals {
        /// Sort order: newest, oldest, price_asc, price_desc, popular
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Filter options (category ids), comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        filter: Vec<u64>,

        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// Browse deals of the day
    Deals {
        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// Browse promotions
    Promotions {
        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// List product categories
    Categories {
        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// Browse a merchant's order items
    Orders {
        /// Merchant id
        #[arg(long)]
        merchant: u64,

        /// Category ids, comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        category: Vec<u64>,

        /// Status code or name (pending, confirmed, shipped, cancelled, rejected, completed, all)
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// Browse a customer's orders
    MyOrders {
        /// User id
        #[arg(long)]
        user: u64,

        /// Status code or name (pending, confirmed, shipped, cancelled, rejected, completed, all)
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        browse: BrowseArgs,
    },

    /// Build or parse a filter URL
    Url {
        /// Location (path or absolute URL)
        location: String,

        /// Print the filter state encoded in the location instead
        #[arg(long)]
        parse: bool,

        /// Sort order
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Filter options, comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        filter: Vec<u64>,

        /// Category ids, comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        category: Vec<u64>,

        /// Shop ids, comma-separated
        #[arg(long, value_delimiter = ',', value_parser = parse_id)]
        shop: Vec<u64>,

        /// Status code or name
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Show or set the preferred locale
    Locale {
        /// New locale: en, cn, mm, th
        #[arg(value_parser = parse_locale)]
        locale: Option<Locale>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Get a configuration value (api_base_url, per_page, locale, auth.token)
    Get {
        key: String,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set a configuration value (api_base_url, per_page, locale, auth.token)
    Set {
        key: String,
        value: String,
        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Add a product to the cart
    Add {
        /// Product id
        id: u64,
        /// Product name
        #[arg(long)]
        name: String,
        /// Unit price
        #[arg(long)]
        price: f64,
        /// Merchant id
        #[arg(long)]
        merchant: u64,
        /// Quantity
        #[arg(short, long, default_value_t = 1, value_parser = parse_positive)]
        quantity: u32,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set an item's quantity (0 removes it)
    Update {
        id: u64,
        quantity: u32,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Remove an item
    Remove {
        id: u64,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Remove every item
    Clear {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Switch to a user's cart, merging the guest cart into it
    Login {
        user: String,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Switch back to the guest cart
    Logout {
        #[command(flatten)]
        output: OutputOptions,
    },
}

/// API client and browse options for a list command.
fn browse_setup(
    args: BrowseArgs,
    filters: ListFilters,
    sort: SortOption,
) -> Result<(ApiClient, BrowseOptions, OutputOptions)> {
    let config = Config::load()?;
    let client = ApiClient::from_config(&config)?;
    let options = BrowseOptions {
        filters,
        sort,
        per_page: args.per_page.unwrap_or(config.per_page),
        limit: args.limit,
        rows: args.rows,
        show_url: args.url,
        locale: config.locale,
    };
    Ok((client, options, args.output))
}

impl Commands {
    /// Execute the parsed command
    pub async fn run(self) -> Result<()> {
        match self {
            Commands::Products {
                category,
                shop,
                browse,
            } => {
                let filters = ListFilters::new()
                    .with_categories(category)
                    .with_shops(shop);
                let (client, options, output) =
                    browse_setup(browse, filters, SortOption::default())?;
                cmd_browse(ResourceSource::products(client), options, output).await
            }

            Commands::Trending { category, browse } => {
                let filters = ListFilters::new().with_categories(category);
                let (client, options, output) =
                    browse_setup(browse, filters, SortOption::default())?;
                cmd_browse(ResourceSource::trending(client), options, output).await
            }

            Commands::NewArrivals {
                sort,
                filter,
                browse,
            } => {
                let filters = ListFilters::new().with_options(filter);
                let (client, options, output) =
                    browse_setup(browse, filters, SortOption::from(sort))?;
                cmd_browse(ResourceSource::new_arrivals(client), options, output).await
            }

            Commands::Deals { browse } => {
                let (client, options, output) =
                    browse_setup(browse, ListFilters::new(), SortOption::default())?;
                cmd_browse(ResourceSource::deals(client), options, output).await
            }

            Commands::Promotions { browse } => {
                let (client, options, output) =
                    browse_setup(browse, ListFilters::new(), SortOption::default())?;
                cmd_browse(ResourceSource::promotions(client), options, output).await
            }

            Commands::Categories { browse } => {
                let (client, options, output) =
                    browse_setup(browse, ListFilters::new(), SortOption::default())?;
                cmd_browse(ResourceSource::categories(client), options, output).await
            }

            Commands::Orders {
                merchant,
                category,
                status,
                browse,
            } => {
                let filters = ListFilters::new()
                    .with_categories(category)
                    .with_status(parse_status_arg(status.as_deref())?);
                let (client, options, output) =
                    browse_setup(browse, filters, SortOption::default())?;
                cmd_browse(
                    ResourceSource::merchant_orders(client, merchant),
                    options,
                    output,
                )
                .await
            }

            Commands::MyOrders {
                user,
                status,
                browse,
            } => {
                let filters =
                    ListFilters::new().with_status(parse_status_arg(status.as_deref())?);
                let (client, options, output) =
                    browse_setup(browse, filters, SortOption::default())?;
                cmd_browse(ResourceSource::customer_orders(client, user), options, output).await
            }

            Commands::Url {
                location,
                parse,
                sort,
                filter,
                category,
                shop,
                status,
                output,
            } => {
                if parse {
                    return cmd_url_parse(&location, output);
                }
                let filters = ListFilters::new()
                    .with_options(filter)
                    .with_categories(category)
                    .with_shops(shop)
                    .with_status(parse_status_arg(status.as_deref())?);
                cmd_url_build(&location, filters, SortOption::from(sort), output)
            }

            Commands::Config { action } => match action {
                ConfigAction::Show { output } => cmd_config_show(output),
                ConfigAction::Get { key, output } => cmd_config_get(&key, output),
                ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
            },

            Commands::Cart { action } => match action {
                CartAction::Show { output } => cmd_cart_show(output),
                CartAction::Add {
                    id,
                    name,
                    price,
                    merchant,
                    quantity,
                    output,
                } => cmd_cart_add(
                    CartItem {
                        id,
                        name,
                        price,
                        quantity,
                        merchant_id: merchant,
                        image: None,
                    },
                    output,
                ),
                CartAction::Update {
                    id,
                    quantity,
                    output,
                } => cmd_cart_update(id, quantity, output),
                CartAction::Remove { id, output } => cmd_cart_remove(id, output),
                CartAction::Clear { output } => cmd_cart_clear(output),
                CartAction::Login { user, output } => cmd_cart_login(&user, output),
                CartAction::Logout { output } => cmd_cart_logout(output),
            },

            Commands::Locale { locale, output } => cmd_locale(locale, output),

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Parse a `--status` value: a code, a status name, or `all`.
fn parse_status_arg(s: Option<&str>) -> Result<Option<u32>> {
    let Some(s) = s else {
        return Ok(None);
    };
    match parse_status_filter(s) {
        Ok(status) => Ok(status),
        Err(e) => OrderStatus::from_str(s)
            .map(|status| Some(status.code()))
            .map_err(|_| e),
    }
}

fn parse_id(s: &str) -> std::result::Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid id '{s}'. Must be a positive integer")),
    }
}

fn parse_positive(s: &str) -> std::result::Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid value '{s}'. Must be a positive integer")),
    }
}

fn parse_locale(s: &str) -> std::result::Result<Locale, String> {
    Locale::from_str(s)
        .map_err(|_| format!("Invalid locale. Must be one of: {}", VALID_LOCALES.join(", ")))
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "storefront", &mut io::stdout());
}
