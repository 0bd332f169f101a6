use std::{num::NonZeroU32, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{CatalogApi, DetailLoader, FetchClient, ListingController, RecordTarget};
use shared::domain::{DepartmentId, ProductId, Resource};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod browse;
mod config;
mod render;

#[derive(Parser, Debug)]
#[command(name = "catalog-browser", about = "Browse the product catalog from a terminal")]
struct Args {
    /// Catalog API base URL, e.g. http://localhost:8080/api
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    #[arg(long, global = true)]
    page_size: Option<u32>,
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products, optionally searched or narrowed to a category or brand
    Products {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, conflicts_with = "brand")]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
    },
    /// List one department's products under its header
    Department {
        id: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Departments,
    /// Show a single product
    Product { id: i64 },
    /// Page through a listing interactively
    Browse {
        #[arg(long)]
        department: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let overrides = config::Overrides {
        api_base_url: args.api_base_url.clone(),
        request_timeout_ms: args.timeout_ms,
        page_size: args.page_size,
    };
    let settings = config::load_settings(&args.config, &overrides)?;
    let page_size = NonZeroU32::new(settings.page_size).context("page size must be positive")?;
    info!(
        api = %settings.api_base_url,
        timeout_ms = settings.request_timeout_ms,
        page_size = page_size.get(),
        "catalog browser starting"
    );

    let fetch = FetchClient::new(settings.api_base_url.clone())
        .with_timeout(Duration::from_millis(settings.request_timeout_ms));
    let api = Arc::new(CatalogApi::new(fetch));

    match args.command {
        Command::Products {
            page,
            search,
            category,
            brand,
        } => {
            let base = match (category, brand) {
                (Some(category), _) => Resource::ProductsByCategory(category),
                (None, Some(brand)) => Resource::ProductsByBrand(brand),
                (None, None) => Resource::AllProducts,
            };
            let mut listing = ListingController::new(api, base, page_size);
            let page = page.saturating_sub(1);
            match search {
                Some(term) => listing.mount_search(&term, page),
                None => listing.mount_at(page),
            }
            listing.settle().await;
            finish_listing(listing)
        }
        Command::Department { id, page } => {
            let base = Resource::ProductsByDepartment(DepartmentId(id));
            let mut listing = ListingController::new(api, base, page_size);
            listing.mount_at(page.saturating_sub(1));
            listing.settle().await;
            finish_listing(listing)
        }
        Command::Departments => {
            let mut listing = ListingController::new(api, Resource::Departments, page_size);
            listing.mount();
            listing.settle().await;
            finish_listing(listing)
        }
        Command::Product { id } => {
            let mut loader = DetailLoader::new(api, RecordTarget::Product(ProductId(id)));
            loader.mount();
            loader.settle().await;
            print!("{}", render::detail(&loader));
            match loader.state() {
                client_core::DetailState::Failed(err) => Err(anyhow!("{}: {err}", loader.target())),
                _ => Ok(()),
            }
        }
        Command::Browse { department } => {
            let base = department
                .map(|id| Resource::ProductsByDepartment(DepartmentId(id)))
                .unwrap_or(Resource::AllProducts);
            browse::run(ListingController::new(api, base, page_size)).await
        }
    }
}

fn finish_listing(listing: ListingController) -> Result<()> {
    print!("{}", render::listing(&listing));
    match listing.error() {
        Some(err) => Err(anyhow!("{}: {err}", listing.base())),
        None => Ok(()),
    }
}
