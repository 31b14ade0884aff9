use clap::{Parser, Subcommand};
use showroom::album::{AlbumError, AlbumId, AlbumStore, FilePort};
use showroom::catalog::{Catalog, CatalogView, GalleryQuery};
use showroom::config::{self, ShowroomConfig};
use showroom::crawl::OsLister;
use showroom::drag::DragController;
use showroom::model_images::resolve_model_images;
use showroom::partition::Partitioner;
use showroom::slug::SlugResolver;
use showroom::{output, render};
use std::path::{Path, PathBuf};
use tracing::Level;

fn version_string() -> &'static str {
    let hash = env!("SHOWROOM_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "showroom")]
#[command(about = "Image catalog, product partitions, and curated albums")]
#[command(long_about = "\
Image catalog, product partitions, and curated albums

Every image under the catalog root is listed with its parent folder as its
category. Product folders under the models root are split into exterior and
interior images. Albums are named, ordered collections of catalog paths,
stored in a JSON file under the album store directory.

Layout:

  public/images/
  ├── cover.png                    # Category: General
  ├── Events/
  │   └── launch.webp              # Category: Events
  └── models/
      ├── orbit-7/                 # Organized product folder
      │   ├── exterior/01.jpg
      │   └── interior/01.jpg
      └── voyager_xl/              # Flat folder (slug 'voyager-xl')
          └── 01.jpg

Run 'showroom gen-config' to generate a documented showroom.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding showroom.toml; relative paths in it resolve here
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog images grouped by category
    Catalog {
        /// Only this category ("all" for every category)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive substring of the file name
        #[arg(long)]
        search: Option<String>,
        /// Print the fetch payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// List category labels, general label first
    Categories,
    /// Render the gallery page with album drop targets
    Gallery {
        /// Output HTML file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Resolve a product's images and split them into exterior/interior
    Model {
        slug: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Write the product page HTML to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Print the asset folder a product slug maps to
    Resolve { slug: String },
    /// Manage curated albums
    #[command(subcommand)]
    Album(AlbumCommand),
    /// Print a stock showroom.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum AlbumCommand {
    /// List albums and their images
    List,
    /// Create an empty album
    Create { name: String },
    /// Delete an album
    Delete { id: AlbumId },
    /// Add an image path to an album
    Add { id: AlbumId, path: String },
    /// Remove an image path from an album
    Remove { id: AlbumId, path: String },
    /// Drag an image onto an album
    Drop { id: AlbumId, path: String },
    /// Render an album page
    Render {
        id: AlbumId,
        /// Output HTML file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    run(cli.command, &cli.config_dir)
}

fn run(command: Command, config_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Only gen-config runs without a loadable showroom.toml.
    let load = || config::load_config(config_dir);

    match command {
        Command::GenConfig => print!("{}", config::stock_config_toml()),
        Command::Catalog {
            category,
            search,
            json,
        } => {
            let config = load()?;
            let catalog = Catalog::new(OsLister, config.catalog.clone());
            if json && category.is_none() && search.is_none() {
                println!("{}", serde_json::to_string_pretty(&catalog.fetch())?);
            } else {
                let query = GalleryQuery { category, search };
                let assets = catalog.query(&query);
                if json {
                    let entries: Vec<_> = assets
                        .iter()
                        .map(showroom::catalog::CatalogEntry::from)
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else {
                    let categories = catalog.categories(&assets);
                    output::print_lines(&output::format_catalog(&assets, &categories));
                }
            }
        }
        Command::Categories => {
            let config = load()?;
            let catalog = Catalog::new(OsLister, config.catalog.clone());
            for category in catalog.categories(&catalog.scan()) {
                println!("{category}");
            }
        }
        Command::Gallery { out } => {
            let config = load()?;
            let catalog = Catalog::new(OsLister, config.catalog.clone());
            let view = CatalogView::load(&catalog);
            let store = open_store(&config)?;
            let html = render::render_gallery_page(&view, store.list_albums()).into_string();
            write_html(out.as_deref(), &html)?;
        }
        Command::Model { slug, json, html } => {
            let config = load()?;
            let resolver = SlugResolver::new(&config.slugs);
            let set = resolve_model_images(&OsLister, &resolver, &config.models, &slug);
            let partition = set.partition(&Partitioner::new(&config.partition));
            if json {
                let value = serde_json::json!({
                    "slug": &set.slug,
                    "images": &set.images,
                    "exterior": &partition.exterior,
                    "interior": &partition.interior,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let folder = resolver.resolve(&slug);
                output::print_lines(&output::format_partition(&set, &folder, &partition));
            }
            if let Some(path) = html {
                let page = render::render_model_page(&set, &partition).into_string();
                write_html(Some(path.as_path()), &page)?;
            }
        }
        Command::Resolve { slug } => {
            let config = load()?;
            println!("{}", SlugResolver::new(&config.slugs).resolve(&slug));
        }
        Command::Album(cmd) => run_album_command(cmd, &load()?)?,
    }

    Ok(())
}

fn run_album_command(
    cmd: AlbumCommand,
    config: &ShowroomConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;

    match cmd {
        AlbumCommand::List => {
            output::print_lines(&output::format_albums(store.list_albums()));
        }
        AlbumCommand::Create { name } => {
            let album = store.create_album(&name)?;
            println!("Created album {} ({})", album.id, album.name);
        }
        AlbumCommand::Delete { id } => {
            store.delete_album(id)?;
            println!("Deleted album {id}");
        }
        AlbumCommand::Add { id, path } => {
            let outcome = store.add_image(id, &path)?;
            report_add(&store, id, &path, outcome);
        }
        AlbumCommand::Remove { id, path } => {
            if store.remove_image(id, &path)? {
                println!("Removed {path}");
            } else {
                println!("{path} was not in album {id}");
            }
        }
        AlbumCommand::Drop { id, path } => {
            let mut drag = DragController::new();
            drag.begin(path.clone());
            if let Some(outcome) = drag.drop_on(&mut store, id)? {
                report_add(&store, id, &path, outcome);
            }
        }
        AlbumCommand::Render { id, out } => {
            let album = store
                .album(id)
                .ok_or(AlbumError::NotFound(id))?;
            let assets = Catalog::new(OsLister, config.catalog.clone()).scan();
            let html = render::render_album_page(album, &assets).into_string();
            write_html(out.as_deref(), &html)?;
        }
    }
    Ok(())
}

fn open_store(config: &ShowroomConfig) -> Result<AlbumStore<FilePort>, AlbumError> {
    AlbumStore::open(FilePort::new(
        &config.albums.store_dir,
        &config.albums.namespace,
    ))
}

fn report_add(
    store: &AlbumStore<FilePort>,
    id: AlbumId,
    path: &str,
    outcome: showroom::album::AddOutcome,
) {
    if let Some(album) = store.album(id) {
        println!("{}", output::format_add_outcome(album, path, outcome));
    }
}

fn write_html(out: Option<&Path>, html: &str) -> std::io::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, html)?;
            tracing::info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            println!("{html}");
            Ok(())
        }
    }
}
