//! kitstock CLI
//!
//! Command-line interface for building the shop's catalog CSVs from the
//! media-library listing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use kitstock_catalog::{EntityKind, NameOptions, RawAsset, canonical_name};
use kitstock_recon::{
    CoverCandidate, FilterOptions, RunSummary, filter_product_assets, group_assets, is_image_key,
    merge_covers, merge_products,
};
use kitstock_source::{CloudinaryClient, Credentials, ListLocation, list_all};

#[derive(Parser)]
#[command(name = "kitstock")]
#[command(about = "Build catalog CSVs from the media-library listing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Common arguments for extraction commands.
#[derive(Args, Clone)]
struct TableArgs {
    /// Output CSV path (defaults to the kind's standard table name)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Show what would be appended without writing
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract collection covers into collections.csv
    Collections {
        /// Asset folder holding the collection covers
        #[arg(long, default_value = "portada-collections")]
        folder: String,

        /// Treat the location as a flat key prefix instead of a folder
        #[arg(long)]
        prefix: bool,

        /// Slug suffix disambiguating the shared URL namespace (empty for none)
        #[arg(long, default_value = "-coleccion", allow_hyphen_values = true)]
        slug_suffix: String,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Extract capsule covers into capsule.csv
    Capsules {
        /// Asset folder holding the capsule covers
        #[arg(long, default_value = "portada-capsule")]
        folder: String,

        /// Treat the location as a flat key prefix instead of a folder
        #[arg(long)]
        prefix: bool,

        /// Slug suffix disambiguating the shared URL namespace (empty for none)
        #[arg(long, default_value = "-coleccion", allow_hyphen_values = true)]
        slug_suffix: String,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Extract multi-image products into products.csv
    Products {
        /// Asset folder to list (defaults to the whole library)
        #[arg(long)]
        folder: Option<String>,

        /// Treat the location as a flat key prefix instead of a folder
        #[arg(long)]
        prefix: bool,

        /// Exclusion list of filenames (without extension) to ignore
        #[arg(long, default_value = "delete.txt")]
        exclude: PathBuf,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Manage media-library credentials configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current credentials and their sources
    Show,

    /// Print the config file path
    Path,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Collections {
            folder,
            prefix,
            slug_suffix,
            table,
        } => {
            run_covers(EntityKind::Collection, folder, prefix, slug_suffix, table);
        }
        Commands::Capsules {
            folder,
            prefix,
            slug_suffix,
            table,
        } => {
            run_covers(EntityKind::Capsule, folder, prefix, slug_suffix, table);
        }
        Commands::Products {
            folder,
            prefix,
            exclude,
            table,
        } => {
            run_products(folder, prefix, exclude, table);
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::Path => run_config_path(),
        },
    }
}

/// Run one cover-kind extraction (collections or capsules).
fn run_covers(
    kind: EntityKind,
    folder: String,
    as_prefix: bool,
    slug_suffix: String,
    table: TableArgs,
) {
    let csv_path = table
        .csv
        .unwrap_or_else(|| PathBuf::from(kind.default_table()));
    let location = if as_prefix {
        ListLocation::Prefix(folder)
    } else {
        ListLocation::Folder(folder)
    };
    let suffix = if slug_suffix.is_empty() {
        None
    } else {
        Some(slug_suffix.as_str())
    };

    println!(
        "Extracting {}s from {}",
        kind.label(),
        location.if_supports_color(Stdout, |t| t.cyan()),
    );
    if table.dry_run {
        println!(
            "{}",
            "Dry run: the table will not be written".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!();

    let assets = match fetch_listing(&location) {
        Some(a) => a,
        None => return,
    };

    let mut summary = RunSummary {
        total_listed: assets.len(),
        ..Default::default()
    };

    let name_options = NameOptions::cover();
    let mut candidates = Vec::new();
    for asset in &assets {
        if !is_image_key(&asset.storage_key) {
            summary.non_images += 1;
            continue;
        }
        candidates.push(CoverCandidate {
            name: canonical_name(asset.stem(), &name_options),
            url: asset.url.clone(),
        });
    }

    let persisted = kitstock_store::load_covers(&csv_path);
    println!(
        "  {} existing entries in {}",
        persisted.existing,
        csv_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let merged = merge_covers(&candidates, &persisted, suffix);
    summary.created = merged.stats.created;
    summary.skipped_existing = merged.stats.skipped_existing;

    print_new_covers(&merged.created);

    if table.dry_run {
        println!(
            "  {}",
            format!("Dry run: {} would be appended", merged.created.len())
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    } else if let Err(e) = kitstock_store::append_covers(&csv_path, &merged.created) {
        eprintln!(
            "{} Error writing {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            csv_path.display(),
            e,
        );
        std::process::exit(1);
    }

    print_summary(&summary, persisted.existing);
}

/// Run the product extraction.
fn run_products(folder: Option<String>, as_prefix: bool, exclude: PathBuf, table: TableArgs) {
    let csv_path = table
        .csv
        .unwrap_or_else(|| PathBuf::from(EntityKind::Product.default_table()));
    let location = match folder {
        Some(f) if !as_prefix => ListLocation::Folder(f),
        Some(f) => ListLocation::Prefix(f),
        None => ListLocation::Prefix(String::new()),
    };

    println!(
        "Extracting products from {}",
        location.if_supports_color(Stdout, |t| t.cyan()),
    );
    if table.dry_run {
        println!(
            "{}",
            "Dry run: the table will not be written".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!();

    let assets = match fetch_listing(&location) {
        Some(a) => a,
        None => return,
    };

    let mut summary = RunSummary {
        total_listed: assets.len(),
        ..Default::default()
    };

    let (kept, filter_stats) = filter_product_assets(assets, &FilterOptions::default());
    summary.non_images = filter_stats.non_images;
    summary.covers_filtered = filter_stats.covers;
    summary.samples_filtered = filter_stats.samples;

    let exclusions = kitstock_store::load_exclusions(&exclude);
    let grouped = group_assets(&kept, &exclusions, &NameOptions::product());
    summary.excluded = grouped.stats.excluded;
    summary.duplicates = grouped.stats.duplicates;

    println!("  {} unique products in the listing", grouped.groups.len());

    let persisted = kitstock_store::load_products(&csv_path);
    println!(
        "  {} existing entries in {}",
        persisted.existing,
        csv_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let merged = merge_products(&grouped.groups, &persisted);
    summary.created = merged.stats.created;
    summary.skipped_existing = merged.stats.skipped_existing;

    print_new_products(&merged.created);

    if table.dry_run {
        println!(
            "  {}",
            format!("Dry run: {} would be appended", merged.created.len())
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    } else if let Err(e) = kitstock_store::append_products(&csv_path, &merged.created) {
        eprintln!(
            "{} Error writing {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            csv_path.display(),
            e,
        );
        std::process::exit(1);
    }

    print_summary(&summary, persisted.existing);
}

/// Load credentials, connect, and drain the listing with a spinner.
///
/// Listing and credential failures are fatal to the run: nothing has been
/// written yet, so aborting here leaves the tables untouched.
fn fetch_listing(location: &ListLocation) -> Option<Vec<RawAsset>> {
    let credentials = match Credentials::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "{} Failed to load media-library credentials: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            eprintln!();
            eprintln!("Set credentials via environment variables:");
            eprintln!("  CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY, CLOUDINARY_API_SECRET");
            eprintln!();
            eprintln!("Or create ~/.config/kitstock/credentials.toml");
            return None;
        }
    };

    let client = match CloudinaryClient::new(credentials) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "{} Failed to create media-library client: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return None;
        }
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message("Listing stored files...");
    pb.enable_steady_tick(Duration::from_millis(100));

    match list_all(&client, location, |pages, total| {
        pb.set_message(format!("Fetched {total} files across {pages} pages"));
    }) {
        Ok(assets) => {
            pb.finish_and_clear();
            if assets.is_empty() {
                println!(
                    "{}",
                    format!("No files found at {location}").if_supports_color(Stdout, |t| t.dimmed()),
                );
                return None;
            }
            println!("  {} files listed", assets.len());
            Some(assets)
        }
        Err(e) => {
            pb.finish_and_clear();
            eprintln!(
                "{} Listing failed: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            None
        }
    }
}

/// Preview the first few new cover entities.
fn print_new_covers(created: &[kitstock_catalog::CoverEntity]) {
    for entity in created.iter().take(5) {
        println!(
            "  {} {} {} {}",
            "+".if_supports_color(Stdout, |t| t.green()),
            entity.name.if_supports_color(Stdout, |t| t.bold()),
            format!("[{}]", entity.slug).if_supports_color(Stdout, |t| t.dimmed()),
            format!("#{}", entity.id).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if created.len() > 5 {
        println!(
            "  {}",
            format!("... and {} more", created.len() - 5).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Preview the first few new products.
fn print_new_products(created: &[kitstock_catalog::ProductEntity]) {
    for product in created.iter().take(5) {
        println!(
            "  {} {} {}",
            "+".if_supports_color(Stdout, |t| t.green()),
            product.name.if_supports_color(Stdout, |t| t.bold()),
            format!("({} images)", product.images.len()).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if created.len() > 5 {
        println!(
            "  {}",
            format!("... and {} more", created.len() - 5).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Print the audit summary for a run.
fn print_summary(summary: &RunSummary, existing: usize) {
    println!();
    println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    println!("  {} files listed", summary.total_listed);
    if summary.non_images > 0 {
        println!(
            "  {}",
            format!("{} non-image keys ignored", summary.non_images)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if summary.covers_filtered > 0 {
        println!(
            "  {}",
            format!("{} cover images filtered out", summary.covers_filtered)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if summary.samples_filtered > 0 {
        println!(
            "  {}",
            format!("{} sample images filtered out", summary.samples_filtered)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if summary.excluded > 0 {
        println!(
            "  {} {} files skipped via the exclusion list",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.excluded,
        );
    }
    if summary.duplicates > 0 {
        println!(
            "  {} {} duplicate images dropped (same name and position)",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.duplicates,
        );
    }
    println!(
        "  {} {} new entries",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.created,
    );
    if summary.skipped_existing > 0 {
        println!("  {} already existing, left untouched", summary.skipped_existing);
    }
    println!("  {} total entries in the table", existing + summary.created);
}

// -- Config subcommands --

/// Mask a string, showing only the first 2 characters.
fn mask_value(s: &str) -> String {
    if s.len() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", &s[..2])
    }
}

/// Show current credentials and their sources.
fn run_config_show() {
    let path = kitstock_source::config_path();
    let sources = kitstock_source::credential_sources();

    println!(
        "{}",
        "Media Library Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    match &path {
        Some(p) if p.exists() => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            println!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    println!();

    let creds = Credentials::load().ok();
    let fields: &[(&str, &kitstock_source::CredentialSource, Option<String>)] = &[
        (
            "cloud_name",
            &sources.cloud_name,
            creds.as_ref().map(|c| c.cloud_name.clone()),
        ),
        (
            "api_key",
            &sources.api_key,
            creds.as_ref().map(|c| c.api_key.clone()),
        ),
        (
            "api_secret",
            &sources.api_secret,
            creds.as_ref().map(|c| mask_value(&c.api_secret)),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => {
                println!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                println!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }
}

/// Print the config file path.
fn run_config_path() {
    match kitstock_source::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    }
}
