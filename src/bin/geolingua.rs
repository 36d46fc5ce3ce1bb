use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use geolingua::breakdown::group_by_region;
use geolingua::dashboard::{DashboardReport, compute_view};
use geolingua::format::{compact_count, grouped_count, percent};
use geolingua::reach::WORLD_POPULATION;
use geolingua::source::{BuiltinSource, CatalogSource, FileSource, HttpSource};
use geolingua::style::{ColorAssignment, LanguageTokens, fill_style};
use geolingua::{
    Catalog, CatalogStore, CountryBreakdownEntry, Palette, PositionTable, ReachConfig, Selection,
    storage,
};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "geolingua",
    version,
    about = "Explore where languages are spoken: reach, heatmap & per-country breakdown"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Catalog JSON file (`{"languages": [...]}` or a bare array). Defaults to the built-in catalog.
    #[arg(long, global = true, conflicts_with = "url")]
    catalog: Option<PathBuf>,
    /// Fetch the catalog from this URL instead.
    #[arg(long, global = true)]
    url: Option<String>,
    /// JSON map of country code to [lon, lat] or [x, y, z]. Defaults to built-in centroids.
    #[arg(long, global = true)]
    positions: Option<PathBuf>,
    /// Use the built-in 3D globe positions instead of lon/lat centroids.
    #[arg(long, global = true, default_value_t = false)]
    globe: bool,
    /// World population used for the coverage percentage.
    #[arg(long, global = true, default_value_t = WORLD_POPULATION)]
    world_population: u64,
    /// Locale for number grouping (en, de, fr, es, it, pt, nl).
    #[arg(long, global = true, default_value = "en")]
    locale: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List languages in the catalog.
    Languages {
        /// Only show languages whose name contains this text (case-insensitive).
        #[arg(long)]
        search: Option<String>,
    },
    /// Print combined reach for a set of languages.
    Reach(SelectArgs),
    /// Print heatmap features (and optionally write GeoJSON).
    Heatmap {
        #[command(flatten)]
        select: SelectArgs,
        /// Write the features as a GeoJSON FeatureCollection.
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Color languages by their catalog color token instead of the palette.
        #[arg(long, default_value_t = false)]
        catalog_colors: bool,
    },
    /// Print the per-country breakdown.
    Countries {
        #[command(flatten)]
        select: SelectArgs,
        /// Group countries by world region.
        #[arg(long, default_value_t = false)]
        regions: bool,
    },
    /// Write reach, heatmap, and breakdown to a file.
    Report {
        #[command(flatten)]
        select: SelectArgs,
        #[arg(long)]
        out: PathBuf,
        /// Output format (csv or json). If omitted, inferred from --out extension.
        #[arg(long, value_enum)]
        format: Option<OutFormat>,
    },
}

#[derive(Args, Debug)]
struct SelectArgs {
    /// Language ids separated by comma or semicolon (e.g., english,spanish)
    #[arg(short, long)]
    languages: String,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn open_source(global: &GlobalArgs) -> Result<Box<dyn CatalogSource>> {
    let source: Box<dyn CatalogSource> = match (&global.url, &global.catalog) {
        (Some(url), _) => Box::new(HttpSource::new(url.as_str())?),
        (None, Some(path)) => Box::new(FileSource::new(path)),
        (None, None) => Box::new(BuiltinSource),
    };
    Ok(source)
}

fn positions(global: &GlobalArgs) -> Result<PositionTable> {
    Ok(match &global.positions {
        Some(path) => PositionTable::from_path(path)?,
        None if global.globe => PositionTable::globe(),
        None => PositionTable::geographic(),
    })
}

fn reach_config(global: &GlobalArgs) -> ReachConfig {
    ReachConfig {
        world_population: global.world_population,
    }
}

fn selection(catalog: &Catalog, args: &SelectArgs) -> Selection {
    let selection: Selection = parse_list(&args.languages).iter().collect();
    for id in selection.ids() {
        if catalog.get_by_id(id).is_none() {
            eprintln!("warning: unknown language {id:?} ignored");
        }
    }
    selection
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut store = CatalogStore::new(open_source(&cli.global)?);
    let count = store.load()?.len();
    info!(
        "loaded {} languages from {}",
        count,
        store.source().describe()
    );
    let catalog = store.catalog();
    let global = &cli.global;

    match &cli.cmd {
        Command::Languages { search } => cmd_languages(catalog, search.as_deref(), global),
        Command::Reach(args) => cmd_reach(catalog, args, global),
        Command::Heatmap {
            select,
            geojson,
            catalog_colors,
        } => cmd_heatmap(catalog, select, geojson.as_deref(), *catalog_colors, global),
        Command::Countries { select, regions } => {
            cmd_countries(catalog, select, *regions, global)
        }
        Command::Report {
            select,
            out,
            format,
        } => cmd_report(catalog, select, out, format.as_ref(), global),
    }
}

fn cmd_languages(catalog: &Catalog, search: Option<&str>, global: &GlobalArgs) -> Result<()> {
    let langs = match search {
        Some(term) => catalog.search(term),
        None => catalog.all().iter().collect(),
    };
    for l in langs {
        println!(
            "{:<12} {:<12} speakers={:>15} countries={}",
            l.id,
            l.name,
            grouped_count(l.total_speakers, &global.locale),
            l.countries.len()
        );
    }
    Ok(())
}

fn cmd_reach(catalog: &Catalog, args: &SelectArgs, global: &GlobalArgs) -> Result<()> {
    let selection = selection(catalog, args);
    let reach =
        geolingua::reach::compute_reach_with(selection.ids(), catalog, &reach_config(global));
    println!(
        "Total speakers: {} ({})",
        grouped_count(reach.total_speakers, &global.locale),
        compact_count(reach.total_speakers)
    );
    println!("Countries: {}", reach.distinct_countries.len());
    println!("Global coverage: {}", percent(reach.global_coverage_percent));
    Ok(())
}

fn cmd_heatmap(
    catalog: &Catalog,
    args: &SelectArgs,
    geojson: Option<&Path>,
    catalog_colors: bool,
    global: &GlobalArgs,
) -> Result<()> {
    let selection = selection(catalog, args);
    let palette = Palette::default();
    let tokens = LanguageTokens(catalog);
    let colors: &dyn ColorAssignment = if catalog_colors { &tokens } else { &palette };
    let heatmap =
        geolingua::build_heatmap_features(selection.ids(), catalog, &positions(global)?, colors);
    for f in &heatmap.countries {
        println!(
            "{} {:<24} intensity={:>5.1} fill={} official={} color={} languages={}",
            f.country_code,
            f.country_name,
            f.intensity,
            fill_style(f.intensity).hex,
            f.is_official,
            f.representative_color,
            f.contributing_language_ids.join(",")
        );
    }
    println!("max intensity: {}", percent(heatmap.max_intensity));
    for band in &heatmap.color_scale {
        println!("  {:>3}-{:<3} {}", band.min, band.max, band.color);
    }
    if let Some(path) = geojson {
        storage::save_geojson(&heatmap, path)?;
        eprintln!(
            "Wrote {} features to {}",
            heatmap.countries.len(),
            path.display()
        );
    }
    Ok(())
}

fn print_entry(e: &CountryBreakdownEntry, global: &GlobalArgs) {
    let langs: Vec<String> = e
        .contributing_languages
        .iter()
        .map(|l| format!("{} {}", l.name, percent(l.percentage)))
        .collect();
    println!(
        "{} {:<24} pop={:>15}  {}  [{}]",
        e.country_code,
        e.country_name,
        grouped_count(e.population, &global.locale),
        langs.join(", "),
        e.communication_level().advice()
    );
}

fn cmd_countries(
    catalog: &Catalog,
    args: &SelectArgs,
    regions: bool,
    global: &GlobalArgs,
) -> Result<()> {
    let selection = selection(catalog, args);
    let entries = geolingua::group_by_country(selection.ids(), catalog);
    if regions {
        for group in group_by_region(&entries) {
            println!("{} ({})", group.region.label(), group.entries.len());
            for e in group.entries {
                print_entry(e, global);
            }
        }
    } else {
        for e in &entries {
            print_entry(e, global);
        }
    }
    Ok(())
}

fn cmd_report(
    catalog: &Catalog,
    args: &SelectArgs,
    out: &Path,
    format: Option<&OutFormat>,
    global: &GlobalArgs,
) -> Result<()> {
    let selection = selection(catalog, args);
    let view = compute_view(
        selection.ids(),
        catalog,
        &positions(global)?,
        &Palette::default(),
        &reach_config(global),
    );
    let report = DashboardReport::new(&selection, catalog, view);

    let fmt = match format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => out.extension().and_then(|e| e.to_str()).unwrap_or("json"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_breakdown_csv(&report.view.breakdown, out)?,
        "json" => storage::save_json(&report, out)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!(
        "Saved report for {} languages ({} countries) to {}",
        report.languages.len(),
        report.view.breakdown.len(),
        out.display()
    );
    Ok(())
}
