//! Terminal front end for the Gridstash core.
//!
//! # Responsibility
//! - Resolve configuration from flags and `GRIDSTASH_*` variables.
//! - Map subcommands onto core services and print the results.

mod render;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use gridstash_core::{
    group_items_by_drawer, init_logging, open_db, project_slice, stack_order, CellRange,
    CoreConfig, Drawer, DrawerBounds, DrawerId, DrawerService, GridPoint, ItemDraft, ItemId,
    ItemPatch, ItemService, PlacementOutcome, Region, SqliteDrawerRepository,
    SqliteItemRepository, DEFAULT_DRAWER_BOUNDS,
};
use log::info;
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridstash")]
#[command(about = "Catalogue items stored in Gridfinity drawers")]
struct Cli {
    /// SQLite database file (overrides GRIDSTASH_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rotated log files (overrides GRIDSTASH_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides GRIDSTASH_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the sample drawer with one item
    Seed,

    /// List drawers
    Drawers,

    /// Create a drawer
    AddDrawer {
        name: String,
        #[arg(long, default_value_t = DEFAULT_DRAWER_BOUNDS.width)]
        width: u32,
        #[arg(long, default_value_t = DEFAULT_DRAWER_BOUNDS.depth)]
        depth: u32,
        #[arg(long, default_value_t = DEFAULT_DRAWER_BOUNDS.height)]
        height: u32,
    },

    /// Rename a drawer
    RenameDrawer { drawer: DrawerId, name: String },

    /// Delete a drawer and all of its items
    DeleteDrawer { drawer: DrawerId },

    /// List items grouped by drawer
    Items {
        /// Keep items whose name or drawer name contains TERM
        #[arg(long)]
        search: Option<String>,
    },

    /// Place a new item after checking bounds and overlaps
    Place {
        drawer: DrawerId,
        name: String,
        #[arg(long, default_value_t = 1)]
        row: u32,
        #[arg(long, default_value_t = 1)]
        column: u32,
        #[arg(long, default_value_t = 1)]
        width: u32,
        #[arg(long, default_value_t = 1)]
        depth: u32,
        #[arg(long, default_value_t = 1)]
        start_height: u32,
        #[arg(long, default_value_t = 1)]
        height: u32,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Change an item's vertical placement
    MoveHeight {
        item: ItemId,
        #[arg(long)]
        start_height: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },

    /// Delete an item
    DeleteItem { item: ItemId },

    /// Print one height level of a drawer as a grid
    Slice { drawer: DrawerId, level: u32 },

    /// Print a drawer's items bottom-up
    Exploded { drawer: DrawerId },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);
    if let Some(settings) = config.log_settings() {
        init_logging(&settings.with_stderr(true)).map_err(|err| anyhow!(err))?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    info!("event=cli_start module=cli status=ok");
    run(&conn, cli.command, cli.json)
}

fn resolve_config(cli: &Cli) -> CoreConfig {
    let mut config = CoreConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn run(conn: &Connection, command: Command, json: bool) -> Result<()> {
    let drawers = DrawerService::new(SqliteDrawerRepository::try_new(conn)?);
    let items = ItemService::new(SqliteItemRepository::try_new(conn)?);

    match command {
        Command::Seed => {
            let drawer = drawers.create_drawer("Drawer 1", DrawerBounds::new(24, 12, 12))?;
            let screws = ItemDraft::placed(
                drawer.id,
                "Screws",
                Region::from_corners(GridPoint::new(1, 1), GridPoint::new(1, 1)),
                CellRange::single(1),
            );
            report_placement(items.place_item(&screws)?, json)?;
            print_drawer(&drawer, json)?;
        }
        Command::Drawers => {
            let list = drawers.list_drawers()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for drawer in &list {
                    println!("{}", render::drawer_line(drawer));
                }
            }
        }
        Command::AddDrawer {
            name,
            width,
            depth,
            height,
        } => {
            let drawer = drawers.create_drawer(&name, DrawerBounds::new(width, depth, height))?;
            print_drawer(&drawer, json)?;
        }
        Command::RenameDrawer { drawer, name } => {
            let drawer = drawers.rename_drawer(drawer, &name)?;
            print_drawer(&drawer, json)?;
        }
        Command::DeleteDrawer { drawer } => {
            drawers.delete_drawer(drawer)?;
            println!("deleted drawer {drawer}");
        }
        Command::Items { search } => {
            let all_drawers = drawers.list_drawers()?;
            let all_items = items.list_all_items()?;
            let term = search.unwrap_or_default();
            let groups = group_items_by_drawer(&all_drawers, &all_items, &term);
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                print!("{}", render::item_list(&groups, &term));
            }
        }
        Command::Place {
            drawer,
            name,
            row,
            column,
            width,
            depth,
            start_height,
            height,
            icon,
            color,
        } => {
            let draft = ItemDraft {
                start_row: row,
                start_column: column,
                width,
                depth,
                start_height,
                height,
                icon,
                color,
                ..ItemDraft::new(drawer, name)
            };
            report_placement(items.place_item(&draft)?, json)?;
        }
        Command::MoveHeight {
            item,
            start_height,
            height,
        } => {
            let patch = ItemPatch {
                start_height,
                height,
                ..ItemPatch::default()
            };
            report_placement(items.update_item(item, &patch)?, json)?;
        }
        Command::DeleteItem { item } => {
            items.delete_item(item)?;
            println!("deleted item {item}");
        }
        Command::Slice { drawer, level } => {
            let drawer = find_drawer(&drawers, drawer)?;
            let stored = items.list_items(drawer.id)?;
            if level < 1 || level > drawer.height {
                return Err(anyhow!(
                    "level {level} is outside drawer height 1..{}",
                    drawer.height
                ));
            }
            let grid = project_slice(drawer.bounds(), &stored, level);
            print!("{}", render::slice(&drawer, &grid));
        }
        Command::Exploded { drawer } => {
            let drawer = find_drawer(&drawers, drawer)?;
            let stored = items.list_items(drawer.id)?;
            let ordered = stack_order(&stored);
            if json {
                println!("{}", serde_json::to_string_pretty(&ordered)?);
            } else {
                print!("{}", render::exploded(&drawer, &ordered));
            }
        }
    }
    Ok(())
}

fn find_drawer(
    drawers: &DrawerService<SqliteDrawerRepository<'_>>,
    id: DrawerId,
) -> Result<Drawer> {
    drawers
        .get_drawer(id)?
        .ok_or_else(|| anyhow!("drawer not found: {id}"))
}

fn print_drawer(drawer: &Drawer, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(drawer)?);
    } else {
        println!("{}", render::drawer_line(drawer));
    }
    Ok(())
}

fn report_placement(outcome: PlacementOutcome, json: bool) -> Result<()> {
    match outcome {
        PlacementOutcome::Placed(item) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&item)?);
            } else {
                println!("{}", render::item_line(&item));
            }
            Ok(())
        }
        PlacementOutcome::Rejected(rejection) => Err(anyhow!(rejection.reason())),
    }
}
