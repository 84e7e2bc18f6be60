use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use simplelog::{Config, LevelFilter, WriteLogger};

use tabula_lib::Grid;
use tabula_lib::error::LoadError;
use tabula_lib::model::{CellType, ColumnDescriptor, Record, SortDirection, records_from_json};
use tabula_lib::remote::{RemoteLoader, RemoteSource, ResponseTransform};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Load rows into a grid, search and sort them, and print the view", long_about = None)]
struct Cli {
    /// JSON file holding an array of row objects
    #[arg(long, value_name = "FILE", conflicts_with = "url", required_unless_present = "url")]
    file: Option<PathBuf>,

    /// URL returning an array of row objects
    #[arg(long)]
    url: Option<String>,

    /// JSON file holding the column descriptors; inferred from the first row if omitted
    #[arg(long, value_name = "FILE")]
    columns: Option<PathBuf>,

    /// Take the rows from this key of an object response
    #[arg(long, value_name = "KEY")]
    transform_key: Option<String>,

    /// Case-insensitive search query
    #[arg(short, long)]
    search: Option<String>,

    /// Sort as FIELD:asc or FIELD:dsc
    #[arg(long, value_name = "FIELD:DIR")]
    sort: Option<String>,

    /// Container width in pixels
    #[arg(short, long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value = "tabula-cli.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{0}")]
    Usage(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match File::create(&cli.log_file) {
        Ok(log_file) => {
            if WriteLogger::init(cli.log_level, Config::default(), log_file).is_err() {
                eprintln!("Warning: logger already initialized");
            }
        }
        Err(e) => eprintln!("Warning: cannot open {}: {}", cli.log_file.display(), e),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let sort = cli.sort.as_deref().map(parse_sort).transpose()?;

    let rows = match (&cli.file, &cli.url) {
        (Some(path), _) => {
            let value = read_json(path)?;
            let value = extract(value, cli.transform_key.as_deref());
            records_from_json(&value)
                .ok_or_else(|| CliError::Usage(format!("{}: expected an array of objects", path.display())))?
        }
        (None, Some(url)) => {
            let loader = RemoteLoader::builder().build()?;
            let key = cli.transform_key.clone();
            let transform = move |value: Value| extract(value, key.as_deref());
            let transform: &ResponseTransform = &transform;
            loader
                .fetch_rows(&RemoteSource::new(url.as_str()), Some(transform))
                .await?
        }
        (None, None) => return Err(CliError::Usage("one of --file or --url is required".into())),
    };

    let columns = match &cli.columns {
        Some(path) => serde_json::from_value::<Vec<ColumnDescriptor>>(read_json(path)?)?,
        None => infer_columns(&rows),
    };

    let mut grid = Grid::default();
    grid.set_container_width(cli.width);
    grid.initialize(columns, rows);

    if let Some((field, direction)) = &sort {
        grid.sort_by(Some(field.as_str()), Some(*direction));
        if !grid.sort_state().is_sorted_by(field) {
            return Err(CliError::Usage(format!("column '{}' is not sortable", field)));
        }
    }
    if let Some(query) = &cli.search {
        grid.search(query);
    }

    print_view(&grid);
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

fn extract(value: Value, key: Option<&str>) -> Value {
    match key {
        Some(key) => value.get(key).cloned().unwrap_or(Value::Null),
        None => value,
    }
}

fn parse_sort(arg: &str) -> Result<(String, SortDirection), CliError> {
    let (field, direction) = arg
        .split_once(':')
        .unwrap_or((arg, SortDirection::Asc.as_str()));
    let direction = SortDirection::parse(direction)
        .ok_or_else(|| CliError::Usage(format!("invalid sort direction '{}'", direction)))?;
    Ok((field.to_string(), direction))
}

/// One searchable, sortable text column per field of the first row.
fn infer_columns(rows: &[Record]) -> Vec<ColumnDescriptor> {
    let mut fields: Vec<&String> = rows.first().map(|row| row.keys().collect()).unwrap_or_default();
    fields.sort();
    fields
        .into_iter()
        .map(|field| {
            ColumnDescriptor::new(field.as_str(), field.as_str(), CellType::Text)
                .searchable()
                .sortable()
        })
        .collect()
}

fn print_view(grid: &Grid) {
    let columns = grid.store().columns();
    println!("{}", grid.layout().track_sizes());

    let header: Vec<&str> = columns.iter().map(|c| c.display_name.as_str()).collect();
    println!("#\t{}", header.join("\t"));

    for row in grid.visible_rows() {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| grid.display_value(row, &c.field_name).unwrap_or_default())
            .collect();
        println!("{}\t{}", row, cells.join("\t"));
    }

    log::info!(
        "printed {} of {} rows",
        grid.store().visible_len(),
        grid.store().row_count()
    );
}
