use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use kyori_core::config::load_app_config;
use kyori_core::{Backend, DepartureTime, Mode, TabularStore};
use kyori_engine::{CancelToken, JobSpec, Pipeline};
use kyori_geocode::NominatimClient;
use kyori_postal::JpPostalDirectory;
use kyori_routing::DirectionsClient;

mod csv_io;

#[derive(Debug, Parser)]
#[command(name = "kyori")]
#[command(about = "Append distances from a postal-code column to a CSV table")]
struct Cli {
    /// Input CSV file; the first record is the header.
    input: PathBuf,

    /// Output CSV path (UTF-8 with BOM).
    #[arg(short, long)]
    output: PathBuf,

    /// Header of the postal-code column.
    #[arg(long, default_value = "郵便番号")]
    postal_column: String,

    /// Destination label; repeat for multiple destinations.
    #[arg(short, long = "destination", required = true)]
    destinations: Vec<String>,

    /// How distances are computed.
    #[arg(long, value_enum, default_value_t = BackendArg::Offline)]
    backend: BackendArg,

    /// Travel mode for the online backend.
    #[arg(long, value_enum, default_value_t = ModeArg::Transit)]
    mode: ModeArg,

    /// Departure time as a unix timestamp (online transit; defaults to now).
    #[arg(long)]
    departure_time: Option<u64>,

    /// Postal directory CSV overriding the embedded dataset.
    #[arg(long)]
    postal_data: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Straight-line distance from the offline postal directory.
    Offline,
    /// Routed distance and duration from the online directions service.
    Online,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Offline => Backend::OfflineHaversine,
            BackendArg::Online => Backend::OnlineTransitRouting,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Transit,
    Driving,
    Walking,
    Bicycling,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Transit => Mode::Transit,
            ModeArg::Driving => Mode::Driving,
            ModeArg::Walking => Mode::Walking,
            ModeArg::Bicycling => Mode::Bicycling,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_app_config()?;

    let table = csv_io::read_table(&cli.input)?;
    tracing::info!(
        rows = table.row_count(),
        columns = table.columns().len(),
        input = %cli.input.display(),
        "input table loaded"
    );

    let backend = Backend::from(cli.backend);
    let mut job = JobSpec::new(&table, &cli.postal_column, cli.destinations.clone(), backend)?
        .with_mode(cli.mode.into());
    if let Some(epoch) = cli.departure_time {
        job = job.with_departure_time(DepartureTime::Epoch(epoch));
    }

    let directory = match cli.postal_data.as_deref().or(config.postal_data_path.as_deref()) {
        Some(path) => JpPostalDirectory::from_path(path)?,
        None => JpPostalDirectory::from_embedded()?,
    };
    let geocoder = NominatimClient::new(&config)?;

    // Ctrl-C cancels cooperatively: the run finishes its in-flight call and
    // writes the partial table.
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, finishing current call");
                cancel.cancel();
            }
        });
    }

    let augmented = match backend {
        Backend::OfflineHaversine => {
            Pipeline::offline(directory, geocoder, &config)
                .run(&table, &job, &cancel)
                .await?
        }
        Backend::OnlineTransitRouting => {
            let routing = DirectionsClient::new(&config)?;
            Pipeline::new(directory, geocoder, Some(routing), &config)
                .run(&table, &job, &cancel)
                .await?
        }
    };

    csv_io::write_table(&cli.output, &augmented)?;
    println!(
        "wrote {} rows × {} columns to {}",
        augmented.row_count(),
        augmented.columns().len(),
        cli.output.display()
    );
    Ok(())
}
