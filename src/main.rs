use clap::{Args, Parser, Subcommand};
use event_locations::address::{Address, BuiltinFormats};
use event_locations::location::JsonLocationStore;
use event_locations::logging::{init_logging, parse_log_level};
use event_locations::server;
use event_locations::workflow::{
    EntityFieldResolver, EntityKind, EventEntity, EventFieldNames, FormSubmission,
    LocationReuseWorkflow, SubmitOutcome, WorkflowConfig,
};
use std::path::PathBuf;

type CliWorkflow = LocationReuseWorkflow<JsonLocationStore, BuiltinFormats, EventFieldNames>;

/// Event Locations — remember event addresses and reuse them later.
///
/// Examples:
///   event-locations list
///   event-locations submit --remember --country US --area CA --city LA --zip 90001 --line1 "1 Main St"
///   event-locations select 3 --series
///   event-locations serve --port 8080
#[derive(Parser)]
#[command(name = "event-locations", version, about, long_about = None)]
struct Cli {
    /// Location store file. Defaults to ~/.event-locations/locations.json.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Workflow settings as a JSON file; missing keys keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP endpoints for event forms.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, short = 'p', default_value_t = 3000)]
        port: u16,
    },
    /// List saved locations, newest first.
    List,
    /// Show the field values a selector choice would fill in.
    Select {
        /// Saved location id, or "_none".
        value: String,
        /// Use the field names of an event series.
        #[arg(long)]
        series: bool,
    },
    /// Submit an event address as if saved from the form.
    Submit(SubmitArgs),
}

#[derive(Args)]
struct SubmitArgs {
    /// Tick "Remember this address?".
    #[arg(long)]
    remember: bool,
    /// Location type selector value.
    #[arg(long, default_value = "other")]
    location_type: String,
    /// Use the field names of an event series.
    #[arg(long)]
    series: bool,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value = "")]
    area: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    zip: String,
    #[arg(long, default_value = "")]
    line1: String,
    #[arg(long, default_value = "")]
    line2: String,
    #[arg(long, default_value = "")]
    line3: String,
}

impl SubmitArgs {
    fn address(&self) -> Address {
        Address {
            country_code: self.country.clone(),
            administrative_area: self.area.clone(),
            locality: self.city.clone(),
            postal_code: self.zip.clone(),
            address_line1: self.line1.clone(),
            address_line2: self.line2.clone(),
            address_line3: self.line3.clone(),
        }
    }
}

fn kind(series: bool) -> EntityKind {
    if series { EntityKind::Series } else { EntityKind::Instance }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(parse_log_level(&cli.log_level));

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut workflow = build_workflow(&cli)?;

    match cli.command {
        Command::Serve { host, port } => server::start(&host, port, workflow).await?,
        Command::List => match workflow.saved_location_options()? {
            // first entry is the placeholder
            Some(options) => {
                for option in options.iter().skip(1) {
                    println!("{:>6}  {}", option.value, option.label);
                }
            }
            None => eprintln!("No saved locations."),
        },
        Command::Select { value, series } => {
            let instructions = workflow.resolve_selection(kind(series), &value)?;
            println!("{}", serde_json::to_string_pretty(&instructions)?);
        }
        Command::Submit(args) => {
            let kind = kind(args.series);
            let fields = EventFieldNames::default();
            let address = args.address();
            let entity = EventEntity::new(kind)
                .with_value(fields.location_type_field_name(kind), &args.location_type)
                .with_address(fields.address_field_name(kind), address.clone());
            let submission = FormSubmission {
                saved_location: None,
                remember: args.remember,
                address: Some(address),
            };
            match workflow.process(&submission, &entity)? {
                SubmitOutcome::Persisted { location } => {
                    println!("Saved location {}: {}", location.id, location.title)
                }
                SubmitOutcome::Skipped { reason } => println!("Not saved: {}", reason),
            }
        }
    }
    Ok(())
}

fn build_workflow(cli: &Cli) -> Result<CliWorkflow, Box<dyn std::error::Error>> {
    let store = match &cli.store {
        Some(path) => JsonLocationStore::open(path.clone())?,
        None => JsonLocationStore::open_default()?,
    };
    let config = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => WorkflowConfig::default(),
    };
    Ok(LocationReuseWorkflow::new(
        store,
        BuiltinFormats,
        EventFieldNames::default(),
        config,
    ))
}
