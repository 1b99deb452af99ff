use clap::Args;

use crate::commands::print_json;
use crate::config::Settings;
use crate::logging::{self, Verbosity};
use crate::radio::{RadioBrowser, RadioService, Selector, StationFilter, StationOrder, StationRecord};

#[derive(Debug, Args, Clone, Default)]
pub struct StationsArgs {
    /// Most-clicked stations in this city.
    #[arg(long, conflicts_with_all = ["tag", "by", "search", "order", "reverse"])]
    pub city: Option<String>,
    /// Most-voted stations with this tag.
    #[arg(long, conflicts_with_all = ["by", "search", "order", "reverse"])]
    pub tag: Option<String>,
    /// Selector: tag, country, state, language, name, city, topclick, topvote.
    #[arg(long)]
    pub by: Option<Selector>,
    /// Search term for the selector (station name when no selector is given).
    #[arg(long)]
    pub search: Option<String>,
    /// Maximum number of stations.
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
    /// Sort field: name, votes, clickcount, bitrate.
    #[arg(long)]
    pub order: Option<StationOrder>,
    /// Sort descending.
    #[arg(long)]
    pub reverse: bool,
    /// Print the station records as JSON.
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub verbose: bool,
    #[arg(long)]
    pub quiet: bool,
}

impl StationsArgs {
    fn filter(&self) -> StationFilter {
        StationFilter {
            by: self.by,
            searchterm: self.search.clone(),
            limit: self.limit,
            offset: self.offset,
            order: self.order,
            reverse: self.reverse.then_some(true),
            ..StationFilter::default()
        }
    }
}

pub async fn run(args: StationsArgs, settings: &Settings) -> Result<(), String> {
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let service = RadioService::new(RadioBrowser::new(settings.radio.clone()));
    let stations = if let Some(city) = args.city.as_deref() {
        service.top_by_city(city, args.limit).await
    } else if let Some(tag) = args.tag.as_deref() {
        service.top_by_tag(tag, args.limit).await
    } else {
        service.stations(args.filter()).await
    }
    .map_err(|err| err.to_string())?;

    if args.json {
        return print_json(&stations);
    }
    for station in &stations {
        println!("{}", station_line(station));
    }
    Ok(())
}

fn station_line(station: &StationRecord) -> String {
    format!("{}\t{}", station.name.trim(), station.stream_url())
}
