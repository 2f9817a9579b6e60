use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use transitprep_core::prelude::*;

use crate::cli::{
    BuildNetworkArgs, DemandSource, FitArgs, IngestDemandArgs, IngestScheduleArgs, RequestArgs,
    RouteSegmentsArgs, SimulateArgs, TransformArgs,
};
use crate::config::AppConfig;
use crate::stations::read_stations;

type CommandResult = Result<(), Box<dyn Error>>;

pub async fn build_network(args: BuildNetworkArgs, mut config: AppConfig) -> CommandResult {
    if let Some(key) = args.api_key {
        config.routing.api_key = Some(key);
    }
    if let Some(mode) = args.mode {
        config.matrix.mode = mode;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.matrix.chunk_size = chunk_size;
    }
    if let Some(cap) = args.max_remote_stations {
        config.matrix.max_remote_stations = (cap > 0).then_some(cap);
    }
    if args.strict {
        config.matrix.policy = FallbackPolicy::Strict;
    }

    let stations = read_stations(&args.stations)?;
    let service = OpenRouteService::connect(&config.routing)?.map(Arc::new);
    let builder = NetworkBuilder::new(GeoMatrixBuilder::new(service, config.matrix));
    let model = builder.build(&args.id, &args.name, stations).await?;

    if let Some(MatrixSource::Local { reason }) = &model.matrix_source {
        warn!(%reason, "Travel values are haversine estimates");
    }
    write_json(args.output.as_deref(), &model).await
}

pub async fn route_segments(args: RouteSegmentsArgs, mut config: AppConfig) -> CommandResult {
    if let Some(key) = args.api_key {
        config.routing.api_key = Some(key);
    }
    let points: Vec<LonLat> = read_stations(&args.stations)?
        .iter()
        .map(Station::lon_lat)
        .collect();
    let service = OpenRouteService::connect(&config.routing)?.map(Arc::new);
    let resolver = RouteGeometryResolver::new(service, config.geometry);

    let segments = if args.strict {
        strict_segments(&resolver, &points).await?
    } else {
        resolver.resolve_segments(&points).await?
    };
    write_text(args.output.as_deref(), segments_to_geojson_string(&segments)?).await
}

async fn strict_segments(
    resolver: &RouteGeometryResolver<OpenRouteService>,
    points: &[LonLat],
) -> Result<Vec<SegmentGeometry>, Box<dyn Error>> {
    if points.len() < 2 {
        return Err(format!("need at least 2 stations, got {}", points.len()).into());
    }
    let mut segments = Vec::with_capacity(points.len() - 1);
    for (index, leg) in points.windows(2).enumerate() {
        let (start, end) = (leg[0], leg[1]);
        let coordinates = resolver.resolve_strict(start, end).await?;
        segments.push(SegmentGeometry {
            index,
            start,
            end,
            geometry: RouteGeometry {
                coordinates,
                source: GeometrySource::Road,
            },
        });
    }
    Ok(segments)
}

pub async fn ingest_demand(args: IngestDemandArgs) -> CommandResult {
    let data = load_demand(&args.source).await?;
    write_json(args.output.as_deref(), &data).await
}

pub async fn ingest_schedule(args: IngestScheduleArgs) -> CommandResult {
    let bytes = tokio::fs::read(&args.workbook).await?;
    let schedules = ingest_schedule_workbook(bytes, &args.project_id)?;
    write_json(args.output.as_deref(), &schedules).await
}

pub async fn fit(args: FitArgs, config: AppConfig) -> CommandResult {
    let data = load_demand(&args.source).await?;
    let response = FitService::new(&config.services)?.fit(&data).await?;

    let path = timestamped(&args.output_dir, "distribution_fit");
    write_json(Some(path.as_path()), &response).await?;

    if let Some(configuration_id) = &args.configuration_id {
        let rows = distribution_rows(&response, configuration_id);
        let path = timestamped(&args.output_dir, "distribution_rows");
        write_json(Some(path.as_path()), &rows).await?;
    }
    Ok(())
}

pub async fn transform(args: TransformArgs) -> CommandResult {
    let request = build_request(&args.request).await?;
    write_json(args.output.as_deref(), &request).await
}

pub async fn simulate(args: SimulateArgs, config: AppConfig) -> CommandResult {
    let request = build_request(&args.request).await?;
    let result = SimulationService::new(&config.services)?
        .simulate(&request)
        .await?;
    let path = timestamped(&args.output_dir, "simulation");
    write_json(Some(path.as_path()), &result).await
}

async fn build_request(args: &RequestArgs) -> Result<SimulationRequest, Box<dyn Error>> {
    let scenario: ScenarioDetail = read_json(&args.scenario).await?;
    let configuration: ConfigurationDetail = read_json(&args.configuration).await?;
    Ok(transform_simulation_request(
        &scenario,
        &configuration,
        &args.period,
        args.time_slot,
    )?)
}

async fn load_demand(source: &DemandSource) -> Result<DemandData, Box<dyn Error>> {
    let station_ids: HashMap<String, String> = match &source.station_map {
        Some(path) => read_json(path).await?,
        None => HashMap::new(),
    };
    let bytes = tokio::fs::read(&source.workbook).await?;
    Ok(ingest_workbook(bytes, &station_ids, source.mode)?)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()).into())
}

async fn write_json<T: Serialize + ?Sized>(output: Option<&Path>, value: &T) -> CommandResult {
    write_text(output, serde_json::to_string_pretty(value)?).await
}

async fn write_text(output: Option<&Path>, text: String) -> CommandResult {
    match output {
        Some(path) => {
            tokio::fs::write(path, text).await?;
            info!(path = %path.display(), "Wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// `{dir}/{prefix}_{YYYYmmdd_HHMMSS}.json` in local time
fn timestamped(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{prefix}_{}.json", Local::now().format("%Y%m%d_%H%M%S")))
}
