use anyhow::Context;
use building_orientation::export::ExportFormat;
use building_orientation::ingest::{RawElement, RawGeometry};
use building_orientation::point::{GeoBoundingBox, GeoPoint};
use building_orientation::session::Session;
use building_orientation::{read_elements, record};
use clap::Parser;

#[derive(Parser)]
struct Cli {
    /// GeoJSON file with building footprints
    path: String,
    /// Export format: csv or geojson
    #[arg(long, default_value = "csv")]
    format: ExportFormat,
    /// Output file; prints to stdout when omitted
    #[arg(long)]
    output: Option<String>,
    /// Keep only footprints touching this box: north,south,east,west degrees
    #[arg(long)]
    bbox: Option<String>,
}

fn parse_bbox(raw: &str) -> anyhow::Result<GeoBoundingBox> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("invalid bbox: {raw}"))?;
    anyhow::ensure!(parts.len() == 4, "bbox needs north,south,east,west");
    let (north, south, east, west) = (parts[0], parts[1], parts[2], parts[3]);
    Ok(GeoBoundingBox::from(
        &GeoPoint::new(south, west),
        &GeoPoint::new(north, east),
    ))
}

fn touches_bbox(element: &RawElement, bbox: &GeoBoundingBox) -> bool {
    let rings: Vec<&Vec<GeoPoint>> = match &element.geometry {
        RawGeometry::Ring(ring) => vec![ring],
        RawGeometry::Relation { outers, .. } => outers.iter().collect(),
    };
    rings
        .iter()
        .any(|ring| ring.iter().any(|p| bbox.contains(p)))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path))?;
    let mut elements = read_elements::elements_from_geojson(&content)?;
    if let Some(raw) = &args.bbox {
        let bbox = parse_bbox(raw)?;
        log::info!("filtering with {}", bbox);
        elements.retain(|e| touches_bbox(e, &bbox));
    }

    let batch = record::analyze_batch(&elements);
    println!("records: {}", batch.records.len());
    println!("discarded: {}", batch.discarded);

    let mut session = Session::new();
    session.remember(batch);
    let rendered = session.export(args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("writing {path}"))?;
            println!("wrote {path}");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
