use clap::Parser;
use field_area::error::MeasureError;
use field_area::session::MeasurementSession;
use field_area::{estimator, reference, replay};

#[derive(Parser)]
struct Cli {
    /// Boundary walk to replay (.kml, .gpx or .geojson).
    path: String,
}

fn main() {
    env_logger::init();
    let args = Cli::parse();
    let walks = match replay::read_walks(&args.path) {
        Ok(walks) => walks,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    for (i, walk) in walks.iter().enumerate() {
        if walks.len() > 1 {
            println!("boundary {}:", i + 1);
        }
        if let Err(e) = replay_walk(walk) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn replay_walk(walk: &[(f64, f64)]) -> Result<(), MeasureError> {
    // Drive the session the way the capture screen would, one corner per
    // recorded fix.
    let mut session = MeasurementSession::new();
    session.start()?;
    for &(lat, lon) in walk {
        session.add_point(lat, lon)?;
    }
    session.info();
    let result = session.compute()?;
    let points = session.points();

    println!("  corners: {}", points.len());
    println!("perimeter: {:.1} m", estimator::perimeter_meters(points));
    println!("     area: {:.1} m2", result.square_meters);
    println!("    acres: {:.3}", result.acres());
    println!(" hectares: {:.3}", result.hectares());
    println!();
    println!(" geodesic: {:.1} m2 (geo crate)", reference::geodesic_area(points));
    println!("   planar: {:.1} m2 (geo crate)", reference::planar_area(points));
    Ok(())
}
