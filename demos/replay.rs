//! Replays a detection log through a tracking pipeline.
//!
//! Each input line holds one frame: a JSON array of `{"bbox": [xmin, ymin, xmax, ymax], "p": conf, "c": class}`.
//! Snapshots are written to stdout as JSON lines.
//!
//! cargo run --example replay -- detections.jsonl [config.json]

use std::io::{BufRead, Write};

use trail::detector::{Detector, DetectorConfig, Filtered};
use trail::{Detection, Pipeline, TrackerConfig, Tracking};

struct JsonLines<R> {
    lines: std::io::Lines<R>,
}

impl<R: BufRead> Detector for JsonLines<R> {
    type Frame = ();
    type Error = trail::Error;

    fn detect(&mut self, _frame: &()) -> Result<Vec<Detection>, Self::Error> {
        match self.lines.next() {
            Some(line) => {
                let line = line?;
                if line.trim().is_empty() {
                    return Ok(Vec::new());
                }

                Ok(serde_json::from_str(&line)?)
            }
            None => Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into()),
        }
    }
}

fn run<T: Tracking, D: Detector<Frame = (), Error = trail::Error>>(
    tracker: &mut T,
    detector: &mut D,
) -> Result<(), trail::Error> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    loop {
        let dets = match detector.detect(&()) {
            Ok(dets) => dets,
            Err(trail::Error::Io(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => {
                log::warn!("skipping frame: {}", err);
                Vec::new()
            }
        };

        let snapshot = tracker.tick(&dets);
        serde_json::to_writer(&mut out, &snapshot)?;
        writeln!(out)?;
    }

    log::info!("{:?}", tracker.stats());

    Ok(())
}

fn main() -> Result<(), trail::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let in_file_name = args.next().expect("expected detections file name");

    let config = match args.next() {
        Some(path) => TrackerConfig::from_json_reader(std::fs::File::open(path)?)?,
        None => TrackerConfig::default(),
    };

    let mut pipeline = Pipeline::new(config)?;
    let mut detector = Filtered {
        detector: JsonLines {
            lines: std::io::BufReader::new(std::fs::File::open(in_file_name)?).lines(),
        },
        config: DetectorConfig::default(),
    };

    run(&mut pipeline, &mut detector)
}
