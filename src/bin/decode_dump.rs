//! Decode captured bit rows from a text dump
//! Each line is one capture: whitespace-separated row codes in
//! `{nbits}hexdigits` notation, as logged by the demodulation stage.

use rfsensor_rs::{get_decoder, init_decoders, run_decoders, BitBuffer, Row};
use std::env;
use std::fs;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <capture_file.txt> [decoder_name]", args[0]);
        eprintln!("\nExamples:");
        eprintln!(
            "  {} captures.txt                # Try every registered decoder",
            args[0]
        );
        eprintln!(
            "  {} captures.txt 'Wind test'    # Try a single decoder",
            args[0]
        );
        std::process::exit(1);
    }

    let capture_file = &args[1];
    let decoder_name = args.get(2).map(|s| s.as_str());

    init_decoders();

    let selected = match decoder_name {
        Some(name) => Some(
            get_decoder(name).ok_or_else(|| anyhow::anyhow!("Decoder not found: {}", name))?,
        ),
        None => None,
    };

    let text = fs::read_to_string(capture_file)?;
    let mut captures = 0usize;
    let mut records = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut buffer = BitBuffer::new();
        let mut malformed = false;
        for code in line.split_whitespace() {
            match code.parse::<Row>() {
                Ok(row) => buffer.push_row(row),
                Err(e) => {
                    tracing::warn!("Skipping line {}: {}", line_num + 1, e);
                    malformed = true;
                    break;
                }
            }
        }
        if malformed || buffer.num_rows() == 0 {
            continue;
        }
        captures += 1;

        let outcomes = match selected {
            Some(descriptor) => vec![(descriptor.name, (descriptor.decode)(&buffer))],
            None => run_decoders(&buffer),
        };
        for (name, outcome) in outcomes {
            match outcome {
                Ok(record) => {
                    records += 1;
                    println!("{}", record.to_json()?);
                }
                Err(error) => {
                    tracing::debug!("line {}: {}: {}", line_num + 1, name, error);
                }
            }
        }
    }

    tracing::info!("{} captures read, {} records decoded", captures, records);
    Ok(())
}
