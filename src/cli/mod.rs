// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2 (application).
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{CheckArgs, Commands, DryRunArgs, InspectArgs};

use crate::application::{dry_run_use_case::DryRunUseCase, prepare_use_case::PrepareUseCase};

#[derive(Parser, Debug)]
#[command(
    name = "bilingual-seq2seq",
    version,
    about = "Frame bilingual text into fixed-length encoder/decoder training examples."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Inspect(args) => run_inspect(args),
            Commands::Check(args)   => run_check(args),
            Commands::DryRun(args)  => run_dry_run(args),
        }
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let use_case = PrepareUseCase::new(args.pipeline.into_config()?);
    let report   = use_case.inspect(args.index)?;
    let ex       = &report.example;

    println!("index:          {}", report.index);
    println!("text:           {}", report.text);
    println!("source tokens:  {:?}", report.source);
    println!("target tokens:  {:?}", report.target);
    println!("encoder_input:  {:?}", ex.encoder_input);
    println!("decoder_input:  {:?}", ex.decoder_input);
    println!("labels:         {:?}", ex.labels);
    println!("encoder_mask:   {:?} {}", ex.encoder_mask.shape(), bits(ex.encoder_mask.values()));
    println!("decoder_mask:   {:?}", ex.decoder_mask.shape());
    let [_, _, cols] = ex.decoder_mask.shape();
    for row in ex.decoder_mask.values().chunks(cols.max(1)) {
        println!("    {}", bits(row));
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let use_case = PrepareUseCase::new(args.pipeline.into_config()?);
    let report   = use_case.check()?;

    println!(
        "{} examples, {} frame cleanly, {} too long",
        report.total,
        report.total - report.oversized.len(),
        report.oversized.len()
    );
    for (index, reason) in report.oversized.iter().take(args.show) {
        println!("  [{index}] {reason}");
    }
    if report.oversized.len() > args.show {
        println!("  ... {} more", report.oversized.len() - args.show);
    }
    Ok(())
}

fn run_dry_run(args: DryRunArgs) -> Result<()> {
    let (batch_size, max_batches) = (args.batch_size, args.max_batches);
    let use_case = DryRunUseCase::new(args.config()?, batch_size, max_batches);
    let report   = use_case.execute()?;

    println!(
        "Dry run: {} batches, {} examples, mean loss {:.4}",
        report.batches, report.examples, report.mean_loss
    );
    Ok(())
}

/// `[true, false]` → "10"
fn bits(values: &[bool]) -> String {
    values.iter().map(|&v| if v { '1' } else { '0' }).collect()
}
