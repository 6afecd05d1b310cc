#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::{thread, time::Duration};

use chrono::Local;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use opensleep::SampleStore;
use opensleep_algos::{AudioChartPoint, SleepAnalysis, StageDistribution, VitalsChartPoint};
use serde::Serialize;

#[derive(Parser)]
pub struct OpenSleepCli {
    /// JSON batch of audio/movement samples
    #[arg(env, long)]
    pub audio_data: PathBuf,
    /// JSON batch of vitals samples
    #[arg(env, long)]
    pub vitals_data: PathBuf,
    #[clap(subcommand)]
    pub subcommand: OpenSleepCommand,
}

#[derive(Subcommand)]
pub enum OpenSleepCommand {
    ///
    /// Print the analytics report once
    ///
    Report,
    ///
    /// Emit the chart series and stage distribution as JSON
    ///
    Charts,
    ///
    /// Re-run the report on a fixed interval
    ///
    Watch {
        #[arg(long, env, default_value_t = 30)]
        interval: u64,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartsOutput<'a> {
    audio_series: &'a [AudioChartPoint],
    vitals_series: &'a [VitalsChartPoint],
    stages: &'a StageDistribution,
}

fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = OpenSleepCli::parse();
    let store = SampleStore::new(cli.audio_data, cli.vitals_data);

    match cli.subcommand {
        OpenSleepCommand::Report => {
            print_report(&store)?;
            Ok(())
        }
        OpenSleepCommand::Charts => {
            let (audio, vitals) = store.load()?;
            let analysis = SleepAnalysis::derive(audio, vitals);
            let output = ChartsOutput {
                audio_series: &analysis.audio_series,
                vitals_series: &analysis.vitals_series,
                stages: &analysis.stages,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        OpenSleepCommand::Watch { interval } => loop {
            if let Err(error) = print_report(&store) {
                error!("{}", error);
            }
            thread::sleep(Duration::from_secs(interval));
        },
    }
}

fn print_report(store: &SampleStore) -> anyhow::Result<()> {
    let (audio, vitals) = store.load()?;
    info!(
        "analyzing {} audio samples, {} vitals samples",
        audio.len(),
        vitals.len()
    );

    let analysis = SleepAnalysis::derive(audio, vitals);
    println!("Last updated: {}", Local::now().format("%H:%M:%S"));
    println!("\n{}", analysis.metrics);
    println!("\nStage distribution:\n{}", analysis.stages);
    println!("\nSummary:\n{}", analysis.summary);
    Ok(())
}
