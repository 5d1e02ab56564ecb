use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use webpipe_flow::model::steps_to_document;
use webpipe_flow::prelude::*;

/// Input shape of a step model file.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// This crate's own `Pipeline` JSON.
    Model,
    /// A parsed route: `{ method, path, pipeline: { steps } }`.
    Route,
    /// A parsed named pipeline: `{ name, pipeline: { steps } }`.
    Pipeline,
}

/// Project WebPipe step models into editor graphs and back
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to a session/layout config JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the visual graph for a step model
    Project {
        /// Path to the step model JSON file
        input: String,
        #[arg(short, long, value_enum, default_value_t = InputFormat::Model)]
        format: InputFormat,
        /// Skip the hierarchical auto-layout pass
        #[arg(long)]
        no_layout: bool,
        /// Write the graph here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rebuild a step model from an (edited) graph
    Reconstruct {
        /// Path to the graph JSON file
        input: String,
        /// Emit parser-document steps instead of the model JSON
        #[arg(long)]
        document: bool,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Project then reconstruct, and report whether the model survived unchanged
    Roundtrip {
        input: String,
        #[arg(short, long, value_enum, default_value_t = InputFormat::Model)]
        format: InputFormat,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => SessionConfig::default(),
    };
    let projector = Projector::builder().with_config(config.layout).build();

    match cli.command {
        Command::Project {
            input,
            format,
            no_layout,
            output,
        } => {
            let pipeline = load_pipeline(&input, format);
            let graph = if no_layout {
                projector.project_pipeline(&pipeline)
            } else {
                projector.project_laid_out(&pipeline)
            };
            tracing::info!(
                nodes = graph.nodes.len(),
                edges = graph.edges.len(),
                "Projected graph"
            );
            write_json(&graph, output.as_deref());
        }
        Command::Reconstruct {
            input,
            document,
            output,
        } => {
            let graph = FlowGraph::from_file(&input)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));
            let steps = reconstruct(&graph.nodes, &graph.edges)
                .unwrap_or_else(|e| exit_with_error(&format!("Reconstruction failed: {}", e)));
            if document {
                write_json(&steps_to_document(&steps), output.as_deref());
            } else {
                write_json(&steps, output.as_deref());
            }
        }
        Command::Roundtrip { input, format } => run_roundtrip(&projector, &input, format),
    }
}

fn run_roundtrip(projector: &Projector, input: &str, format: InputFormat) {
    let pipeline = load_pipeline(input, format);

    let start = Instant::now();
    let graph = projector.project_laid_out(&pipeline);
    let project_duration = start.elapsed();

    let start = Instant::now();
    let steps = reconstruct(&graph.nodes, &graph.edges)
        .unwrap_or_else(|e| exit_with_error(&format!("Reconstruction failed: {}", e)));
    let reconstruct_duration = start.elapsed();

    println!("\n--- Round-trip Summary ---");
    println!("Top-level Steps:   {}", pipeline.steps.len());
    println!("Graph Nodes:       {}", graph.nodes.len());
    println!("Graph Edges:       {}", graph.edges.len());
    println!("Projection:        {:?}", project_duration);
    println!("Reconstruction:    {:?}", reconstruct_duration);

    if steps == pipeline.steps {
        println!("Result:            model preserved");
    } else {
        println!("Result:            MODEL CHANGED");
        std::process::exit(2);
    }
}

fn load_pipeline(path: &str, format: InputFormat) -> Pipeline {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
    let converted = match format {
        InputFormat::Model => serde_json::from_str::<Pipeline>(&json)
            .map_err(|e| ConversionError::Json(e.to_string())),
        InputFormat::Route => DocumentRoute::from_json(&json).and_then(IntoPipeline::into_pipeline),
        InputFormat::Pipeline => {
            DocumentPipeline::from_json(&json).and_then(IntoPipeline::into_pipeline)
        }
    };
    converted.unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", path, e)))
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&str>) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
    match output {
        Some(path) => fs::write(path, json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e))),
        None => println!("{}", json),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
