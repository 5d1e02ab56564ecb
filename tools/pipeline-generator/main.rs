use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;
use webpipe_flow::model::{Branch, BranchCategory, OperationRegistry, Pipeline, Step};

/// A CLI tool to generate random step models for exercising the flow engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_pipeline.json")]
    output: String,

    /// The number of top-level regular steps before the result block
    #[arg(long, default_value_t = 4)]
    steps: usize,

    /// The maximum number of steps generated inside each branch
    #[arg(long, default_value_t = 3)]
    max_branch_steps: usize,

    /// Omit the trailing result block
    #[arg(long)]
    no_result: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();
    let registry = OperationRegistry::new();

    println!(
        "Generating pipeline ({} steps, up to {} per branch)...",
        cli.steps, cli.max_branch_steps
    );

    let mut steps: Vec<Step> = (0..cli.steps)
        .map(|i| generate_regular_step(&mut rng, &registry, &format!("step-{}", i)))
        .collect();

    if !cli.no_result {
        steps.push(generate_result_step(&mut rng, &registry, cli.max_branch_steps));
    }

    let pipeline = Pipeline::route("GET", "/generated", steps);
    let json_output = serde_json::to_string_pretty(&pipeline)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved pipeline to '{}'",
        cli.output
    );

    Ok(())
}

fn generate_regular_step(rng: &mut ThreadRng, registry: &OperationRegistry, id: &str) -> Step {
    let operations = registry.operations();
    let operation = &operations[rng.random_range(0..operations.len())];

    let extra_lines = rng.random_range(0..12);
    let mut code = operation.default_code.clone();
    for line in 0..extra_lines {
        code.push_str(&format!("\n# line {}", line));
    }

    let step = Step::regular(
        id,
        operation.operation_type.clone(),
        operation.language.clone(),
        code,
    );
    if rng.random_bool(0.3) {
        step.with_output("{\"ok\": true}")
    } else {
        step
    }
}

fn generate_result_step(rng: &mut ThreadRng, registry: &OperationRegistry, max_branch_steps: usize) -> Step {
    let categories = [
        (BranchCategory::Ok, 200),
        (BranchCategory::Error, 500),
        (BranchCategory::Custom("notFound".to_string()), 404),
    ];
    let branch_count = rng.random_range(1..=categories.len());

    let branches = categories
        .into_iter()
        .take(branch_count)
        .enumerate()
        .map(|(k, (category, code))| {
            let branch_id = format!("result-branch-{}", k);
            let count = rng.random_range(0..=max_branch_steps);
            let steps = (0..count)
                .map(|j| generate_regular_step(rng, registry, &format!("{}-{}", branch_id, j)))
                .collect();
            println!("-> Generated branch '{}({})' with {} step(s).", category, code, count);
            Branch::new(branch_id, category, code).with_steps(steps)
        })
        .collect();

    Step::result("result", branches)
}
