//! Prime Lattice
//!
//! CLI commands:
//! - gui: Launch the native lattice viewer
//! - layouts: List the supported layouts
//! - coords: Print lattice positions of indices
//! - inspect: Build a scene headlessly and print its summary
//! - generate-data: Write a factorization dataset for 2^p ± 1

use clap::{Parser, Subcommand};
use egui::Vec2;
use num_bigint::BigInt;
use std::path::{Path, PathBuf};

use prime_lattice::config::{Config, Environment, DEFAULT_CONFIG_PATH};
use prime_lattice::controller::Controller;
use prime_lattice::dataset::{self, Dataset};
use prime_lattice::layout::{Lattice, Layout, DEFAULT_MODULUS};
use prime_lattice::render::Recorder;
use prime_lattice::scene::{FormulaKind, SceneInputs};
use prime_lattice::{gui, logging};

#[derive(Parser)]
#[command(name = "prime_lattice")]
#[command(about = "Plot numbers of the form 2^p ± 1 and their factors on 2D lattices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to lattice.yaml config
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch native GUI viewer
    Gui,

    /// List supported layouts
    Layouts,

    /// Print the lattice position of each index
    Coords {
        /// Layout key
        #[arg(short, long, default_value = "ulam")]
        layout: String,

        /// Slots per ring of the modular layout
        #[arg(short, long, default_value_t = DEFAULT_MODULUS)]
        modulus: u32,

        /// Indices to place
        #[arg(required = true)]
        indices: Vec<String>,
    },

    /// Build a scene without a window and print the summary panel
    Inspect {
        /// Formula family: minus, plus or custom
        #[arg(short, long)]
        formula: Option<String>,

        /// Custom formula in n, e.g. "n^2+1"
        #[arg(short, long)]
        expr: Option<String>,

        /// Parameter set, e.g. "5,7,11..13"
        #[arg(short, long)]
        params: Option<String>,

        /// Layout key used for positional labels
        #[arg(short, long)]
        layout: Option<String>,
    },

    /// Generate a factorization dataset for 2^p - 1 and 2^p + 1
    GenerateData {
        /// Largest exponent
        #[arg(long, default_value_t = 64)]
        max_p: u32,

        /// Output file
        #[arg(short, long, default_value = "data/generated.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging first
    let env = Environment::load();
    let _log_guard = logging::init_logging(Path::new(&env.log_dir))?;
    tracing::info!("Prime Lattice starting up");

    let cli = Cli::parse();
    tracing::debug!("CLI args parsed: config={:?}", cli.config);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Commands::Gui => {
            let dataset = load_dataset(&config.dataset_path(&env));
            tracing::info!("Launching native GUI viewer");
            gui::run_viewer(config, dataset)?;
        }

        Commands::Layouts => list_layouts(),

        Commands::Coords { layout, modulus, indices } => {
            print_coords(Lattice::new(Layout::from_key(&layout), modulus), &indices)?;
        }

        Commands::Inspect { formula, expr, params, layout } => {
            let mut view = config.view.clone();
            if let Some(key) = formula {
                view.formula = FormulaKind::from_key(&key)
                    .ok_or_else(|| anyhow::anyhow!("Unknown formula: {}", key))?;
            }
            if let Some(expr) = expr {
                view.custom_formula = expr;
            }
            if let Some(params) = params {
                view.params = params;
            }
            if let Some(layout) = layout {
                view.layout = layout;
            }
            let dataset = load_dataset(&config.dataset_path(&env));
            inspect(&config, view.lattice(), &view.scene_inputs(), dataset);
        }

        Commands::GenerateData { max_p, output } => {
            generate_data(max_p, &output)?;
        }
    }

    Ok(())
}

/// Load the factorization dataset. A missing or broken file leaves the
/// dataset empty; dataset-backed formulas then resolve nothing.
fn load_dataset(path: &Path) -> Dataset {
    match Dataset::load(path) {
        Ok(dataset) => {
            tracing::info!("Dataset loaded: {} records from {:?}", dataset.len(), path);
            dataset
        }
        Err(e) => {
            prime_lattice::log_error!(e, path = %path.display());
            Dataset::default()
        }
    }
}

fn list_layouts() {
    println!("Available layouts ({}):", Layout::ALL.len());
    println!();
    for layout in Layout::ALL {
        let spec = layout.spec();
        println!(
            "  - {} [{}] cells: {:?}, zoom: {}, recenter: {:?}",
            spec.name, spec.key, spec.shape, spec.default_zoom, spec.anchor
        );
    }
}

fn print_coords(lattice: Lattice, indices: &[String]) -> anyhow::Result<()> {
    println!("Layout: {}", lattice.layout.name());
    for text in indices {
        let n: BigInt = text
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid index '{}': {}", text, e))?;
        let pos = lattice.position(&n);
        println!("  {:>12}  {:<32} x={:.3} y={:.3}", n, pos.cell.to_string(), pos.x, pos.y);
    }
    Ok(())
}

/// Build the scene through the controller, render one frame onto a
/// recording surface and print what the viewer would show.
fn inspect(config: &Config, lattice: Lattice, inputs: &SceneInputs, dataset: Dataset) {
    let canvas = Vec2::new(config.window.width, config.window.height);
    let mut controller = Controller::new(lattice, canvas, config.render.clone(), dataset);
    if !controller.submit(inputs) {
        println!("No parameters in '{}'", inputs.params);
        return;
    }

    let blocks = controller.summary();
    println!("{} entries on {} layout", blocks.len(), lattice.layout.name());
    println!();
    for block in &blocks {
        println!("{}", block);
    }

    let mut recorder = Recorder::default();
    let report = controller.frame(&mut recorder, 0.0);
    println!(
        "Frame: {} cells, {} markers ({} off-screen), {} draw calls",
        report.cells,
        report.markers,
        report.offscreen,
        recorder.ops.len()
    );
}

fn generate_data(max_p: u32, output: &Path) -> anyhow::Result<()> {
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    println!("Generating records for p = 1..={}...", max_p);
    let records = dataset::generate(max_p);
    std::fs::write(output, serde_json::to_string_pretty(&records)?)?;
    println!("  {} records -> {:?}", records.len(), output);
    println!("Done!");
    Ok(())
}
