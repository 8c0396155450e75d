use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;

use solid_run::{load_runs, Run, RunReport};

/// Report on the contents of SOLiD run directories.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Run directories, e.g. /path/to/SOLiD/data/solid0123_20130426_FRAG_BC
    #[arg(required = true)]
    run_dirs: Vec<PathBuf>,

    /// Only list libraries in samples matching this name or prefix* pattern
    #[arg(long, default_value = "*")]
    sample: String,

    /// Only list libraries matching this name or prefix* pattern
    #[arg(long, default_value = "*")]
    library: String,

    /// List project groupings instead of the full report
    #[arg(long)]
    projects: bool,
}

fn spinner(colour: &str, message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&format!("{{spinner:.{colour}}} {{msg}}"))
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner
}

fn print_libraries(run: &Run, sample_pattern: &str, library_pattern: &str) {
    for library in run.fetch_libraries(sample_pattern, library_pattern) {
        let sample = run.parent_sample(library).map(|s| s.name()).unwrap_or("?");
        let show = |p: Option<&std::path::Path>| {
            p.map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{}\t{}\t{}\t{}",
            sample,
            library,
            show(library.csfasta()),
            show(library.qual())
        );
    }
}

fn print_projects(run: &Run) {
    for (sample, project) in run.projects() {
        println!(
            "{}\t{}\t{}\t{}",
            sample,
            project.display_name(sample).unwrap_or(project.name()),
            project.library_name_pattern().unwrap_or_default(),
            if project.is_barcoded(sample) == Some(true) { "barcoded" } else { "-" }
        );
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let loading = spinner("green", "Scanning run directories...");
    let runs = load_runs(&cli.run_dirs);
    loading.finish_with_message(format!("Loaded {} run(s).", runs.len()));

    let filtered = cli.sample != "*" || cli.library != "*";
    let mut all_valid = true;
    for (run_dir, run) in cli.run_dirs.iter().zip(&runs) {
        if !run.is_valid() {
            all_valid = false;
            log::error!(
                "Error loading run data from {}: {:?}",
                run_dir.display(),
                run.status()
            );
        }
        if cli.projects {
            print_projects(run);
        } else if filtered {
            print_libraries(run, &cli.sample, &cli.library);
        } else {
            print!("{}", RunReport::new(run));
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
