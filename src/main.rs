//! scaffold-maker entry point.
//! Parses arguments, resolves the parameters of the run and hands them to
//! the generator.

use std::time::Duration;

use scaffold_maker::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    generator::{describe, Generator},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    let print_config = args.print_config;
    let timeout = args.timeout.map(Duration::from_secs);
    let params = args.into_parameters()?;

    if print_config {
        println!("{}", describe(&params)?);
        return Ok(());
    }

    let renderer = MiniJinjaRenderer::new()?;
    let mut generator = Generator::new(&renderer);
    if let Some(timeout) = timeout {
        generator = generator.with_timeout(timeout);
    }

    let report = generator.run(&params)?;
    println!(
        "Generation completed successfully in {} ({} written, {} kept).",
        params.resolve_output_root().display(),
        report.written.len(),
        report.skipped.len()
    );
    Ok(())
}
