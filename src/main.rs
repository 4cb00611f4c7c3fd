use archshape::application::{
    init_config, ConvertOverrides, ConvertService, ResolveService, RunOptions,
};
use archshape::cli::{format_feature, format_report, Cli, Commands};
use archshape::error::ArchShapeError;
use archshape::infrastructure::logging::init_logging;
use archshape::infrastructure::{Config, GeoJsonSink};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let result = init_logging(cli.verbose).and_then(|_| run(cli));

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), ArchShapeError> {
    match cli.command {
        Commands::Convert {
            datum,
            tags,
            output_dir,
            config,
            overwrite,
            skip_empty,
        } => {
            let cwd = std::env::current_dir()?;
            let config = Config::discover(config.as_deref(), &cwd)?;
            let options = RunOptions::resolve(
                config,
                ConvertOverrides {
                    datum,
                    tags,
                    output_dir,
                    overwrite,
                    skip_empty_layers: skip_empty,
                },
            )?;

            let sink = GeoJsonSink::new(
                options.output_dir.clone(),
                options.layer_stem(),
                options.overwrite,
            );
            let report = ConvertService::new(sink).execute(&options)?;
            print!("{}", format_report(&report));
            Ok(())
        }
        Commands::Resolve { tag, lat, lon } => {
            let feature = ResolveService::new(lat, lon)?.execute(&tag)?;
            print!("{}", format_feature(&feature));
            Ok(())
        }
        Commands::InitConfig { path, force } => {
            init_config(&path, force)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}
