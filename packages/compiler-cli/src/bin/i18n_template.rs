/**
 * i18n Template CLI - i18n-template
 *
 * Rewrite templates into translation calls and extract their phrases
 */
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::process;

use i18n_template::{CatalogFormat, TemplateConfig};
use i18n_template_cli::extract_phrases::{extract_phrases, ExtractPhrasesOptions};
use i18n_template_cli::load_config;
use i18n_template_cli::show_template::show_template;

fn cli() -> Command {
    let formats: Vec<&'static str> = CatalogFormat::ALL.iter().map(|f| f.as_str()).collect();

    Command::new("i18n-template")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Internationalize HTML/ERB templates")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("JSON file with template options")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every step and print diagnostics")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("show-template")
                .about("Print a template with its phrases replaced by translation calls")
                .arg(Arg::new("file").value_name("FILE").required(true)),
        )
        .subcommand(
            Command::new("extract-phrases")
                .about("Collect the phrases of many templates into a catalog")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("Catalog format")
                        .value_parser(PossibleValuesParser::new(formats))
                        .default_value("plain"),
                )
                .arg(
                    Arg::new("output-file")
                        .short('o')
                        .long("output-file")
                        .value_name("PATH")
                        .help("Catalog path, '-' for stdout")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("files")
                        .value_name("FILES")
                        .num_args(1..)
                        .required(true),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();
    let verbose = matches.get_flag("verbose");

    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    };

    let ok = match matches.subcommand() {
        Some(("show-template", sub)) => run_show_template(sub, &config, verbose),
        Some(("extract-phrases", sub)) => run_extract_phrases(sub, &config, verbose),
        _ => unreachable!("subcommand is required"),
    };
    if !ok {
        process::exit(1);
    }
}

fn run_show_template(matches: &ArgMatches, config: &TemplateConfig, verbose: bool) -> bool {
    let Some(file) = matches.get_one::<String>("file") else {
        return false;
    };
    match show_template(Path::new(file), config, verbose) {
        Ok(output) => {
            print!("{}", output);
            true
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            false
        }
    }
}

fn run_extract_phrases(matches: &ArgMatches, config: &TemplateConfig, verbose: bool) -> bool {
    let format = matches
        .get_one::<String>("format")
        .and_then(|name| name.parse::<CatalogFormat>().ok())
        .unwrap_or(CatalogFormat::Plain);
    let files: Vec<String> = matches
        .get_many::<String>("files")
        .map(|files| files.cloned().collect())
        .unwrap_or_default();

    let mut options = ExtractPhrasesOptions::new(format, files);
    options.output_file = matches.get_one::<PathBuf>("output-file").cloned();
    options.verbose = verbose;

    match extract_phrases(&options, config) {
        Ok(result) => {
            for failure in &result.failures {
                eprintln!("Error: {}", failure);
            }
            result.success()
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            false
        }
    }
}
