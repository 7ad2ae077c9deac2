use std::{
    fs,
    io::{IsTerminal, Read},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::debug;

use mathlang::{Node, PrettyPrint, Renderer, UnsupportedRenderError};

mod config_file;
mod tree_file;

use config_file::{Config, ConfigError, OutputFormat, load_config_file};
use tree_file::{parse_tree, to_report};

/// Renders math expression trees to MathML or LaTeX
#[derive(Parser, Debug)]
#[command(version, about = "Renders math expression trees to MathML or LaTeX", long_about = None)]
struct Args {
    /// The TOML tree file to render; "-" or nothing reads from stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Reads settings from the given TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sets the output notation, overriding the configuration file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-prints the markup output
    #[arg(long)]
    pretty: bool,

    /// Adds the MathML namespace to <math> tags
    #[arg(long)]
    xml_namespace: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => load_config_file(path).unwrap_or_else(|e| exit_config_error(e, path)),
        None => Config::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if args.pretty {
        config.render.pretty_print = PrettyPrint::Always;
    }
    if args.xml_namespace {
        config.render.xml_namespace = true;
    }
    debug!("using {config:?}");

    let (source_name, source) = match args.file {
        Some(ref fpath) if fpath != Path::new("-") => (
            fpath.display().to_string(),
            fs::read_to_string(fpath).unwrap_or_else(|e| exit_io_error(e)),
        ),
        _ => ("<stdin>".to_string(), read_stdin()),
    };
    let tree = parse_tree(&source).unwrap_or_else(|e| exit_tree_error(&e, &source_name, &source));

    let renderer = Renderer::new(config.render);
    match render(&renderer, &tree, config.format) {
        Ok(output) => println!("{}", output),
        Err(e) => exit_render_error(e),
    }
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
        exit_io_error(e);
    }
    buffer
}

fn render(
    renderer: &Renderer,
    tree: &Node,
    format: OutputFormat,
) -> Result<String, UnsupportedRenderError> {
    match format {
        OutputFormat::Markup => Ok(renderer.markup(tree)),
        OutputFormat::Typeset => renderer.typeset(tree),
        OutputFormat::Both => {
            let typeset = renderer.typeset(tree)?;
            Ok(renderer.markup(tree) + "\n" + &typeset)
        }
    }
}

fn exit_tree_error(e: &toml::de::Error, source_name: &str, source: &str) -> ! {
    let report = to_report(e, source_name, std::io::stderr().is_terminal());
    if report
        .eprint((source_name, ariadne::Source::from(source)))
        .is_err()
    {
        eprintln!("Invalid expression tree in '{}': {}", source_name, e);
    }
    std::process::exit(2);
}

fn exit_render_error(e: UnsupportedRenderError) -> ! {
    eprintln!("Rendering error: {}", e);
    std::process::exit(2);
}

fn exit_config_error(e: ConfigError, fp: &Path) -> ! {
    eprintln!("Configuration error in '{}': {}", fp.display(), e);
    std::process::exit(1);
}

fn exit_io_error(e: std::io::Error) -> ! {
    eprintln!("IO Error: {}", e);
    std::process::exit(1);
}
