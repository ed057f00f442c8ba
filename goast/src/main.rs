use clap::{ArgAction, Args, Parser, Subcommand};
use miette::MietteHandlerOpts;
use std::path::{Path, PathBuf};
use std::process;

mod commands;
mod config;
mod decls;
mod error;
mod loader;
mod logger;
mod writer;

use commands::ImplRequest;
use config::{load_config, Overrides};
use error::CliResult;

#[derive(Parser)]
#[command(
    name = "goast",
    version,
    about = "An AST utility for Go",
    long_about = "Generates Go code by specializing generic templates, whose type variables are declared as interface{}, against the concrete types of a provider file."
)]
struct Cli {
    /// More log output: -v info, -vv debug, -vvv trace ($GOAST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of ./goast.toml
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code with AST transformations
    Write {
        #[command(subcommand)]
        command: WriteCommands,
    },

    /// Print representations of a Go file's AST
    Print {
        #[command(subcommand)]
        command: PrintCommands,
    },
}

#[derive(Subcommand)]
enum WriteCommands {
    /// Generate an implementation of a generically defined file
    Impl(ImplArgs),
}

#[derive(Args)]
struct ImplArgs {
    /// Generic file to implement
    #[arg(value_name = "GENERIC")]
    generic: PathBuf,

    /// File that provides types to the generic file (defaults to $GOFILE)
    #[arg(value_name = "PROVIDER")]
    provider: Option<PathBuf>,

    /// Prepended to every output file name
    #[arg(long)]
    prefix: Option<String>,

    /// Appended to every output file name, before .go
    #[arg(long)]
    suffix: Option<String>,

    /// Token marking related type names in the generic file
    #[arg(long)]
    marker: Option<String>,

    /// Directory for output files (defaults to the provider's directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Try candidates one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Print the generated files instead of writing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum PrintCommands {
    /// Print a summary of the top level declarations of a file
    Decls {
        /// File to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = match cli.command {
        Some(Commands::Write {
            command: WriteCommands::Impl(args),
        }) => handle_write_impl(args, cli.config.as_deref()),
        Some(Commands::Print {
            command: PrintCommands::Decls { file },
        }) => handle_print_decls(&file),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["goast", "--help"]);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{:?}", miette::Report::new(err));
        process::exit(1);
    }
}

/// Configure miette for error reporting with Go syntax highlighting
fn setup_miette_handler() {
    use miette::highlighters::SyntectHighlighter;
    use syntect::highlighting::ThemeSet;
    use syntect::parsing::SyntaxSet;

    // syntect's default set ships a Go syntax
    let syntax_set = SyntaxSet::load_defaults_newlines();
    let theme_set = ThemeSet::load_defaults();
    let Some(theme) = theme_set.themes.get("base16-ocean.dark") else {
        return;
    };
    let highlighter = SyntectHighlighter::new(syntax_set, theme.clone(), true);

    miette::set_hook(Box::new(move |_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .color(true)
                .tab_width(4)
                .with_cause_chain()
                .with_syntax_highlighting(highlighter.clone())
                .build(),
        )
    }))
    .ok();
}

fn handle_write_impl(args: ImplArgs, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path, Path::new("."))?;

    let request = ImplRequest {
        generic: args.generic,
        provider: args.provider,
        overrides: Overrides {
            prefix: args.prefix,
            suffix: args.suffix,
            marker: args.marker,
            output_dir: args.output_dir,
            sequential: args.sequential,
        },
        dry_run: args.dry_run,
    };

    let files = commands::write_impl(&request, &config)?;
    for file in &files {
        if request.dry_run {
            println!("// {}\n{}", file.path.display(), file.contents);
        } else {
            println!("✅ {}", file.path.display());
        }
    }
    Ok(())
}

fn handle_print_decls(file: &Path) -> CliResult<()> {
    for line in commands::print_decls(file)? {
        println!("{}", line);
    }
    Ok(())
}
