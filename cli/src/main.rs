mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use harness::{HarnessConfig, HighlighterCommand, ProcessHighlighter};

#[derive(Parser)]
#[command(
    name = "spancheck",
    version,
    about = "Check that line-at-a-time highlighting matches whole-document highlighting"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log progress to stderr (SPANCHECK_LOG overrides the filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file. Defaults to ./spancheck.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check every fixture under a fixture root
    Check(CheckArgs),

    /// Merge line-split spans in a markup file and print the result
    Normalize(NormalizeArgs),

    /// Highlight a source file with the configured highlighter
    Render(RenderArgs),
}

#[derive(clap::Args)]
struct HighlighterArgs {
    /// Highlighter program, replacing the one in the config file
    #[arg(long)]
    highlighter: Option<String>,

    /// Argument for the highlighter program. Repeatable.
    #[arg(long = "highlighter-arg", allow_hyphen_values = true)]
    highlighter_args: Vec<String>,

    /// Deadline for each highlighter call, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Fixture root containing one directory per language
    path: Option<PathBuf>,

    /// Check only these languages. Repeatable.
    #[arg(short, long)]
    language: Vec<String>,

    /// List available languages and exit
    #[arg(long)]
    list_languages: bool,

    #[command(flatten)]
    highlighter: HighlighterArgs,
}

#[derive(clap::Args)]
struct NormalizeArgs {
    /// Markup file to normalize. Reads stdin when absent.
    file: Option<PathBuf>,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Language name passed to the highlighter
    language: String,

    /// Source file to highlight
    file: PathBuf,

    /// Feed the highlighter one line at a time
    #[arg(long)]
    by_line: bool,

    /// Normalize the markup before printing
    #[arg(long)]
    normalize: bool,

    #[command(flatten)]
    highlighter: HighlighterArgs,
}

impl HighlighterArgs {
    /// Command-line flags take precedence over the config file.
    fn resolve(&self, config: &HarnessConfig) -> Option<HighlighterCommand> {
        let mut command = match &self.highlighter {
            Some(program) => HighlighterCommand {
                command: program.clone(),
                args: self.highlighter_args.clone(),
                timeout_ms: None,
            },
            None => config.highlighter.clone()?,
        };
        if let Some(timeout_ms) = self.timeout_ms {
            command.timeout_ms = Some(timeout_ms);
        }
        Some(command)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match HarnessConfig::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let code = match cli.command {
        Command::Check(args) => do_check(args, config, cli.no_color).await,
        Command::Normalize(args) => do_normalize(args).await,
        Command::Render(args) => do_render(args, &config).await,
    };
    process::exit(code);
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SPANCHECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "error" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", error);
    process::exit(1);
}

fn spawn_highlighter(args: &HighlighterArgs, config: &HarnessConfig) -> ProcessHighlighter {
    let Some(command) = args.resolve(config) else {
        fail("no highlighter configured (use --highlighter or a [highlighter] table)");
    };
    ProcessHighlighter::spawn(&command).unwrap_or_else(|e| fail(e))
}

async fn do_check(args: CheckArgs, config: HarnessConfig, no_color: bool) -> i32 {
    let Some(root) = args.path.clone().or_else(|| config.fixtures.clone()) else {
        fail("no fixture root given (pass a path or set `fixtures` in the config)");
    };

    if args.list_languages {
        return runner::list_languages(&root, &config.exceptions);
    }

    let highlighter = spawn_highlighter(&args.highlighter, &config);
    let (code, highlighter) =
        runner::run_checks(&root, &args.language, highlighter, config.exceptions, no_color).await;
    if let Err(e) = highlighter.shutdown().await {
        tracing::warn!(error = %e, "highlighter did not shut down cleanly");
    }
    code
}

async fn do_normalize(args: NormalizeArgs) -> i32 {
    let input = match &args.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path.display(), e))),
        None => {
            let mut buf = String::new();
            if let Err(e) = tokio::io::stdin().read_to_string(&mut buf).await {
                fail(format!("cannot read stdin: {}", e));
            }
            buf
        }
    };
    print!("{}", markup::normalize(&input));
    0
}

async fn do_render(args: RenderArgs, config: &HarnessConfig) -> i32 {
    let source = tokio::fs::read_to_string(&args.file)
        .await
        .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", args.file.display(), e)));

    let mut highlighter = spawn_highlighter(&args.highlighter, config);
    let rendered = if args.by_line {
        harness::highlight_lines(&mut highlighter, &args.language, &source).await
    } else {
        harness::highlight_document(&mut highlighter, &args.language, &source).await
    };

    let code = match rendered {
        Ok(html) if args.normalize => {
            print!("{}", markup::normalize(&html));
            0
        }
        Ok(html) => {
            print!("{}", html);
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    };
    if let Err(e) = highlighter.shutdown().await {
        tracing::warn!(error = %e, "highlighter did not shut down cleanly");
    }
    code
}
