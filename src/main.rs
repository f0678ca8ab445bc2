// ── Command-line front end ────────────────────────────────────────────────────
//
// Thin wrapper over `dlgedit::Document`: every command loads a template,
// optionally edits it, and prints or saves the result.  Logging goes to
// stderr through `tracing-subscriber`; `RUST_LOG` overrides `-v`.
#![deny(unsafe_code)]

use std::io::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use dlgedit::{Direction, Document, NudgeMode, Result, Selection, TemplateSource};

#[derive(Parser, Debug)]
#[command(name = "dlgedit")]
#[command(version, about = "Inspect and edit dialog resource templates", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a template and report the first syntax error, if any
    Check {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the parsed model as JSON
    Dump {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the header, or one control, as editor text
    Show {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Control index in tab order; the header when omitted
        #[arg(short, long)]
        control: Option<usize>,
    },

    /// Load and re-save a template, normalizing every control line
    Fmt {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write the built-in default template
    New {
        /// Output file; stdout when omitted
        #[arg(value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Move or resize the header or one control
    Nudge {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Control index in tab order; the header when omitted
        #[arg(short, long)]
        control: Option<usize>,

        #[arg(short, long, value_enum)]
        direction: DirectionArg,

        /// Change the size instead of the position
        #[arg(long)]
        resize: bool,

        /// Step one dialog unit instead of eight
        #[arg(long)]
        fine: bool,

        /// Number of steps
        #[arg(short = 'n', long, default_value_t = 1)]
        steps: u32,

        /// Output file; rewrites FILE when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
            DirectionArg::Left => Self::Left,
            DirectionArg::Right => Self::Right,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("dlgedit: {e}");
        std::process::exit(1);
    }
}

fn open(path: PathBuf) -> Result<Document> {
    let mut doc = Document::new();
    doc.load_template(TemplateSource::File(path))?;
    Ok(doc)
}

fn select(doc: &mut Document, control: Option<usize>) -> Result<()> {
    doc.select(control.map_or(Selection::Dialog, Selection::Control))
}

fn run(command: Commands) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::Check { input } => {
            let doc = open(input)?;
            let count = doc.template().map_or(0, |t| t.controls.len());
            writeln!(stdout, "{}: ok, {count} controls", doc.display_name())?;
        }
        Commands::Dump { input } => {
            let doc = open(input)?;
            serde_json::to_writer_pretty(&mut stdout, &doc.template())?;
            writeln!(stdout)?;
        }
        Commands::Show { input, control } => {
            let mut doc = open(input)?;
            select(&mut doc, control)?;
            let text = match doc.selection() {
                Selection::Dialog => doc.format_header_text()?,
                Selection::Control(index) => doc.format_control_text(index)?,
            };
            stdout.write_all(text.as_bytes())?;
        }
        Commands::Fmt { input, output } => {
            let mut doc = open(input)?;
            match output {
                Some(path) => doc.save_template(path)?,
                None => stdout.write_all(doc.template_text()?.as_bytes())?,
            }
        }
        Commands::New { output } => {
            let mut doc = Document::new();
            doc.load_template(TemplateSource::Default)?;
            match output {
                Some(path) => doc.save_template(path)?,
                None => stdout.write_all(doc.template_text()?.as_bytes())?,
            }
        }
        Commands::Nudge {
            input,
            control,
            direction,
            resize,
            fine,
            steps,
            output,
        } => {
            let target = output.unwrap_or_else(|| input.clone());
            let mut doc = open(input)?;
            select(&mut doc, control)?;
            let mode = if resize { NudgeMode::Resize } else { NudgeMode::Move };
            for _ in 0..steps {
                doc.nudge(direction.into(), mode, fine)?;
            }
            doc.save_template(target)?;
        }
    }
    Ok(())
}
