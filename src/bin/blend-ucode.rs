use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use blend_ucode::blend::catalog::{self, CATALOG};
use blend_ucode::table::{self, BlendTable, BuildOpts, EmitFormat};
use blend_ucode::{BlendKey, BlendOp, Overlap};

#[derive(Parser, Debug)]
#[command(name = "blend-ucode", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the blend table and write it out.
    Emit(EmitArgs),
    /// Print the program for one blend configuration.
    Disasm(DisasmArgs),
    /// Summarize the catalog and the deduplicated table.
    Stats,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Rust,
}

impl From<FormatArg> for EmitFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => EmitFormat::Json,
            FormatArg::Rust => EmitFormat::Rust,
        }
    }
}

#[derive(Parser, Debug)]
struct EmitArgs {
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    format: FormatArg,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Skip running each generator twice.
    #[arg(long, default_value_t = false)]
    no_verify: bool,

    /// Skip structural validation of generated programs.
    #[arg(long, default_value_t = false)]
    no_validate: bool,
}

#[derive(Parser, Debug)]
struct DisasmArgs {
    /// Operator name, e.g. `src_over` or `hsl_color`.
    op: BlendOp,

    /// Overlap model: uncorrelated, disjoint or conjoint.
    #[arg(default_value_t = Overlap::Uncorrelated)]
    overlap: Overlap,

    /// Treat the source color as straight (not premultiplied).
    #[arg(long, default_value_t = false)]
    straight: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Emit(args) => cmd_emit(args),
        Command::Disasm(args) => cmd_disasm(args),
        Command::Stats => cmd_stats(),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_emit(args: EmitArgs) -> anyhow::Result<()> {
    let opts = BuildOpts {
        verify_determinism: !args.no_verify,
        validate_programs: !args.no_validate,
    };
    let table = BlendTable::build_with(&opts).context("build blend table")?;
    let text = table::emit(&table, args.format.into()).context("emit blend table")?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("write table '{}'", path.display()))?;
            eprintln!(
                "wrote {} ({} entries for {} triples)",
                path.display(),
                table.len(),
                table.triple_count()
            );
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn cmd_disasm(args: DisasmArgs) -> anyhow::Result<()> {
    let resolved = blend_ucode::resolve(args.op, args.overlap, !args.straight)
        .with_context(|| format!("resolve {}", BlendKey::new(args.op, args.overlap, !args.straight)))?;

    println!("; {}", resolved.key);
    println!("; hash {}", resolved.hash);
    println!("; alpha {:?}", resolved.alpha);
    print!("{}", resolved.program);
    Ok(())
}

fn cmd_stats() -> anyhow::Result<()> {
    let table = BlendTable::build().context("build blend table")?;

    let mut total = 0usize;
    let mut longest = (0usize, None::<BlendKey>);
    let mut computed = 0usize;
    for entry in table.entries() {
        let generated = catalog::generate(entry.key)
            .with_context(|| format!("regenerate {}", entry.key))?;
        let len = generated.program.len();
        total += len;
        if len > longest.0 {
            longest = (len, Some(entry.key));
        }
        if generated.alpha.is_computed() {
            computed += 1;
        }
    }

    println!("catalog triples:   {}", CATALOG.len());
    println!("distinct programs: {}", table.len());
    println!("merged triples:    {}", table.triple_count() - table.len());
    println!("computed alpha:    {computed}");
    if !table.is_empty() {
        println!("mean length:       {:.1}", total as f64 / table.len() as f64);
    }
    if let (len, Some(key)) = longest {
        println!("longest program:   {len} ({key})");
    }
    Ok(())
}
