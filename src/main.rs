use anyhow::Context;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        cli::Commands::Parse(a) => commands::parse(a).context("parse failed")?,
        cli::Commands::Check(a) => {
            let clean = commands::check(a).context("check failed")?;
            if !clean {
                std::process::exit(1);
            }
        }
        cli::Commands::ListFormats => {
            for fmt in permap::formats::Format::all() {
                println!("{:<8} {}", fmt.name(), fmt.description());
            }
        }
        cli::Commands::Completion { shell } => {
            run_completion(&shell)
                .with_context(|| format!("failed to generate completion for '{shell}'"))?;
        }
    }
    Ok(())
}

/// Diagnostics go to stderr so they never mix with rendered output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("permap=debug")
    } else {
        EnvFilter::try_from_env("PERMAP_LOG").unwrap_or_else(|_| EnvFilter::new("permap=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_completion(shell_str: &str) -> anyhow::Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell};
    use std::str::FromStr;

    let shell = Shell::from_str(shell_str).map_err(|_| {
        anyhow::anyhow!(
            "Unknown shell '{}'. Supported shells: bash, zsh, fish, powershell, elvish",
            shell_str
        )
    })?;

    let mut cmd = cli::Cli::command();
    generate(shell, &mut cmd, "permap", &mut std::io::stdout());
    Ok(())
}

mod commands {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::Path;

    use anyhow::Context;
    use permap::config::{Config, DuplicatePolicy, ParserConfig};
    use permap::formats::Format;
    use permap::method::Role;
    use permap::parser::{ParsedMap, PermissionMethodParser};

    use crate::cli::{CheckArgs, ParseArgs};

    pub fn parse(args: ParseArgs) -> anyhow::Result<()> {
        let format = Format::from_str(&args.format)
            .with_context(|| format!("invalid --format '{}'", args.format))?;
        let mut config = load_parser_config(args.config.as_deref())?;
        if args.merge_duplicates {
            config.duplicates = DuplicatePolicy::MergePermissions;
        }

        let map = read_map(&args.file, config)?;
        if !map.skipped.is_empty() {
            eprintln!("warning: {} line(s) did not match and were skipped", map.skipped.len());
        }

        let methods = map.sorted();
        let writer = format.writer();
        match &args.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                let mut out = BufWriter::new(file);
                writer.write(&methods, &mut out)
                    .with_context(|| format!("failed to write {} to {}", format.name(), path.display()))?;
                out.flush().with_context(|| format!("failed to flush {}", path.display()))?;
                eprintln!("Wrote {} method(s) as {} to {}", methods.len(), format.name(), path.display());
            }
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                writer.write(&methods, &mut out)
                    .with_context(|| format!("failed to write {} to stdout", format.name()))?;
            }
        }
        Ok(())
    }

    /// Prints a summary. Returns false when `--strict` is set and lines were skipped.
    pub fn check(args: CheckArgs) -> anyhow::Result<bool> {
        let config = load_parser_config(args.config.as_deref())?;
        let map = read_map(&args.file, config)?;

        println!("{}", args.file.display());
        println!("  methods:      {}", map.len());
        println!("  sources:      {}", map.count_role(Role::Source));
        println!("  sinks:        {}", map.count_role(Role::Sink));
        println!("  neither:      {}", map.count_role(Role::Neither));
        println!("  unspecified:  {}", map.count_role(Role::Unspecified));
        println!("  duplicates:   {}", map.duplicates);
        println!("  skipped:      {}", map.skipped.len());
        for skipped in &map.skipped {
            println!("    line {}: {}", skipped.line_number, skipped.text);
        }

        Ok(!(args.strict && !map.skipped.is_empty()))
    }

    // ── helpers ──────────────────────────────────────────────────────────────

    fn load_parser_config(path: Option<&Path>) -> anyhow::Result<ParserConfig> {
        let config = Config::resolve(path).context("failed to load config")?;
        Ok(config.parser)
    }

    fn read_map(file: &Path, config: ParserConfig) -> anyhow::Result<ParsedMap> {
        let parser = PermissionMethodParser::from_file(file)
            .with_context(|| format!("failed to read {}", file.display()))?
            .with_config(config);
        parser
            .parse()
            .with_context(|| format!("failed to parse {}", file.display()))
    }
}
