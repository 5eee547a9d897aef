use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use flags::{parse_overlay, ConfigFormat};
use preview_composer::ComposedDocument;
use preview_graph::{GraphBuilder, ModuleNode, ReferenceEdge};
use preview_host::{PreviewConfig, PreviewSession, SandboxChannel};
use preview_parser::ProjectKind;
use serde_json::json;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

mod flags;

#[derive(Parser)]
#[command(name = "preview")]
#[command(about = "Reconstruct generated projects and compose sandboxed live previews", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// Configuration file (.json, otherwise TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a response into files and print the project as JSON
    Parse(InputArgs),

    /// Print the folder tree of the parsed project
    Tree(InputArgs),

    /// Classify the parsed project (framework, flat, unknown)
    Classify(InputArgs),

    /// Print the module graph: references between files, what the entry pulls in
    Graph(GraphArgs),

    /// Compose the preview document
    Compose(ComposeArgs),

    /// Write every project file (with edits applied) into a directory
    Export(ExportArgs),

    /// Decode a sandbox message and print the host event it produces
    Message(MessageArgs),

    /// Print the JSON schema of the sandbox message envelope
    Schema,

    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Response text file (reads stdin when omitted or `-`)
    input: Option<PathBuf>,
}

#[derive(Args)]
struct GraphArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Replace a file's content: PATH=FILE (repeatable)
    #[arg(long = "overlay", value_parser = parse_overlay)]
    overlays: Vec<(String, PathBuf)>,
}

#[derive(Args)]
struct ComposeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Tag editable elements and intercept clicks
    #[arg(long)]
    edit: bool,

    /// Replace a file's content: PATH=FILE (repeatable)
    #[arg(long = "overlay", value_parser = parse_overlay)]
    overlays: Vec<(String, PathBuf)>,

    /// Write the document here and print a JSON summary instead
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Target directory
    #[arg(long)]
    out: PathBuf,

    /// Replace a file's content: PATH=FILE (repeatable)
    #[arg(long = "overlay", value_parser = parse_overlay)]
    overlays: Vec<(String, PathBuf)>,
}

#[derive(Args)]
struct MessageArgs {
    /// Inline JSON message (reads stdin when omitted)
    #[arg(long)]
    json: Option<String>,

    /// Instance id of the bound document
    #[arg(long, default_value = "doc-1")]
    instance: String,

    /// Treat the bound document as composed in edit mode
    #[arg(long)]
    edit: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ConfigFormat::Json)]
    format: ConfigFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse(args) => run_parse(args, config)?,
        Commands::Tree(args) => run_tree(args, config)?,
        Commands::Classify(args) => run_classify(args, config)?,
        Commands::Graph(args) => run_graph(args, config)?,
        Commands::Compose(args) => run_compose(args, config)?,
        Commands::Export(args) => run_export(args, config)?,
        Commands::Message(args) => run_message(args, config)?,
        Commands::Schema => run_schema()?,
        Commands::Config(args) => run_config(args, &config)?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PreviewConfig> {
    match path {
        Some(path) => {
            let config = PreviewConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(PreviewConfig::default()),
    }
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    print_stdout(&serde_json::to_string_pretty(value)?)
}

fn read_input(args: &InputArgs) -> Result<String> {
    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read response from {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read response from stdin")?;
            Ok(buffer)
        }
    }
}

/// Session with the input parsed and the overlays applied
fn open_session(
    input: &InputArgs,
    overlays: &[(String, PathBuf)],
    config: PreviewConfig,
) -> Result<PreviewSession> {
    let source = read_input(input)?;
    let mut session = PreviewSession::new(config).context("Invalid configuration")?;
    session.set_source(&source);

    for (path, file) in overlays {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read overlay {}", file.display()))?;
        session
            .edit_file(path, content)
            .with_context(|| format!("Cannot apply overlay for {path}"))?;
    }
    Ok(session)
}

fn run_parse(args: InputArgs, config: PreviewConfig) -> Result<()> {
    let session = open_session(&args, &[], config)?;
    let project = session.project();
    print_json(&json!({
        "files": project.files,
        "report": project.report,
        "classification": session.classification(),
    }))
}

fn run_tree(args: InputArgs, config: PreviewConfig) -> Result<()> {
    let session = open_session(&args, &[], config)?;
    print_json(&session.tree())
}

fn run_classify(args: InputArgs, config: PreviewConfig) -> Result<()> {
    let session = open_session(&args, &[], config)?;
    print_json(session.classification())
}

fn run_graph(args: GraphArgs, config: PreviewConfig) -> Result<()> {
    let session = open_session(&args.input, &args.overlays, config)?;
    let graph = GraphBuilder::build(&session.view());

    let links = |edges: Vec<(&ModuleNode, &ReferenceEdge)>| -> Vec<serde_json::Value> {
        edges
            .into_iter()
            .map(|(node, edge)| json!({ "path": node.path, "reference": edge.kind, "target": edge.target }))
            .collect()
    };
    let modules: Vec<_> = graph
        .nodes()
        .map(|(_, node)| {
            json!({
                "path": node.path,
                "kind": node.kind,
                "edited": node.edited,
                "dependencies": links(graph.dependencies(&node.path)),
                "dependents": links(graph.dependents(&node.path)),
            })
        })
        .collect();

    let entry = session.classification().entry.clone();
    let reachable: Vec<&str> = entry
        .as_deref()
        .map(|entry| {
            graph
                .reachable_from(entry)
                .into_iter()
                .map(|node| node.path.as_str())
                .collect()
        })
        .unwrap_or_default();

    print_json(&json!({
        "entry": entry,
        "modules": modules,
        "reachable": reachable,
        "unresolved": graph.unresolved(),
    }))
}

fn run_compose(args: ComposeArgs, config: PreviewConfig) -> Result<()> {
    let mut session = open_session(&args.input, &args.overlays, config)?;
    if args.edit {
        session.set_edit_mode(true);
    }
    let document = session.compose();

    match args.output {
        Some(path) => {
            fs::write(&path, &document.html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_json(&json!({
                "output": path,
                "kind": document.kind,
                "entry": document.entry,
                "instance_id": document.instance_id,
                "sandbox": document.sandbox,
                "edit_mode": document.edit_mode,
                "bytes": document.html.len(),
                "diagnostics": document.diagnostics,
            }))
        }
        None => print_stdout(&document.html),
    }
}

fn run_export(args: ExportArgs, config: PreviewConfig) -> Result<()> {
    let session = open_session(&args.input, &args.overlays, config)?;
    let artifacts = session.export_all()?;

    for artifact in &artifacts {
        if artifact.path.split('/').any(|segment| segment == "..") {
            anyhow::bail!("Refusing to export {} outside the target directory", artifact.path);
        }
        let target = args.out.join(&artifact.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, &artifact.bytes)
            .with_context(|| format!("Failed to write {}", target.display()))?;
    }
    log::info!("Exported {} files to {}", artifacts.len(), args.out.display());

    print_json(&artifacts)
}

fn run_message(args: MessageArgs, config: PreviewConfig) -> Result<()> {
    let raw = match args.json {
        Some(raw) => raw,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read message from stdin")?;
            buffer
        }
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("Message is not valid JSON")?;

    let mut channel = SandboxChannel::new(config.composer.height, config.host.clone());
    channel.bind(&ComposedDocument {
        html: String::new(),
        kind: ProjectKind::Flat,
        instance_id: args.instance,
        sandbox: config.composer.sandbox.clone(),
        edit_mode: args.edit,
        entry: None,
        diagnostics: Vec::new(),
    });

    let event = channel.handle(&value);
    print_json(&event)
}

fn run_schema() -> Result<()> {
    let schema = preview_protocol::envelope_schema().context("Failed to build schema")?;
    print_json(&schema)
}

fn run_config(args: ConfigArgs, config: &PreviewConfig) -> Result<()> {
    log::debug!("Printing config as {}", args.format.as_str());
    match args.format {
        ConfigFormat::Json => print_json(config),
        ConfigFormat::Toml => print_stdout(&toml::to_string_pretty(config)?),
    }
}
