use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use promptline_engine::{HttpTransport, WorkflowTransport};

mod commands;

/// Browse workflows on a workflow-automation instance and edit node prompts.
#[derive(Parser, Debug)]
#[command(name = "promptline", version, about)]
struct Cli {
    /// Instance base URL (falls back to PROMPTLINE_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Instance API key (falls back to PROMPTLINE_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List workflows on the instance
    Workflows,
    /// List the nodes of a workflow
    Nodes {
        /// Workflow id or exact name
        #[arg(long)]
        workflow: String,
    },
    /// List candidate prompt fields of a node
    Fields {
        /// Workflow id or exact name
        #[arg(long)]
        workflow: String,
        /// Node id or exact name
        #[arg(long)]
        node: String,
        /// Deepest nested level inspected for prompt-like keys
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Replace the text of one node field
    Push(PushArgs),
}

#[derive(Args, Debug)]
struct PushArgs {
    /// Workflow id or exact name
    #[arg(long)]
    workflow: String,
    /// Node id or exact name
    #[arg(long)]
    node: String,
    /// Field path as listed by `fields`, e.g. `options.systemMessage`
    #[arg(long)]
    field: String,
    /// New content given inline
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    /// Read new content from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let credentials = promptline_util::resolve_credentials(cli.url, cli.api_key);

    let transport: Arc<dyn WorkflowTransport> = Arc::new(HttpTransport);

    match cli.command {
        Command::Workflows => commands::list_workflows(transport, credentials, cli.json).await,
        Command::Nodes { workflow } => commands::list_nodes(transport, credentials, &workflow, cli.json).await,
        Command::Fields {
            workflow,
            node,
            max_depth,
        } => commands::list_fields(transport, credentials, &workflow, &node, max_depth, cli.json).await,
        Command::Push(args) => {
            let content = commands::read_content(args.text, args.file.as_deref())?;
            let target = commands::FieldTarget {
                workflow: &args.workflow,
                node: &args.node,
                field: &args.field,
            };
            commands::push(transport, credentials, &target, content, cli.json).await
        }
    }
}

/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
