use clap::{Parser, Subcommand};
use console_core::render::connections_overview;
use console_core::{
    ConnectionsStore, ConsoleConfig, MessageLoader, Notifier, PipelineConnection, RestClient,
    SimulatorPhase, SimulatorStore, SimulatorView, Stream, StreamConnection, TracingNotifier,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pipeline-console")]
struct Args {
    /// Graylog API base URL. Falls back to GRAYLOG_URL.
    #[arg(long)]
    url: Option<String>,

    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    password: Option<String>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or change stream/pipeline connections.
    Connections {
        #[command(subcommand)]
        action: ConnectionsAction,
    },
    /// Run a stored message through the pipelines of a stream.
    Simulate {
        #[arg(long)]
        stream: String,

        #[arg(long)]
        stream_title: Option<String>,

        #[arg(long)]
        index: String,

        #[arg(long)]
        message_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConnectionsAction {
    List,
    /// Replace the pipelines connected to one stream.
    ToStream {
        #[arg(long)]
        stream: String,

        #[arg(long = "pipeline")]
        pipelines: Vec<String>,
    },
    /// Replace the streams one pipeline is connected to.
    ToPipeline {
        #[arg(long)]
        pipeline: String,

        #[arg(long = "stream")]
        streams: Vec<String>,
    },
}

/// Prints user-facing notifications on stderr and keeps them in the log.
struct ConsoleNotifier {
    log: TracingNotifier,
}

impl Notifier for ConsoleNotifier {
    fn success(&self, text: &str) {
        self.log.success(text);
        eprintln!("ok: {text}");
    }

    fn error(&self, text: &str, title: &str) {
        self.log.error(text, title);
        eprintln!("error: {title}\n  {text}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let client = Arc::new(RestClient::new(&config)?);
    tracing::debug!(base_url = %client.base_url(), "using graylog api");
    let notifier = Arc::new(ConsoleNotifier {
        log: TracingNotifier,
    });

    match args.command {
        Command::Connections { action } => {
            let store = ConnectionsStore::new(Arc::clone(&client), Arc::clone(&notifier));
            run_connections(&store, action).await
        }
        Command::Simulate {
            stream,
            stream_title,
            index,
            message_id,
        } => {
            let title = stream_title.unwrap_or_else(|| stream.clone());
            let loader = MessageLoader::new(Arc::clone(&client), Arc::clone(&notifier));
            let simulator = SimulatorStore::new(client, notifier);

            let original = loader.load(&index, &message_id).await?;
            let mut view = SimulatorView::new(Stream::new(stream, title));
            let phase = view.load_message(&simulator, original).await;

            if let Some(panel) = view.render() {
                print!("{panel}");
            }
            if phase == SimulatorPhase::Error {
                anyhow::bail!("simulation failed for message {message_id}");
            }
            Ok(())
        }
    }
}

fn build_config(args: &Args) -> anyhow::Result<ConsoleConfig> {
    let mut config = match args.url.as_deref() {
        Some(url) => ConsoleConfig::from_env_with_base_url(url)?,
        None => ConsoleConfig::from_env()?,
    };
    if let Some(user) = args.username.as_deref() {
        let password = args
            .password
            .clone()
            .or_else(|| config.password.clone())
            .unwrap_or_default();
        config = config.with_credentials(user, password);
    } else if let Some(password) = args.password.clone() {
        config.password = Some(password);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout_secs(secs);
    }
    Ok(config)
}

async fn run_connections(
    store: &ConnectionsStore<Arc<RestClient>, Arc<ConsoleNotifier>>,
    action: ConnectionsAction,
) -> anyhow::Result<()> {
    store.list().await?;
    let mut updates = store.subscribe();

    match action {
        ConnectionsAction::List => {}
        ConnectionsAction::ToStream { stream, pipelines } => {
            store
                .connect_to_stream(StreamConnection { stream, pipelines })
                .await?;
        }
        ConnectionsAction::ToPipeline { pipeline, streams } => {
            store
                .connect_to_pipeline(PipelineConnection { pipeline, streams })
                .await?;
        }
    }

    let current = match updates.try_recv() {
        Ok(snapshot) => Some(snapshot.connections),
        Err(_) => store.connections(),
    };
    print!("{}", connections_overview(current.as_deref()));
    Ok(())
}
