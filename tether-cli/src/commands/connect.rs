//! Connect command - run the authorization flow for one provider.

use anyhow::Result;
use clap::Args;
use tether_connect::{
    ChannelNotifier, ConnectOutcome, DataRetriever, IntegrationConnection, LoadOutcome, Notice,
    WindowCompletionDetector,
};
use tether_core::{IntegrationParams, SessionIdentity};
use tether_store::ParamsSlot;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use super::{build_context, load_config, resolve_provider};
use crate::output::{ConnectionReport, JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the connect command.
#[derive(Args)]
pub struct ConnectArgs {
    /// Provider to connect (notion, airtable, hubspot).
    #[arg(long, short)]
    pub provider: String,

    /// User identifier of the session.
    #[arg(long)]
    pub user: String,

    /// Organization identifier of the session.
    #[arg(long)]
    pub org: String,

    /// Print the authorization URL and wait for Enter instead of opening a
    /// browser window.
    #[arg(long)]
    pub prompt: bool,

    /// Load a snapshot right after connecting.
    #[arg(long)]
    pub load: bool,

    /// Include the received credentials in the output.
    #[arg(long)]
    pub show_credentials: bool,
}

/// Runs the connect command.
pub async fn run(args: &ConnectArgs, cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let desc = resolve_provider(&args.provider)?;
    let identity = SessionIdentity::new(args.user.as_str(), args.org.as_str())?;
    let ctx = build_context(&config, args.prompt)?;

    let params = ParamsSlot::with_params(IntegrationParams::for_provider(desc.id));
    let (notifier, mut notices) = ChannelNotifier::new();
    let conn = IntegrationConnection::new(identity, desc.clone(), params.clone(), ctx.clone())
        .with_notifier(notifier.clone())
        .with_detector(WindowCompletionDetector::new(config.window.poll_interval()));

    if !cli.quiet && cli.format == OutputFormat::Text && !args.prompt {
        eprintln!(
            "Opening {} authorization window; close it when you are done.",
            desc.display_name()
        );
    }

    let outcome = conn
        .connect_until(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, closing authorization window");
            } else {
                std::future::pending::<()>().await;
            }
        })
        .await;
    debug!(?outcome, "Connect finished");
    print_notices(&mut notices, cli);

    let mut report = ConnectionReport::new(desc, &outcome, conn.status());
    if args.show_credentials {
        report = report.with_params(params.get());
    }

    let mut code = match outcome {
        ConnectOutcome::Connected => ExitCode::Success,
        ConnectOutcome::Failed(_) => ExitCode::Error,
        ConnectOutcome::Abandoned | ConnectOutcome::Cancelled | ConnectOutcome::Rejected(_) => {
            ExitCode::NotConnected
        }
    };

    if args.load && code == ExitCode::Success {
        let retriever = DataRetriever::new(ctx.backend.clone()).with_notifier(notifier);
        match retriever.load_from(&params, desc.id).await? {
            LoadOutcome::Loaded(snapshot) => report = report.with_snapshot(snapshot),
            LoadOutcome::Failed(_) => code = ExitCode::Error,
        }
        print_notices(&mut notices, cli);
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_connection(&report)?);
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&report)?);
        }
    }

    Ok(code)
}

/// Prints pending user-visible notices to stderr.
fn print_notices(notices: &mut UnboundedReceiver<Notice>, cli: &Cli) {
    while let Ok(notice) = notices.try_recv() {
        if !cli.quiet {
            eprintln!("{}: {}", notice.provider, notice.message);
        }
    }
}
