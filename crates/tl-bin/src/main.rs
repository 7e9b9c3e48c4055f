//! treeline entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::KeyTranslator;
use core_events::{EventSourceRegistry, LineSource, event_channel};
use core_text::TextCodec;
use std::time::Duration;
use tracing::{error, info, trace, warn};

mod runtime;
mod startup;

use runtime::{Runtime, TraceObserver};
use startup::Args;

const SOURCE_JOIN_TIMEOUT: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = startup::configure_logging();
    startup::install_panic_hook();
    info!(target: "runtime", "startup");

    // The stdin reader parks on a blocking read, so the runtime is shut down
    // without waiting for it.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(run(args));
    rt.shutdown_background();
    if let Err(e) = &result {
        error!(target: "runtime", error = %e, "exit_with_error");
    }
    result
}

async fn run(args: Args) -> Result<()> {
    let config = startup::load_config(args.config.clone())?;
    let codec = TextCodec::new(config.comment_sentinel());
    let doc = startup::load_document(args.path.as_deref(), codec);
    info!(
        target: "runtime.startup",
        lines = doc.state.store.len(),
        open_failed = doc.open_failed,
        script = args.keys.is_some(),
        "bootstrap_complete"
    );

    let mut runtime = Runtime::new(
        doc.state,
        startup::build_clipboard(&config),
        KeyTranslator::new(config.keymap_specs()),
        config.ternary_region(),
        doc.path,
        std::io::stdout(),
    );
    runtime.add_observer(Box::new(TraceObserver));

    if let Some(keys) = args.keys.as_deref() {
        runtime.run_script(keys).await?;
    } else {
        let (tx, mut rx) = event_channel();
        let mut registry = EventSourceRegistry::new();
        registry.register(LineSource::stdin());
        let handles = registry.spawn_all(&tx);
        drop(tx);

        let reason = runtime.run(&mut rx).await?;
        rx.close();
        for handle in handles {
            match tokio::time::timeout(SOURCE_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => trace!(target: "runtime.shutdown", %reason, "event_source_task_stopped"),
                Ok(Err(err)) => warn!(target: "runtime.shutdown", %reason, ?err, "event_source_task_error"),
                Err(_) => trace!(target: "runtime.shutdown", %reason, "event_source_task_timeout"),
            }
        }
    }

    if args.dump {
        runtime.dump()?;
    }
    info!(target: "runtime", "exit");
    Ok(())
}
