//! `sortcam`: the Supervisor (spec.md §4.J).
//!
//! Starts the three stages (Capture, Pipeline, Output), wires them
//! together with two bounded drop-oldest queues, and installs a
//! `ctrlc` handler as the process-level analogue of the Output stage's
//! `ESC`-shutdown key. Either source requests the same cooperative
//! shutdown: the Capture stage stops reading and closes `capQ`, the
//! Pipeline stage drains whatever is left and closes `outQ`, and the
//! Output stage (run on the main thread) exits once `outQ` is drained
//! and closed.

mod cli;
mod wiring;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;

use capture::CaptureStage;
use channellib::frame_channel::frame_channel;
use cli::Cli;
use display::OutputStage;
use edge_config::EdgeConfig;
use pipeline::PipelineStage;

fn main() -> anyhow::Result<()> {
    let _tracing_guard = env_tracing_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "fatal error, exiting");
        return Err(e);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = EdgeConfig::load(&cli.cfg)
        .context("loading configuration")?
        .with_source_override(cli.source);
    tracing::info!(%cfg, "sortcam starting up");

    let camera = wiring::build_camera(&cfg);
    let detector = wiring::build_detector(&cfg);
    let preprocessor = wiring::build_preprocessor(&cfg);
    let tracker = wiring::build_tracker(&cfg);
    let sink = wiring::build_display_sink(&cfg);

    // Queues exist before any stage is started (spec.md §4.J).
    let (cap_tx, cap_rx) = frame_channel::<(f64, core_types::Frame)>(cfg.queue);
    let (out_tx, out_rx) = frame_channel::<pipeline::OutputTuple>(cfg.queue);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            tracing::info!("shutdown signal received (SIGINT/SIGTERM)");
            stop.store(true, Ordering::Relaxed);
        })
        .context("installing signal handler")?;
    }

    // Stages are started C -> H -> I (spec.md §4.J); Output runs last, on
    // the main thread, since some GUI toolkits require main-thread window
    // ownership (spec.md §5).
    let capture_stop = Arc::clone(&stop);
    let capture_handle = thread::Builder::new()
        .name("capture".into())
        .spawn(move || {
            let mut stage = CaptureStage::new(camera);
            stage.run(&cap_tx, &capture_stop)
        })
        .context("spawning capture thread")?;

    let pipeline_handle = thread::Builder::new()
        .name("pipeline".into())
        .spawn(move || {
            let stage = PipelineStage::new(preprocessor, detector, tracker);
            pipeline::run(stage, &cap_rx, &out_tx)
        })
        .context("spawning pipeline thread")?;

    let mut output_stage = OutputStage::new(sink);
    loop {
        match out_rx.pop() {
            Some((t, frame, tracks)) => {
                if output_stage.process(t, &frame, &tracks) {
                    tracing::info!("display requested shutdown (ESC)");
                    stop.store(true, Ordering::Relaxed);
                    break;
                }
            }
            // capQ closed -> pipeline drained -> outQ closed: a clean
            // end-of-stream, not a failure.
            None => break,
        }
    }

    // Make sure Capture notices even if the shutdown originated at the
    // display (ESC) rather than a process signal.
    stop.store(true, Ordering::Relaxed);

    let capture_result = capture_handle.join().map_err(|_| anyhow::anyhow!("capture thread panicked"))?;
    let pipeline_result = pipeline_handle.join().map_err(|_| anyhow::anyhow!("pipeline thread panicked"))?;

    // Both of these `Err`s are `StartupFatal`/`InferenceError` (spec.md
    // §7) by the time they reach here — every transient condition is
    // already handled inside the stage that observed it. Report the
    // first one found; a fatal failure in either stage is a fatal run.
    capture_result.context("capture stage exited with a fatal error")?;
    pipeline_result.context("pipeline stage exited with a fatal error")?;

    tracing::info!("sortcam shut down cleanly");
    Ok(())
}
