pub mod commands;
pub mod render;
pub mod shell;

pub use commands::{CommandError, KioskCommand};
pub use shell::{Flow, Kiosk, NavRequest};

use anyhow::{Context, Result};
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::{mpsc, watch},
    time::{self, Duration, MissedTickBehavior},
};

use crate::schedule::Board;

const ENABLE_LOGS: bool = true;
// Picks up carousel auto-advance, which publishes no events of its own.
const REDRAW_INTERVAL: Duration = Duration::from_secs(1);

use crate::{log_error, log_info, log_warn};

async fn board_changed(updates: &mut Option<watch::Receiver<Board>>) -> bool {
    match updates {
        Some(rx) => rx.changed().await.is_ok(),
        None => std::future::pending().await,
    }
}

/// Drive the kiosk from line commands on stdin, writing each new frame of
/// the active screen to stdout.
pub async fn run_console(mut kiosk: Kiosk, mut nav_rx: mpsc::UnboundedReceiver<NavRequest>) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    let mut updates = kiosk.board_updates();
    let mut last_frame = String::new();
    let mut redraw = time::interval(REDRAW_INTERVAL);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let mut force = false;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read kiosk input")? else {
                    log_info!("input closed, shutting down");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<KioskCommand>() {
                    Ok(command) => {
                        force = command == KioskCommand::Show;
                        match kiosk.handle(command).await {
                            Ok(Flow::Quit) => break,
                            Ok(Flow::Continue) => {}
                            Err(err) => log_error!("{err:#}"),
                        }
                    }
                    Err(err) => log_warn!("{err}"),
                }
            }
            Some(request) = nav_rx.recv() => {
                kiosk.handle_request(request).await;
            }
            _ = board_changed(&mut updates) => {}
            _ = redraw.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log_info!("interrupted, shutting down");
                break;
            }
        }

        // Screens may have been swapped by the branch above.
        updates = kiosk.board_updates();

        let frame = kiosk.render().await;
        if force || frame != last_frame {
            stdout.write_all(format!("{frame}\n\n").as_bytes()).await?;
            stdout.flush().await?;
            last_frame = frame;
        }
    }

    Ok(())
}
