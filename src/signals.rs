//! Process-wide termination handler.
//!
//! Interrupt (Ctrl-C) and terminal stop (Ctrl-Z) end the program with
//! status 0 at any point. Nothing is drained: in-flight requests and git
//! processes are abandoned.

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::info;

/// Spawn the handler task. It lives for the rest of the process.
pub fn install() -> JoinHandle<()> {
    tokio::spawn(async {
        let name = wait_for_termination().await;
        info!("{} received", name);
        println!("\n {}, Exiting...", name);
        std::process::exit(0);
    })
}

/// Resolves with the signal's name once one arrives.
pub async fn wait_for_termination() -> &'static str {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "interrupt",
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(unix)]
    let stop = async {
        match signal::unix::signal(terminal_stop()) {
            Ok(mut stream) => {
                stream.recv().await;
                "stopped"
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let stop = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = stop => name,
    }
}

/// Ctrl-Z, which tokio has no named constructor for.
#[cfg(unix)]
pub fn terminal_stop() -> signal::unix::SignalKind {
    signal::unix::SignalKind::from_raw(libc::SIGTSTP)
}
