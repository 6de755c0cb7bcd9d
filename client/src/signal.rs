use crate::client::CancelTx;
use log::{debug, error};

#[cfg(windows)]
pub async fn wait_shutdown() {
    match tokio::signal::ctrl_c().await {
        Ok(_) => {
            debug!("recv ctrl_c, shutdown")
        }
        Err(e) => {
            debug!("error, ctrl_c, {:?}", e);
        }
    }
}

#[cfg(unix)]
pub async fn wait_shutdown() {
    use tokio::signal::unix::SignalKind;
    async fn terminate() -> std::io::Result<()> {
        let mut signal = match tokio::signal::unix::signal(SignalKind::terminate()) {
            Ok(v) => v,
            Err(e) => {
                debug!("error, signal, {:?}", e);
                return Err(e);
            }
        };

        let _ = signal.recv().await;
        Ok(())
    }

    tokio::select! {
        s = terminate() => {
            debug!("recv unix terminate signal, {:?}",s);
        },
        s = tokio::signal::ctrl_c() => {
            debug!("recv unix ctrl_c signal, {:?}",s);
        }
    }
}

/// Fires `cancel_tx` on the first shutdown signal.
pub async fn cancel_on_shutdown(cancel_tx: CancelTx) {
    wait_shutdown().await;
    if let Err(e) = cancel_tx.send(true) {
        error!("error, cancel, {:?}", e);
    }
}
