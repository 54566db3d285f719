use std::future::Future;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, error, info, info_span, warn};

use crate::dispatcher::Dispatcher;
use crate::terminal::Terminal;

/// Accept connections until `shutdown` resolves.
///
/// Each client gets its own task and its own copy of `dispatcher`; a failing
/// connection never affects the others. Accept failures are logged and
/// skipped.
pub async fn serve<F>(listener: TcpListener, dispatcher: Dispatcher, color: bool, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "quiz console listening");
    }

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("shutting down listener");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(
                        handle_connection(stream, dispatcher, color)
                            .instrument(info_span!("connection", %peer)),
                    );
                }
                Err(err) => error!("failed to accept connection: {err}"),
            },
        }
    }
}

async fn handle_connection(stream: TcpStream, dispatcher: Dispatcher, color: bool) {
    info!("client connected");
    let (read_half, write_half) = stream.into_split();
    let mut term = Terminal::new(BufReader::new(read_half), write_half).with_color(color);

    match dispatcher.serve(&mut term).await {
        Ok(()) => info!("client disconnected"),
        Err(err) if err.is_hangup() => info!("client hung up mid-prompt"),
        Err(err) => warn!("connection closed: {err}"),
    }
}
