use std::sync::Arc;

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::watch,
};
use tracing::{trace, warn};

use crate::{FaultKind, LineSink, StreamFault, StreamKind};

/// What a reader saw before its stream ended.
#[derive(Debug, Default)]
pub(crate) struct PumpReport {
    pub(crate) lines: u64,
    pub(crate) faults: Vec<StreamFault>,
}

/// Forward `reader` to `sink` line by line until EOF or until `stop` turns
/// `true`.
///
/// Trailing whitespace (including `\r\n`) is trimmed. A line that is not
/// valid UTF-8 is recorded as a fault and skipped; a read error is recorded
/// and ends the pump. Being stopped before EOF is recorded as
/// [`FaultKind::Aborted`]. Nothing here is fatal to the caller.
pub(crate) async fn pump<R>(
    reader: R,
    stream: StreamKind,
    sink: Arc<dyn LineSink>,
    mut stop: watch::Receiver<bool>,
) -> PumpReport
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(512);
    let mut report = PumpReport::default();
    let mut seen = 0u64;

    loop {
        buf.clear();
        let read = tokio::select! {
            res = reader.read_until(b'\n', &mut buf) => res,
            true = stopped(&mut stop) => {
                warn!(%stream, "stream still open after the external runtime exited, abandoning it");
                report.faults.push(StreamFault::new(
                    stream,
                    FaultKind::Aborted,
                    "stream still open after the process exited",
                ));
                break;
            }
        };
        match read {
            Ok(0) => break,
            Ok(_) => {
                seen += 1;
                match std::str::from_utf8(&buf) {
                    Ok(line) => {
                        sink.emit(stream, line.trim_end());
                        report.lines += 1;
                    }
                    Err(e) => {
                        warn!(%stream, line = seen, "undecodable output from external runtime: {e}");
                        report
                            .faults
                            .push(StreamFault::new(stream, FaultKind::Decode { line: seen }, e));
                    }
                }
            }
            Err(e) => {
                warn!(%stream, "error reading external runtime output: {e}");
                report.faults.push(StreamFault::new(stream, FaultKind::Read, e));
                break;
            }
        }
    }

    trace!(%stream, lines = report.lines, faults = report.faults.len(), "stream drained");
    report
}

/// Resolves to `true` once `stop` is set; `false` if the sender is gone.
async fn stopped(stop: &mut watch::Receiver<bool>) -> bool {
    stop.wait_for(|stopped| *stopped).await.is_ok()
}
