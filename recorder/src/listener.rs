use crossbeam_channel::{bounded, RecvTimeoutError};
use interactflow_common::{Clock, Error, Result};
use rdev::listen;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

use crate::capture::CaptureSink;

// How long to wait for the platform hook to fail before assuming it is live.
const STARTUP_GRACE: Duration = Duration::from_millis(200);

/// Something that delivers input notifications into a [`CaptureSink`].
pub trait InputSource<C> {
    fn attach(&mut self, sink: CaptureSink<C>) -> Result<()>;
}

/// Listens to the real pointer and keyboard through `rdev` on a dedicated
/// thread.
#[derive(Debug, Default)]
pub struct RdevSource;

impl RdevSource {
    pub fn new() -> Self {
        RdevSource
    }
}

impl<C: Clock + 'static> InputSource<C> for RdevSource {
    fn attach(&mut self, sink: CaptureSink<C>) -> Result<()> {
        let (error_tx, error_rx) = bounded::<String>(1);

        thread::Builder::new()
            .name("input-listener".to_string())
            .spawn(move || {
                info!("Starting input listener");
                if let Err(err) = listen(move |event| sink.dispatch(&event.event_type)) {
                    error!("Error in input listener: {:?}", err);
                    let _ = error_tx.send(format!("{:?}", err));
                }
            })
            .map_err(|e| Error::Capture {
                message: format!("could not spawn listener thread: {}", e),
            })?;

        match error_rx.recv_timeout(STARTUP_GRACE) {
            Err(RecvTimeoutError::Timeout) => Ok(()),
            Ok(message) => Err(Error::Capture { message }),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Capture {
                message: "input listener exited".to_string(),
            }),
        }
    }
}

/// A source with no platform hook. Input is fed by hand through
/// [`EventCapture::sink`](crate::EventCapture::sink).
#[derive(Debug, Default)]
pub struct ManualSource {
    attached: usize,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_count(&self) -> usize {
        self.attached
    }
}

impl<C> InputSource<C> for ManualSource {
    fn attach(&mut self, _sink: CaptureSink<C>) -> Result<()> {
        self.attached += 1;
        Ok(())
    }
}
