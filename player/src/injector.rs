use interactflow_common::{Error, Result};
use rdev::{simulate, EventType};
use tracing::info;

/// Emits synthetic input. One call is one platform event.
pub trait InputInjector {
    fn send(&self, event: &EventType) -> Result<()>;
}

/// Injects through the operating system via `rdev::simulate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RdevInjector;

impl RdevInjector {
    pub fn new() -> Self {
        RdevInjector
    }
}

impl InputInjector for RdevInjector {
    fn send(&self, event: &EventType) -> Result<()> {
        simulate(event).map_err(|err| Error::injection(format!("{:?} rejected: {:?}", event, err)))
    }
}

/// Logs every event instead of injecting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunInjector;

impl InputInjector for DryRunInjector {
    fn send(&self, event: &EventType) -> Result<()> {
        info!("(dry run) {:?}", event);
        Ok(())
    }
}

impl<T: InputInjector + ?Sized> InputInjector for &T {
    fn send(&self, event: &EventType) -> Result<()> {
        (**self).send(event)
    }
}

impl<T: InputInjector + ?Sized> InputInjector for Box<T> {
    fn send(&self, event: &EventType) -> Result<()> {
        (**self).send(event)
    }
}
