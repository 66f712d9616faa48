//! Application state
//!
//! Everything the gateway needs, built once at startup. The Channel is
//! owned here and handed to the Dispatcher explicitly; nothing reaches it
//! through a global.

use std::sync::Arc;
use std::time::Duration;

use crate::channel::Channel;
use crate::dispatcher::Dispatcher;
use crate::domain::{ControllerConfig, LedResult};
use crate::ports::{AuditSink, SerialFactory};

pub struct AppState {
    channel: Arc<Channel>,
    dispatcher: Dispatcher,
}

impl AppState {
    /// Open the configured port and wire up the Dispatcher. Any channel
    /// error is returned as-is; the caller treats it as fatal. `config` is
    /// expected to have been validated already.
    pub fn start(
        config: &ControllerConfig,
        factory: &dyn SerialFactory,
        audit: Arc<dyn AuditSink>,
    ) -> LedResult<Self> {
        let channel = Arc::new(Channel::open(
            factory,
            &config.serial_port,
            config.baud_rate,
            Duration::from_millis(config.open_timeout_ms),
        )?);
        let dispatcher = Dispatcher::new(Arc::clone(&channel), audit);
        Ok(Self {
            channel,
            dispatcher,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Release the serial port. Idempotent.
    pub fn shutdown(&self) {
        self.channel.close();
    }
}
