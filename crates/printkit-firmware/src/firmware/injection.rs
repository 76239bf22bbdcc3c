//! Manual-command injection
//!
//! Synthesized commands (resume sequences, jog moves) are handed to the
//! sender through a channel that transmits them ahead of the print job.

use printkit_core::InjectionError;
use tokio::sync::mpsc;

/// Accepts textual commands for priority transmission
pub trait ManualCommandSink: Send + Sync {
    /// Queue one command line
    fn inject_manual_command(&self, command: &str) -> Result<(), InjectionError>;
}

impl ManualCommandSink for mpsc::UnboundedSender<String> {
    fn inject_manual_command(&self, command: &str) -> Result<(), InjectionError> {
        self.send(command.to_string())
            .map_err(|_| InjectionError::ChannelClosed {
                command: command.to_string(),
            })
    }
}

impl ManualCommandSink for mpsc::Sender<String> {
    fn inject_manual_command(&self, command: &str) -> Result<(), InjectionError> {
        self.try_send(command.to_string()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => InjectionError::ChannelFull {
                command: command.to_string(),
            },
            mpsc::error::TrySendError::Closed(_) => InjectionError::ChannelClosed {
                command: command.to_string(),
            },
        })
    }
}
