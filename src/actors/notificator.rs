use crate::{
    config::{Config, Notifiers},
    configuration::{DEFAULT_FAILURE_ICON, DEFAULT_SLACK_NAME},
    products::{check_result::Report, notification::Notification},
    utilities, *,
};
use actix::prelude::*;
use chrono::Utc;
use std::fmt;


/// Delivery channel of rendered notifications
pub trait NotificationChannel: Send {
    /// Channel name used in logs
    fn name(&self) -> &str;

    /// Deliver notification
    fn deliver(&self, notification: &Notification) -> Result<(), String>;
}


#[derive(Debug, Clone)]
/// Slack webhook channel
pub struct SlackChannel {
    notifier: Notifiers,
    bot_name: String,
    icon: String,
}


impl SlackChannel {
    /// New channel of a configured notifier
    pub fn new(notifier: Notifiers, bot_name: &str, icon: &str) -> SlackChannel {
        SlackChannel {
            notifier,
            bot_name: bot_name.to_string(),
            icon: icon.to_string(),
        }
    }
}


impl NotificationChannel for SlackChannel {
    fn name(&self) -> &str {
        &self.notifier.name
    }


    fn deliver(&self, notification: &Notification) -> Result<(), String> {
        utilities::notify_failure(
            &self.notifier.slack_webhook,
            &self.bot_name,
            &self.icon,
            &notification.subject,
            &notification.body,
        )
    }
}


/// Notificator actor delivering critical results to all channels
pub struct Notificator {
    channels: Vec<Box<dyn NotificationChannel>>,
}


impl fmt::Debug for Notificator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notificator")
            .field(
                "channels",
                &self.channels.iter().map(|channel| channel.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}


/// Critical results to notify about
#[derive(Message, Debug, Clone)]
#[rtype(result = "NotifyOutcome")]
pub struct Notify(pub Report);


/// Outcome of a notification attempt. Never fails the run
#[derive(Debug, Clone, PartialEq, Eq, MessageResponse)]
pub enum NotifyOutcome {
    /// No critical results
    NothingToSend,

    /// No notifiers configured
    Skipped,

    /// Delivered through that many channels
    Delivered(usize),

    /// At least one channel failed
    Failed {
        /// Channels that accepted the notification
        delivered: usize,

        /// Delivery failures
        failures: Vec<String>,
    },
}


impl Notificator {
    /// Notificator delivering through given channels
    pub fn new(channels: Vec<Box<dyn NotificationChannel>>) -> Notificator {
        Notificator { channels }
    }


    /// Notificator with Slack channels of all configured notifiers
    pub fn from_config(config: &Config) -> Notificator {
        let bot_name = config.bot_name.as_deref().unwrap_or(DEFAULT_SLACK_NAME);
        let icon = config.failure_emoji.as_deref().unwrap_or(DEFAULT_FAILURE_ICON);
        Notificator::new(
            config
                .notifiers
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(|notifier| -> Box<dyn NotificationChannel> {
                    Box::new(SlackChannel::new(notifier, bot_name, icon))
                })
                .collect(),
        )
    }


    /// Render and deliver notification about given critical results
    pub fn notify(&self, critical: &Report) -> NotifyOutcome {
        if critical.is_empty() {
            return NotifyOutcome::NothingToSend;
        }
        if self.channels.is_empty() {
            warn!(
                "No notifiers configured! Notification about {} critical certificates skipped.",
                critical.len()
            );
            return NotifyOutcome::Skipped;
        }

        let notification = Notification::render(critical, Utc::now());
        let mut delivered = 0;
        let mut failures = Vec::new();
        for channel in &self.channels {
            info!(
                "Sending notification: '{}' to notifier: {}",
                notification.subject,
                channel.name()
            );
            match channel.deliver(&notification) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    error!("Notifier {} failed: {}", channel.name(), err);
                    failures.push(format!("{}: {}", channel.name(), err));
                }
            }
        }

        if failures.is_empty() {
            NotifyOutcome::Delivered(delivered)
        } else {
            NotifyOutcome::Failed {
                delivered,
                failures,
            }
        }
    }
}


impl Handler<Notify> for Notificator {
    type Result = NotifyOutcome;

    fn handle(&mut self, critical: Notify, _ctx: &mut Self::Context) -> Self::Result {
        self.notify(&critical.0)
    }
}


impl Actor for Notificator {
    type Context = SyncContext<Self>;
}
