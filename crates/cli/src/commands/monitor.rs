// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `monitor`: print events until interrupted

use anyhow::Result;
use clap::Args;
use tracing::debug;
use wmctl_client::{ClientConfig, EventSubscriber};
use wmctl_wire::EventType;

use crate::exit_error::ExitError;
use crate::output::{event_json, format_event, OutputFormat};

/// Slots between the read loop and the printer.
const EVENT_BUFFER: usize = 64;

#[derive(Args)]
pub struct MonitorArgs {
    /// Event category to subscribe to (repeatable); all categories if omitted
    #[arg(long = "event", short = 'e', value_name = "CATEGORY")]
    pub events: Vec<EventType>,

    /// Exit after printing this many events
    #[arg(long, short = 'n', value_name = "N")]
    pub count: Option<usize>,
}

impl MonitorArgs {
    pub fn categories(&self) -> Vec<EventType> {
        if self.events.is_empty() {
            EventType::ALL.to_vec()
        } else {
            let mut categories = self.events.clone();
            categories.dedup();
            categories
        }
    }
}

pub async fn handle(args: MonitorArgs, config: &ClientConfig, format: OutputFormat) -> Result<()> {
    let mut subscriber = EventSubscriber::connect(config).await.map_err(ExitError::from)?;
    subscriber.subscribe(&args.categories()).await.map_err(ExitError::from)?;
    let mut stream = subscriber.spawn(EVENT_BUFFER);

    let mut printed = 0usize;
    loop {
        let next = tokio::select! {
            _ = tokio::signal::ctrl_c() => None,
            event = stream.recv() => Some(event),
        };
        let Some(event) = next else {
            debug!("interrupted");
            stream.cancel();
            break;
        };
        // None: the manager hung up or the loop failed; join reports which
        let Some(event) = event else { break };

        match format {
            OutputFormat::Text => println!("{}", format_event(&event)),
            OutputFormat::Json => println!("{}", serde_json::to_string(&event_json(&event)?)?),
        }

        printed += 1;
        if args.count.is_some_and(|count| printed >= count) {
            stream.cancel();
            break;
        }
    }

    stream.join().await.map_err(ExitError::from)?;
    Ok(())
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
