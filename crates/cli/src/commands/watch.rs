// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chiptime watch` - Follow punch files until interrupted

use crate::output::{print_results, OutputFormat};
use anyhow::Result;
use chiptime_core::{EventPattern, EventReceiver, RaceEvent, SubscriberId, Subscription};
use chiptime_engine::RaceService;
use std::future::Future;
use std::io;
use std::pin::Pin;

/// Watch one race, printing its results after every change.
///
/// On Ctrl-C the poller stops but the race stays flagged, so a later
/// `chiptime watch` resumes it. `chiptime race live <race> off` clears the
/// flag.
pub async fn watch_race(
    service: &RaceService,
    race: &str,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    service.open_view(race)?;
    let subscriber = SubscriberId(format!("watch:{}", race));
    let mut events = service.bus().subscribe(
        Subscription::new(subscriber.0.clone(), vec![EventPattern::new("race:updated")])
            .for_race(race),
    );

    let outcome = follow(service, race, search, format, &mut events).await;

    service.bus().unsubscribe(&subscriber);
    if let Err(e) = service.stop_live_update(race).await {
        tracing::warn!(race, error = %e, "failed to stop live update");
    }
    service.close_view(race);
    outcome
}

async fn follow(
    service: &RaceService,
    race: &str,
    search: Option<&str>,
    format: OutputFormat,
    events: &mut EventReceiver,
) -> Result<()> {
    service
        .enable_live_update(race, service.bus().clone())
        .await?;
    let mut current = match search {
        Some(text) => service.set_search(race, text).unwrap_or_default(),
        None => service.view_results(race).unwrap_or_default(),
    };
    print_results(&current, format);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    if interrupted(ctrl_c.as_mut()).await {
        return Ok(());
    }
    eprintln!("Watching '{}', press Ctrl-C to stop", race);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => return Ok(()),
            event = events.recv() => match event {
                Some(RaceEvent::Updated { .. }) => {
                    let next = service.view_results(race).unwrap_or_default();
                    if next != current {
                        println!();
                        print_results(&next, format);
                        current = next;
                    }
                }
                Some(_) => {}
                None => return Ok(()),
            },
        }
    }
}

/// Resume every race flagged for live update and keep the caches fresh
/// until Ctrl-C. Flags are left set for the next run.
pub async fn watch_all(service: &RaceService) -> Result<()> {
    let started = service.resume_live_updates(service.bus().clone()).await?;
    if started.is_empty() {
        println!("No races flagged for live update.");
        return Ok(());
    }
    let subscriber = SubscriberId("watch:all".to_string());
    let mut events = service.bus().subscribe(Subscription::new(
        subscriber.0.clone(),
        vec![EventPattern::new("race:updated")],
    ));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stop = interrupted(ctrl_c.as_mut()).await;
    if !stop {
        println!("Watching: {}", started.join(", "));
    }
    while !stop {
        tokio::select! {
            _ = &mut ctrl_c => stop = true,
            event = events.recv() => match event {
                Some(RaceEvent::Updated { race }) => println!("Updated: {}", race),
                Some(_) => {}
                None => stop = true,
            },
        }
    }
    service.bus().unsubscribe(&subscriber);
    service.shutdown().await;
    Ok(())
}

/// Poll the Ctrl-C future once, installing its handler. True when an
/// interrupt already arrived.
async fn interrupted<F>(ctrl_c: Pin<&mut F>) -> bool
where
    F: Future<Output = io::Result<()>>,
{
    tokio::select! {
        biased;
        _ = ctrl_c => true,
        _ = std::future::ready(()) => false,
    }
}
