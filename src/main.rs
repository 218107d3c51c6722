// SPDX-License-Identifier: MPL-2.0
//! Headless gallery walk-through.
//!
//! Builds a store over an in-memory catalog, fetches the first pages
//! concurrently, opens the viewer and walks forward through load-more.

use gallery_lens::config;
use gallery_lens::diagnostics::DiagnosticsCollector;
use gallery_lens::domain::gallery::PageSize;
use gallery_lens::error::{Error, Result};
use gallery_lens::gallery::{BatchLoader, GalleryStore, NextStep, RenderedBatch};
use gallery_lens::infrastructure::InMemoryCatalog;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

const DEFAULT_CATALOG_LEN: usize = 200;
const DEFAULT_STEPS: usize = 10;

struct Flags {
    pages: Option<usize>,
    page_size: Option<usize>,
    catalog: usize,
    open: usize,
    steps: usize,
    fail_load_more: bool,
    config_dir: Option<PathBuf>,
    report: bool,
}

fn parse_flags() -> Result<Flags> {
    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        pages: args.opt_value_from_str("--pages").map_err(arg_error)?,
        page_size: args.opt_value_from_str("--page-size").map_err(arg_error)?,
        catalog: args
            .opt_value_from_str("--catalog")
            .map_err(arg_error)?
            .unwrap_or(DEFAULT_CATALOG_LEN),
        open: args
            .opt_value_from_str("--open")
            .map_err(arg_error)?
            .unwrap_or(0),
        steps: args
            .opt_value_from_str("--steps")
            .map_err(arg_error)?
            .unwrap_or(DEFAULT_STEPS),
        fail_load_more: args.contains("--fail-load-more"),
        config_dir: args.opt_value_from_str("--config-dir").map_err(arg_error)?,
        report: args.contains("--report"),
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(Error::Config(format!("unexpected arguments: {rest:?}")));
    }
    Ok(flags)
}

fn arg_error(err: pico_args::Error) -> Error {
    Error::Config(err.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let flags = parse_flags()?;

    let (settings, warning) = config::load_with_override(flags.config_dir.clone());
    if let Some(warning) = warning {
        eprintln!("warning: {warning}, using defaults");
    }

    let page_size = flags
        .page_size
        .map_or_else(|| settings.gallery.page_size(), PageSize::new);
    let pages = flags
        .pages
        .unwrap_or_else(|| settings.gallery.initial_pages())
        .max(1);

    let mut collector = settings
        .diagnostics
        .enabled
        .then(|| DiagnosticsCollector::new(settings.diagnostics.buffer_capacity()));
    let diagnostics = collector.as_ref().map(DiagnosticsCollector::handle);

    // Later pages answer first so registration happens out of order.
    let mut catalog = InMemoryCatalog::new(flags.catalog).with_source("demo");
    for page in 0..pages {
        let delay = Duration::from_millis(5 * (pages - page) as u64);
        catalog = catalog.with_latency_at(page_size.offset_of(page), delay);
    }
    if flags.fail_load_more {
        catalog = catalog.failing_from(page_size.offset_of(pages));
    }

    let store = GalleryStore::with_diagnostics(diagnostics.clone());
    let commands = store.commands();
    let loader = BatchLoader::new(Arc::new(catalog), page_size, commands.clone(), diagnostics);

    let mut batches: Vec<RenderedBatch> = Vec::new();
    for handle in loader.spawn_pages(pages) {
        match handle.await {
            Ok(Ok(batch)) => batches.push(batch),
            Ok(Err(err)) => eprintln!("page failed: {err}"),
            Err(err) => eprintln!("page task failed: {err}"),
        }
    }
    for batch in &mut batches {
        batch.settle().await;
    }

    let loaded = store.snapshot();
    println!(
        "registered {} items from {pages} page(s) of {}",
        loaded.total_count,
        page_size.value()
    );

    commands.set_on_load_more(Some(Arc::new(loader.load_more_supplier())));

    let session = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&session);
    commands.set_on_modal_close(Some(Arc::new(move |has_loaded_more: bool| {
        *sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(has_loaded_more);
    })));

    let clicked = batches
        .iter()
        .find(|batch| (batch.offset()..batch.offset() + batch.len()).contains(&flags.open))
        .is_some_and(|batch| batch.click(flags.open - batch.offset()));
    if !clicked {
        commands.open_at_index(flags.open);
    }

    let mut rx = store.subscribe();
    for _ in 0..flags.steps {
        let step = commands.go_next();
        while rx.borrow_and_update().is_loading_more {
            if rx.changed().await.is_err() {
                break;
            }
        }
        let snapshot = store.snapshot();
        let title = snapshot.current_item().map_or("(loading)", |item| item.title.as_str());
        println!(
            "{step:?} -> index {:?} of {}: {title}",
            snapshot.selection.index(),
            snapshot.total_count
        );
        if step == NextStep::AtEnd && !snapshot.navigation().has_next {
            println!("reached the end of the catalog");
            break;
        }
    }

    let final_snapshot = store.snapshot();
    commands.close();
    let has_loaded_more = session
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .unwrap_or(false);
    println!(
        "closed at index {:?}; {} items known; loaded more this session: {has_loaded_more}",
        final_snapshot.selection.index(),
        store.snapshot().total_count
    );

    if flags.report {
        if let Some(collector) = collector.as_mut() {
            collector.process_pending();
            let json = collector
                .export_json()
                .map_err(|err| Error::Io(err.to_string()))?;
            println!("{json}");
        }
    }

    Ok(())
}
