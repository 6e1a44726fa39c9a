//! Subcommand implementations
//!
//! The `run_*` functions take their ports as arguments so they can be driven
//! with in-memory stores; `main` builds the HTTP adapters and prints results.

use crate::edits::{FormEdits, LogNavigator};
use crate::server::{routes, AppState};
use anyhow::Context;
use pet_admin_core::{
    build_payload, load_options, AdminConfig, EditController, EditError, FieldErrors, ImagePayload, LoadedRecord,
    Navigation, RecordId, RecordStore, TaxonomyOption, TaxonomySource, UpdatePayload,
};
use pet_admin_guard::{CookieSessionResolver, RouteGuard};
use pet_admin_http::{HttpRecordStore, HttpTaxonomySource};
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;

/// Result of an `edit` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Update accepted
    Updated(Navigation),
    /// Payload built but not sent
    DryRun(UpdatePayload),
}

/// Invalid form at submit time
#[derive(Debug, thiserror::Error)]
#[error("form has {} invalid field(s): {errors}", errors.len())]
pub struct InvalidForm {
    pub errors: FieldErrors,
}

/// Adapters built from configuration
///
/// # Errors
/// Invalid API URLs or client construction failure.
pub fn http_ports(config: &AdminConfig) -> anyhow::Result<(Arc<dyn RecordStore>, Arc<dyn TaxonomySource>)> {
    let store = HttpRecordStore::new(&config.api).context("record store")?;
    let taxonomy = HttpTaxonomySource::new(&config.api).context("taxonomy source")?;
    Ok((Arc::new(store), Arc::new(taxonomy)))
}

/// Mount, apply `edits` and submit (or just build the payload on `dry_run`)
///
/// # Errors
/// Bad edit input, invalid form ([`InvalidForm`]) or a rejected update.
pub async fn run_edit(
    store: Arc<dyn RecordStore>,
    taxonomy: &dyn TaxonomySource,
    id: RecordId,
    edits: FormEdits,
    dry_run: bool,
) -> anyhow::Result<EditOutcome> {
    let events = edits.into_events()?;
    let mut controller = EditController::mount(id, store, taxonomy, Arc::new(LogNavigator)).await;
    if controller.loaded().is_none() {
        tracing::warn!(record_id = %controller.record_id(), "record not loaded; only the given edits will be sent");
    }

    for event in events {
        controller.apply(event)?;
    }

    if dry_run {
        let snapshot = controller.loaded().map(LoadedRecord::snapshot);
        return build_payload(controller.form().values(), snapshot)
            .map(EditOutcome::DryRun)
            .map_err(|errors| InvalidForm { errors }.into());
    }

    match controller.submit().await {
        Ok(navigation) => Ok(EditOutcome::Updated(navigation)),
        Err(EditError::Validation(errors)) => Err(InvalidForm { errors }.into()),
        Err(e) => Err(e.into()),
    }
}

/// Flattened breed options
///
/// # Errors
/// The taxonomy could not be fetched or decoded.
pub async fn run_breeds(taxonomy: &dyn TaxonomySource) -> anyhow::Result<Vec<TaxonomyOption>> {
    Ok(load_options(taxonomy).await?)
}

/// Serve until Ctrl-C
///
/// # Errors
/// Adapter construction or bind failure.
pub async fn run_serve(config: &AdminConfig, bind: SocketAddr) -> anyhow::Result<()> {
    let (store, taxonomy) = http_ports(config)?;
    if config.guard.tokens.is_empty() {
        tracing::warn!("no guard tokens configured; every protected request will be redirected to login");
    }
    let resolver = CookieSessionResolver::new(config.guard.tokens.iter().cloned());
    let guard = Arc::new(RouteGuard::new(&config.guard, Arc::new(resolver)));

    let state = AppState::new(store, taxonomy, guard);
    let (addr, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(bind, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!(%addr, protected = %config.guard.protected_prefix, "pet admin listening");
    server.await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Human-readable payload summary for `--dry-run`
#[must_use]
pub fn describe_payload(payload: &UpdatePayload) -> String {
    let mut out = String::new();
    for (name, value) in payload.text_fields() {
        let _ = writeln!(out, "{name}: {value}");
    }
    let _ = match &payload.image {
        ImagePayload::File(file) => writeln!(out, "image: <file {} ({} bytes)>", file.file_name, file.bytes.len()),
        ImagePayload::Stored(reference) => writeln!(out, "image: {reference}"),
    };
    out
}
