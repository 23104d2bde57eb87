//! Decoder lifetime - get-or-create against an application context
//!
//! A `DecoderCell` is owned by the host's composition root. It keeps only a
//! weak reference to the decoder it handed out: while any caller holds the
//! `Arc`, every `get_or_create` returns that same instance; once all are
//! dropped the next call builds a fresh one from the context.
//!
//! Construction happens under the cell's lock, so at most one decoder is
//! built and published at a time. A failed construction is not remembered.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::classes::ClassLoader;
use crate::decoder::Decoder;
use crate::error::Result;
use crate::options::DecoderOptions;
use crate::resources::ResourceResolver;
use crate::store::{MetadataSource, MetadataStore};

/// Everything a decoder needs from the hosting application
pub trait AppContext: Send + Sync {
    /// Obtain the metadata store; `StoreUnavailable` when it cannot be read
    fn metadata_store(&self) -> Result<MetadataStore>;

    fn resources(&self) -> Arc<dyn ResourceResolver>;

    fn class_loader(&self) -> Arc<dyn ClassLoader>;

    fn options(&self) -> DecoderOptions {
        DecoderOptions::default()
    }
}

impl Decoder {
    /// Build a decoder from an application context
    pub fn from_context(ctx: &dyn AppContext) -> Result<Self> {
        let store = ctx.metadata_store()?;
        Ok(Decoder::new(store, ctx.resources(), ctx.class_loader()).with_options(ctx.options()))
    }
}

/// Application context assembled from parts
pub struct HostContext {
    source: Box<dyn MetadataSource>,
    resources: Arc<dyn ResourceResolver>,
    classes: Arc<dyn ClassLoader>,
    options: DecoderOptions,
}

impl HostContext {
    pub fn new(
        source: impl MetadataSource + 'static,
        resources: Arc<dyn ResourceResolver>,
        classes: Arc<dyn ClassLoader>,
    ) -> Self {
        Self {
            source: Box::new(source),
            resources,
            classes,
            options: DecoderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }
}

impl AppContext for HostContext {
    fn metadata_store(&self) -> Result<MetadataStore> {
        self.source.load()
    }

    fn resources(&self) -> Arc<dyn ResourceResolver> {
        Arc::clone(&self.resources)
    }

    fn class_loader(&self) -> Arc<dyn ClassLoader> {
        Arc::clone(&self.classes)
    }

    fn options(&self) -> DecoderOptions {
        self.options.clone()
    }
}

/// Holder publishing at most one live decoder
#[derive(Default)]
pub struct DecoderCell {
    slot: Mutex<Weak<Decoder>>,
}

impl DecoderCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live decoder, or build and publish one from `ctx`
    pub fn get_or_create(&self, ctx: &dyn AppContext) -> Result<Arc<Decoder>> {
        let mut slot = self.slot.lock();
        if let Some(live) = slot.upgrade() {
            return Ok(live);
        }

        let decoder = Arc::new(Decoder::from_context(ctx)?);
        *slot = Arc::downgrade(&decoder);
        debug!(entries = decoder.metadata().len(), "published new decoder");
        Ok(decoder)
    }

    /// The live decoder, without constructing one
    pub fn get(&self) -> Option<Arc<Decoder>> {
        self.slot.lock().upgrade()
    }

    /// Forget the published decoder; holders keep their `Arc`
    pub fn reset(&self) {
        *self.slot.lock() = Weak::new();
    }
}

impl std::fmt::Debug for DecoderCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderCell")
            .field("live", &self.get().is_some())
            .finish()
    }
}
