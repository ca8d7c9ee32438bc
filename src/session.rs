//! Confirmed-baseline and editing-session lifecycle
//!
//! The host application owns one confirmed filter set, derived from the URL.
//! Editing happens on a working copy obtained from [`FilterSession::open`];
//! nothing touches the baseline until [`FilterSession::confirm`], and a
//! cancelled session is simply dropped. Browser history navigation is handled
//! by [`FilterSession::refresh`], which re-derives the baseline from the
//! current parameter value.
//!
//! The URL itself is behind the [`QueryPort`] trait so the lifecycle can run
//! (and be tested) without a browser.

use crate::codec;
use crate::model::FilterSet;

/// Name of the query parameter holding the encoded filter set.
pub const FILTERS_PARAM: &str = "filters";

/// Read/write access to the `filters` query parameter of the current
/// location. `None` means the parameter is absent, which is equivalent to an
/// empty encoding.
pub trait QueryPort {
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: Option<String>);
}

/// In-process [`QueryPort`], used by tests and the CLI host.
#[derive(Debug, Default)]
pub struct MemoryPort {
    value: Option<String>,
}

impl MemoryPort {
    pub fn new(value: Option<String>) -> Self {
        MemoryPort { value }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl QueryPort for MemoryPort {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: Option<String>) {
        self.value = value;
    }
}

/// The confirmed filter state and its tie to the URL.
pub struct FilterSession<P: QueryPort> {
    port: P,
    confirmed: FilterSet,
}

impl<P: QueryPort> FilterSession<P> {
    /// Derive the initial confirmed set from the current parameter value. An
    /// absent or empty parameter means no active filters.
    pub fn new(port: P) -> Self {
        let confirmed = derive(&port);
        FilterSession { port, confirmed }
    }

    pub fn confirmed(&self) -> &FilterSet {
        &self.confirmed
    }

    /// Working copy for a new editing session. Edits to the copy never affect
    /// the confirmed baseline.
    pub fn open(&self) -> FilterSet {
        self.confirmed.clone()
    }

    /// Commit an editing session: validate the working copy, persist it into
    /// the URL and make it the new baseline. Returns the confirmed set, which
    /// is the payload a host passes to its own save callback.
    pub fn confirm(&mut self, working: FilterSet) -> &FilterSet {
        let validated = working.validated();
        let encoded = codec::encode(&validated);
        self.port
            .write(if encoded.is_empty() { None } else { Some(encoded) });
        self.confirmed = validated;
        &self.confirmed
    }

    /// Drop all filters: baseline returns to the default set and the
    /// parameter is removed from the URL.
    pub fn clear(&mut self) -> &FilterSet {
        self.port.write(None);
        self.confirmed = FilterSet::default();
        &self.confirmed
    }

    /// Re-derive the baseline from the current parameter value, e.g. after
    /// browser back/forward navigation changed the URL underneath us.
    pub fn refresh(&mut self) -> &FilterSet {
        self.confirmed = derive(&self.port);
        &self.confirmed
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}

fn derive<P: QueryPort>(port: &P) -> FilterSet {
    match port.read() {
        Some(value) if !value.is_empty() => codec::decode(&value),
        _ => FilterSet::default(),
    }
}
