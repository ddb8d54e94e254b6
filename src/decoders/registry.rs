// Decoder registry: the dispatch table of supported sensor protocols

use super::descriptor::{DecodeResult, ProtocolDescriptor};
use crate::bitbuffer::BitBuffer;
use std::collections::HashMap;
use std::sync::Mutex;

/// Global decoder registry
lazy_static::lazy_static! {
    static ref DECODER_REGISTRY: Mutex<HashMap<&'static str, &'static ProtocolDescriptor>> =
        Mutex::new(HashMap::new());
}

/// Register a protocol descriptor in the global registry.
/// Re-registering the same name replaces the previous entry.
pub fn register_decoder(descriptor: &'static ProtocolDescriptor) {
    DECODER_REGISTRY
        .lock()
        .unwrap()
        .insert(descriptor.name, descriptor);
}

/// Look up a decoder by its protocol name.
pub fn get_decoder(name: &str) -> Option<&'static ProtocolDescriptor> {
    DECODER_REGISTRY.lock().unwrap().get(name).copied()
}

/// List all registered decoders, sorted by name.
pub fn list_decoders() -> Vec<&'static ProtocolDescriptor> {
    let mut decoders: Vec<_> = DECODER_REGISTRY.lock().unwrap().values().copied().collect();
    decoders.sort_by_key(|d| d.name);
    decoders
}

/// Run every registered decoder against one capture.
///
/// Returns each decoder's name paired with its typed outcome; the caller
/// decides what to do with failures. Decode order follows `list_decoders`.
pub fn run_decoders(buffer: &BitBuffer) -> Vec<(&'static str, DecodeResult)> {
    list_decoders()
        .into_iter()
        .map(|descriptor| {
            let outcome = (descriptor.decode)(buffer);
            if let Err(ref error) = outcome {
                tracing::debug!("{}: {}", descriptor.name, error);
            }
            (descriptor.name, outcome)
        })
        .collect()
}
