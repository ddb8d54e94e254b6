// Sensor decoder framework
pub mod descriptor;
pub mod registry;

// Decoders
pub mod aldi_sempre;
pub mod wind_tester;

pub use descriptor::{DecodeError, DecodeFn, DecodeResult, Modulation, ProtocolDescriptor};
pub use registry::{get_decoder, list_decoders, register_decoder, run_decoders};

/// Initialize and register all available sensor decoders
///
/// This function must be called once at application startup to populate
/// the dispatch table with all supported protocols.
pub fn init_decoders() {
    // Aldi Sempre Wetterstation 93716 (temperature/humidity, PWM OOK)
    register_decoder(&aldi_sempre::ALDI_SEMPRE);

    // Wind/rotation sensor (Manchester OOK, CRC-8 checked)
    register_decoder(&wind_tester::WIND_TESTER);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_decoders() {
        init_decoders();

        let decoders = list_decoders();
        assert!(decoders.len() >= 2, "Expected at least 2 decoders");

        assert!(
            get_decoder("Aldi Sempre Wetterstation 93716").is_some(),
            "Aldi Sempre decoder not found"
        );
        assert!(get_decoder("Wind test").is_some(), "Wind test decoder not found");

        // Registration is keyed by name, so re-running stays idempotent
        init_decoders();
        let aldi_entries = list_decoders()
            .iter()
            .filter(|d| d.name == "Aldi Sempre Wetterstation 93716")
            .count();
        assert_eq!(aldi_entries, 1);
    }

    #[test]
    fn test_descriptors_list_their_record_fields() {
        for descriptor in [&aldi_sempre::ALDI_SEMPRE, &wind_tester::WIND_TESTER] {
            assert_eq!(descriptor.fields[0], "model");
            assert!(descriptor.fields.len() > 1);
        }
    }
}
