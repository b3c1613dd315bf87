//! Tests for the base block protocol
//!
//! These tests walk through construction, enablement, runtime configuration
//! and introspection on the plain block, which every other block builds on.

#[cfg(test)]
mod core_tests {
    use crate::categories::{BufferBlock, Capability, Printer};
    use crate::core::attributes::{Attributes, Introspection, Keys};
    use crate::core::block::{Block, BlockBase, BlockError, Operation};
    use crate::core::options::{Args, Options};
    use crate::core::value::Value;

    /// Test default construction
    ///
    /// A block starts enabled and exposes exactly one attribute.
    #[test]
    fn test_default_block_is_enabled() {
        let block = BlockBase::new();
        assert!(block.is_enabled());

        let all = block.get(&Keys::All, &[]).unwrap();
        let expected = Attributes::from([("enabled".to_string(), Value::Boolean(true))]);
        assert_eq!(all, Introspection::Map(expected));
    }

    /// Test construction from keyword options
    #[test]
    fn test_construction_consumes_enabled() {
        let block = BlockBase::from_options(Options::new().with("enabled", false)).unwrap();
        assert!(!block.is_enabled());
        assert_eq!(block.get_value("enabled").unwrap(), Value::Boolean(false));
    }

    /// Test rejection of unclaimed arguments
    ///
    /// Positional leftovers are listed by their string form, named leftovers
    /// by key, both joined with ", ".
    #[test]
    fn test_unknown_arguments_fail_construction() {
        let err = BlockBase::from_args(Args::new().arg(1i64).arg("x")).unwrap_err();
        assert_eq!(err, BlockError::Config("Unknown parameter(s) '1, x'".into()));

        let err = BlockBase::from_args(Args::new().opt("gain", 2.0).opt("offset", 1i64))
            .unwrap_err();
        assert_eq!(
            err,
            BlockError::Config("Unknown parameter(s) 'gain, offset'".into())
        );
        assert_eq!(err.to_string(), "Unknown parameter(s) 'gain, offset'");
    }

    /// Positional leftovers are reported before named ones
    #[test]
    fn test_positional_reported_first() {
        let err = BlockBase::from_args(Args::new().arg(2.5).opt("gain", 1i64)).unwrap_err();
        assert_eq!(err, BlockError::Config("Unknown parameter(s) '2.5'".into()));
    }

    /// Every block type rejects an unrecognized keyword
    #[test]
    fn test_every_type_rejects_unknown_keyword() {
        let options = || Options::new().with("bogus", true);
        assert!(BlockBase::from_options(options()).unwrap_err().is_config());
        assert!(Printer::from_options(options()).unwrap_err().is_config());
        assert!(BufferBlock::from_options(options()).unwrap_err().is_config());
    }

    /// Test enablement toggling
    #[test]
    fn test_set_enabled_reflects_latest_call() {
        let mut block = BlockBase::new();
        block.set_enabled(false);
        assert!(!block.is_enabled());
        block.set_enabled(true);
        assert!(block.is_enabled());

        block.set(Options::new().with("enabled", false)).unwrap();
        assert!(!block.is_enabled());
    }

    /// `set` with a non-boolean `enabled` is rejected
    #[test]
    fn test_set_enabled_requires_boolean() {
        let mut block = BlockBase::new();
        let err = block.set(Options::new().with("enabled", "yes")).unwrap_err();
        assert_eq!(
            err,
            BlockError::InvalidValue {
                key: "enabled".into(),
                expected: "boolean",
                found: "string".into(),
            }
        );
        assert!(block.is_enabled());
    }

    /// Test leftover runtime options
    ///
    /// The known keys still take effect before the leftover is reported.
    #[test]
    fn test_set_leftovers_fail_after_applying_known_keys() {
        let mut block = BlockBase::new();
        let err = block
            .set(Options::new().with("enabled", false).with("gain", 3i64))
            .unwrap_err();
        assert_eq!(err, BlockError::Config("Does not know how to set '{\"gain\":3}'".into()));
        assert!(!block.is_enabled());
    }

    /// `reset` is consumed regardless of its truthiness
    #[test]
    fn test_reset_key_is_always_consumed() {
        let mut block = BlockBase::new();
        block.set(Options::new().with("reset", false)).unwrap();
        block.set(Options::new().with("reset", true)).unwrap();
        block.reset();
        block.reset();
        assert!(block.is_enabled());
    }

    /// Test key selection followed by exclusion
    #[test]
    fn test_selected_key_then_excluded() {
        let block = BlockBase::new();
        let result = block.get(&Keys::from(["enabled"]), &["enabled"]).unwrap();
        assert_eq!(result, Introspection::Map(Attributes::new()));
    }

    /// Test scalar lookup of an excluded key
    #[test]
    fn test_scalar_excluded_key_fails() {
        let block = BlockBase::new();
        let err = block.get(&Keys::one("enabled"), &["enabled"]).unwrap_err();
        assert_eq!(err, BlockError::KeyNotFound("enabled".into()));

        assert_eq!(
            block.get(&Keys::one("enabled"), &["other"]).unwrap(),
            Introspection::Value(Value::Boolean(true))
        );
    }

    /// Test lookups of absent keys
    #[test]
    fn test_missing_keys_fail() {
        let block = BlockBase::new();
        assert!(block.get(&Keys::from(["nope"]), &[]).unwrap_err().is_key_not_found());
        assert!(block.get_value("nope").unwrap_err().is_key_not_found());
    }

    /// Test capability markers on the plain block
    #[test]
    fn test_plain_block_cannot_read_or_write() {
        let mut block = BlockBase::new();
        assert_eq!(block.capability(), Capability::Neither);

        let err = block.read().unwrap_err();
        assert_eq!(err, BlockError::Unsupported(Operation::Read));
        assert_eq!(err.to_string(), "This block does not support read");

        let err = block.write(&[Value::Integer(1)]).unwrap_err();
        assert_eq!(err, BlockError::Unsupported(Operation::Write));
        assert_eq!(err.to_string(), "This block does not support write");
    }

    /// Test JSON construction
    #[test]
    fn test_construction_from_json() {
        let block = BlockBase::from_json(r#"{"enabled": false}"#).unwrap();
        assert!(!block.is_enabled());

        assert!(BlockBase::from_json(r#"{"enabled": false, "x": 1}"#).unwrap_err().is_config());
        assert!(BlockBase::from_json("[1, 2]").unwrap_err().is_config());
    }

    /// Introspection results serialize as plain JSON
    #[test]
    fn test_introspection_serializes() {
        let printer = Printer::new();
        let json = serde_json::to_value(printer.get(&Keys::All, &["frmt"]).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"enabled": true, "endln": "\n", "sep": " "})
        );
    }
}

#[cfg(test)]
mod capability_tests {
    use crate::categories::Capability;

    /// Capability flags map onto the four roles
    #[test]
    fn test_capability_from_flags() {
        assert_eq!(Capability::from_flags(false, false), Capability::Neither);
        assert_eq!(Capability::from_flags(true, false), Capability::Source);
        assert_eq!(Capability::from_flags(false, true), Capability::Sink);
        assert_eq!(Capability::from_flags(true, true), Capability::Both);

        assert!(Capability::Both.is_readable() && Capability::Both.is_writable());
        assert!(!Capability::Sink.is_readable());
        assert_eq!(Capability::Both.to_string(), "Source/Sink");
    }
}
