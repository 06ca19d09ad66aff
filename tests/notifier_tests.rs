use std::sync::Arc;
use std::thread;
use volume_bridge::{BridgeError, MockOperation, MockSoundOutput, OutputDeviceNotifier};

mod test_utils;
use test_utils::{OutputDeviceBuilder, RecordingSink, headphones, speakers};

/// Integration tests for the default output device notifier against the mock
/// audio subsystem

#[cfg(test)]
mod notifier_tests {
    use super::*;

    fn serialized(device: &volume_bridge::OutputDevice) -> String {
        device.to_json_string().unwrap()
    }

    #[test]
    fn test_each_change_reaches_sink_in_serialized_form() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers(), headphones()]));
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));
        let recorder = RecordingSink::new();

        notifier.start(false, recorder.sink()).unwrap();

        let dac = OutputDeviceBuilder::new()
            .id("usb-3")
            .name("USB DAC")
            .sample_rate(96000)
            .channels(2)
            .build();
        mock.simulate_default_output_change(headphones());
        mock.simulate_default_output_change(dac.clone());

        assert_eq!(
            recorder.events(),
            vec![serialized(&headphones()), serialized(&dac)]
        );
        assert_eq!(
            recorder.events()[1],
            r#"{"id":"usb-3","name":"USB DAC","channels":2,"sampleRate":96000}"#
        );
    }

    #[test]
    fn test_emit_on_start_comes_before_changes() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers(), headphones()]));
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));
        let recorder = RecordingSink::new();

        notifier.start(true, recorder.sink()).unwrap();
        assert_eq!(recorder.events(), vec![serialized(&speakers())]);

        mock.simulate_default_output_change(headphones());
        assert_eq!(
            recorder.events(),
            vec![serialized(&speakers()), serialized(&headphones())]
        );
    }

    #[test]
    fn test_stop_while_idle_is_a_no_op() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers()]));
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));

        notifier.stop();

        assert!(!notifier.is_listening());
        assert!(!mock.has_listener());
        assert!(mock.get_calls().is_empty());
    }

    #[test]
    fn test_no_events_after_stop() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers(), headphones()]));
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));
        let recorder = RecordingSink::new();

        notifier.start(false, recorder.sink()).unwrap();
        mock.simulate_default_output_change(headphones());
        notifier.stop();
        mock.simulate_default_output_change(speakers());

        assert_eq!(recorder.events(), vec![serialized(&headphones())]);
        assert!(!mock.has_listener());
    }

    #[test]
    fn test_registration_error_keeps_notifier_idle() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers()]));
        mock.set_failure(MockOperation::AddListener, true);
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));
        let recorder = RecordingSink::new();

        let result = notifier.start(false, recorder.sink());

        assert!(matches!(result, Err(BridgeError::ListenerRegistration(_))));
        assert!(!notifier.is_listening());
        assert!(!mock.has_listener());

        // A manual retry succeeds once the subsystem recovers.
        mock.set_failure(MockOperation::AddListener, false);
        notifier.start(false, recorder.sink()).unwrap();
        assert!(notifier.is_listening());
    }

    #[test]
    fn test_speakers_to_headphones_scenario() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers(), headphones()]));
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));
        let recorder = RecordingSink::new();

        notifier.start(true, recorder.sink()).unwrap();
        assert_eq!(
            recorder.events(),
            vec![r#"{"id":"dev1","name":"Speakers"}"#.to_string()]
        );

        mock.simulate_default_output_change(headphones());
        assert_eq!(
            recorder.events(),
            vec![
                r#"{"id":"dev1","name":"Speakers"}"#.to_string(),
                r#"{"id":"dev2","name":"Headphones"}"#.to_string(),
            ]
        );

        notifier.stop();
        mock.simulate_default_output_change(speakers());
        assert_eq!(recorder.events().len(), 2);
    }

    #[test]
    fn test_changes_from_another_thread_are_delivered_in_order() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers()]));
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));
        let recorder = RecordingSink::new();

        notifier.start(true, recorder.sink()).unwrap();

        let producer = Arc::clone(&mock);
        thread::spawn(move || {
            for i in 0..20 {
                let device = OutputDeviceBuilder::new()
                    .id(&format!("dev-{i}"))
                    .name("Hot-plugged")
                    .build();
                producer.simulate_default_output_change(device);
            }
        })
        .join()
        .unwrap();

        let events = recorder.events();
        assert_eq!(events.len(), 21);
        assert_eq!(events[0], serialized(&speakers()));
        assert!(events[20].contains(r#""id":"dev-19""#));
    }

    #[test]
    fn test_start_after_stop_registers_again() {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers(), headphones()]));
        let mut notifier = OutputDeviceNotifier::new(Arc::clone(&mock));
        let first = RecordingSink::new();
        let second = RecordingSink::new();

        notifier.start(false, first.sink()).unwrap();
        notifier.stop();
        notifier.start(true, second.sink()).unwrap();
        mock.simulate_default_output_change(headphones());

        assert!(first.events().is_empty());
        assert_eq!(
            second.events(),
            vec![serialized(&speakers()), serialized(&headphones())]
        );
    }
}
