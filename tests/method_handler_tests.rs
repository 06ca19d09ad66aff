use serde_json::{Value, json};
use std::sync::Arc;
use volume_bridge::config::VolumeConfig;
use volume_bridge::{MethodHandler, MockOperation, MockSoundOutput, OutputDevice};

mod test_utils;
use test_utils::{headphones, speakers};

/// Integration tests for method call dispatch against the mock audio subsystem

#[cfg(test)]
mod method_handler_tests {
    use super::*;

    fn setup() -> (Arc<MockSoundOutput>, MethodHandler<MockSoundOutput>) {
        let mock = Arc::new(MockSoundOutput::with_devices(vec![speakers(), headphones()]));
        let handler = MethodHandler::new(Arc::clone(&mock), VolumeConfig::default());
        (mock, handler)
    }

    fn volume_of(mock: &MockSoundOutput) -> f32 {
        *mock.volume.lock().unwrap()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_get_volume() {
        let (mock, handler) = setup();
        mock.set_mock_volume(0.25);

        let result = handler.handle("getVolume", &Value::Null).unwrap();
        assert_eq!(result, json!(0.25));
    }

    #[test]
    fn test_set_volume_unmutes_first() {
        let (mock, handler) = setup();
        mock.set_mock_muted(true);

        let result = handler.handle("setVolume", &json!({"volume": 0.75})).unwrap();

        assert_eq!(result, Value::Null);
        assert_eq!(mock.get_calls(), vec!["set_mute(false)", "set_volume(0.75)"]);
        assert!(!*mock.muted.lock().unwrap());
    }

    #[test]
    fn test_set_volume_can_leave_mute_alone() {
        let mock = Arc::new(MockSoundOutput::new());
        mock.set_mock_muted(true);
        let settings = VolumeConfig {
            unmute_on_set: false,
            ..VolumeConfig::default()
        };
        let handler = MethodHandler::new(Arc::clone(&mock), settings);

        handler.handle("setVolume", &json!({"volume": 0.5})).unwrap();

        assert_eq!(mock.get_calls(), vec!["set_volume(0.5)"]);
        assert!(*mock.muted.lock().unwrap());
    }

    #[test]
    fn test_raise_volume_uses_default_step() {
        let (mock, handler) = setup();
        mock.set_mock_volume(0.5);

        handler.handle("raiseVolume", &Value::Null).unwrap();
        assert!(approx(volume_of(&mock), 0.65));
    }

    #[test]
    fn test_raise_volume_saturates() {
        let (mock, handler) = setup();
        mock.set_mock_volume(0.9);

        handler.handle("raiseVolume", &json!({"step": 0.2})).unwrap();
        assert_eq!(volume_of(&mock), 1.0);
    }

    #[test]
    fn test_lower_volume_saturates() {
        let (mock, handler) = setup();
        mock.set_mock_volume(0.1);

        handler
            .handle("lowerVolume", &json!({"step": 0.15, "showSystemUI": true}))
            .unwrap();
        assert_eq!(volume_of(&mock), 0.0);
    }

    #[test]
    fn test_configured_default_step() {
        let mock = Arc::new(MockSoundOutput::new());
        mock.set_mock_volume(0.5);
        let settings = VolumeConfig {
            default_step: 0.05,
            ..VolumeConfig::default()
        };
        let handler = MethodHandler::new(Arc::clone(&mock), settings);

        handler.handle("lowerVolume", &json!({})).unwrap();
        assert!(approx(volume_of(&mock), 0.45));
    }

    #[test]
    fn test_mute_round_trip() {
        let (mock, handler) = setup();

        handler.handle("setMute", &json!({"isMuted": true})).unwrap();
        assert_eq!(handler.handle("getMute", &Value::Null).unwrap(), json!(true));

        handler.handle("toggleMute", &Value::Null).unwrap();
        assert_eq!(handler.handle("getMute", &Value::Null).unwrap(), json!(false));
        assert!(!*mock.muted.lock().unwrap());
    }

    #[test]
    fn test_get_default_output_device_is_serialized() {
        let (_mock, handler) = setup();

        let result = handler.handle("getDefaultOutputDevice", &Value::Null).unwrap();

        let json = result.as_str().unwrap();
        assert_eq!(json, r#"{"id":"dev1","name":"Speakers"}"#);
        assert_eq!(OutputDevice::from_json_str(json).unwrap(), speakers());
    }

    #[test]
    fn test_set_default_output_device() {
        let (mock, handler) = setup();

        handler
            .handle("setDefaultOutputDevice", &json!({"deviceId": "dev2"}))
            .unwrap();

        assert_eq!(mock.default_output.lock().unwrap().clone(), Some(headphones()));
    }

    #[test]
    fn test_get_output_device_list() {
        let (_mock, handler) = setup();

        let result = handler.handle("getOutputDeviceList", &Value::Null).unwrap();

        let devices: Vec<OutputDevice> = serde_json::from_str(result.as_str().unwrap()).unwrap();
        assert_eq!(devices, vec![speakers(), headphones()]);
    }

    #[test]
    fn test_invalid_arguments_do_not_reach_subsystem() {
        let (mock, handler) = setup();

        for (method, args) in [
            ("setVolume", json!({})),
            ("setVolume", json!({"volume": 2.0})),
            ("setMute", json!({"isMuted": "yes"})),
            ("raiseVolume", json!({"step": -1})),
            ("setDefaultOutputDevice", json!({})),
            ("toggleMute", json!("not a map")),
        ] {
            let error = handler.handle(method, &args).unwrap_err();
            assert_eq!(error.code, "1100", "{} with {}", method, args);
            assert!(error.details.is_some());
        }

        assert!(mock.get_calls().is_empty());
    }

    #[test]
    fn test_unknown_method_is_not_implemented() {
        let (mock, handler) = setup();

        let error = handler.handle("setBalance", &Value::Null).unwrap_err();

        assert_eq!(error.code, "notImplemented");
        assert_eq!(error.details.as_deref(), Some("setBalance"));
        assert!(mock.get_calls().is_empty());
    }

    #[test]
    fn test_subsystem_failures_map_to_method_codes() {
        let (mock, handler) = setup();
        mock.set_failure(MockOperation::GetVolume, true);
        mock.set_failure(MockOperation::SetMute, true);
        mock.set_failure(MockOperation::RetrieveOutputDevices, true);

        let cases = [
            ("getVolume", json!(null), "1000", "Failed to get volume"),
            ("setVolume", json!({"volume": 0.3}), "1001", "Failed to set volume"),
            ("raiseVolume", json!(null), "1002", "Failed to raise volume"),
            ("lowerVolume", json!(null), "1003", "Failed to lower volume"),
            ("setMute", json!({"isMuted": true}), "1006", "Failed to set mute"),
            ("toggleMute", json!(null), "1007", "Failed to toggle mute"),
            (
                "getOutputDeviceList",
                json!(null),
                "1014",
                "Failed to get output device list",
            ),
        ];

        for (method, args, code, message) in cases {
            let error = handler.handle(method, &args).unwrap_err();
            assert_eq!(error.code, code, "{}", method);
            assert_eq!(error.message, message, "{}", method);
        }
    }

    #[test]
    fn test_missing_default_device_error() {
        let mock = Arc::new(MockSoundOutput::new());
        let handler = MethodHandler::new(Arc::clone(&mock), VolumeConfig::default());

        let error = handler
            .handle("getDefaultOutputDevice", &Value::Null)
            .unwrap_err();

        assert_eq!(error.code, "1012");
        assert_eq!(error.details.as_deref(), Some("No default output device"));
    }

    #[test]
    fn test_unknown_device_id_error() {
        let (_mock, handler) = setup();

        let error = handler
            .handle("setDefaultOutputDevice", &json!({"deviceId": "dev9"}))
            .unwrap_err();

        assert_eq!(error.code, "1013");
        assert!(error.details.unwrap().contains("dev9"));
    }
}
