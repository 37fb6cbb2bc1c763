//! Integration tests for the transport session against a fake bridge

mod common;

use common::{fast_options, FakeBridge, Reply};
use live_map_core::protocol::MAX_READ_SIZE;
use live_map_core::transport::{Button, Session, Stick, StickPosition};
use live_map_core::{AddressSpec, BridgeError, MemoryValue, ValueType};
use pretty_assertions::assert_eq;
use std::time::Duration;

const SHORT: Duration = Duration::from_millis(300);

async fn connect(bridge: &FakeBridge) -> Session {
    Session::connect_with("127.0.0.1", bridge.port, fast_options(SHORT))
        .await
        .expect("connect to fake bridge")
}

#[tokio::test]
async fn test_handshake_disables_echo() {
    let bridge = FakeBridge::start(vec![]).await;
    let session = connect(&bridge).await;

    assert!(session.is_connected());
    assert_eq!(bridge.wait_for_lines(1).await, vec!["configure echoCommands 0"]);
}

#[tokio::test]
async fn test_read_absolute_decodes_payload() {
    let bridge = FakeBridge::start(vec![Reply::Raw(b"deadbeef\n".to_vec())]).await;
    let mut session = connect(&bridge).await;

    let bytes = session.read(&AddressSpec::absolute(0x1000), 4).await.unwrap();
    assert_eq!(bytes, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(
        bridge.lines(),
        vec!["configure echoCommands 0", "peek 0x1000 0x4"]
    );
}

#[tokio::test]
async fn test_read_each_addressing_mode() {
    let bridge = FakeBridge::start(vec![
        Reply::Payload(vec![1, 2]),
        Reply::Payload(vec![3, 4]),
        Reply::Payload(vec![5, 6]),
    ])
    .await;
    let mut session = connect(&bridge).await;

    let main = session.read(&AddressSpec::main(0x42D6110), 2).await.unwrap();
    let pointer = AddressSpec::pointer("[[main+0x42D6110]+0x10]").unwrap();
    let chained = session.read(&pointer, 2).await.unwrap();
    let raw = session.read(&AddressSpec::untranslated(0x8000), 2).await.unwrap();

    assert_eq!((main, chained, raw), (vec![1, 2], vec![3, 4], vec![5, 6]));
    assert_eq!(
        bridge.lines()[1..],
        [
            "peekMain 0x42D6110 0x2",
            "pointerPeek 0x2 0x42D6110 0x10",
            "peekAbsolute 0x8000 0x2",
        ]
    );
}

#[tokio::test]
async fn test_writes_keep_send_order() {
    let bridge = FakeBridge::start(vec![Reply::Payload(vec![0xAA])]).await;
    let mut session = connect(&bridge).await;

    session
        .write(&AddressSpec::absolute(0x10), &[0xDE, 0xAD])
        .await
        .unwrap();
    session
        .write(&AddressSpec::main(0x20), &[0x01])
        .await
        .unwrap();
    let pointer = AddressSpec::pointer("[main+0x30]+0x8").unwrap();
    session.write(&pointer, &[0xFF, 0x00]).await.unwrap();
    let byte = session.read(&AddressSpec::absolute(0x10), 1).await.unwrap();

    assert_eq!(byte, vec![0xAA]);
    assert_eq!(
        bridge.lines()[1..],
        [
            "poke 0x10 0xDEAD",
            "pokeMain 0x20 0x01",
            "pointerPoke 0xFF00 0x30 0x8",
            "peek 0x10 0x1",
        ]
    );
}

#[tokio::test]
async fn test_timeout_when_bridge_is_silent() {
    let bridge = FakeBridge::start(vec![Reply::Silent]).await;
    let mut session = connect(&bridge).await;

    let result = session.read(&AddressSpec::main(0x100), 4).await;
    match result {
        Err(BridgeError::TransportTimeout { timeout }) => assert_eq!(timeout, SHORT),
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_truncated_frame_is_malformed() {
    let bridge = FakeBridge::start(vec![Reply::Truncated(b"dead".to_vec())]).await;
    let mut session = connect(&bridge).await;

    let result = session.read(&AddressSpec::absolute(0x1000), 4).await;
    assert!(matches!(result, Err(BridgeError::MalformedResponse { .. })));
}

#[tokio::test]
async fn test_non_hex_frame_is_malformed() {
    let bridge = FakeBridge::start(vec![Reply::Raw(b"deadbeeg\n".to_vec())]).await;
    let mut session = connect(&bridge).await;

    let result = session.read(&AddressSpec::absolute(0x1000), 4).await;
    assert!(matches!(result, Err(BridgeError::MalformedResponse { .. })));
}

#[tokio::test]
async fn test_typed_reads() {
    let bridge = FakeBridge::start(vec![
        Reply::Payload(1.5f32.to_le_bytes().to_vec()),
        Reply::Payload(vec![0x10, 0x61, 0x2D, 0x04]),
    ])
    .await;
    let mut session = connect(&bridge).await;

    let value = session
        .read_value(&AddressSpec::main(0x10), ValueType::F32)
        .await
        .unwrap();
    assert_eq!(value, MemoryValue::F32(1.5));

    let int = session.read_u64(&AddressSpec::main(0x20), 4).await.unwrap();
    assert_eq!(int, 0x042D6110);

    let too_wide = session.read_u64(&AddressSpec::main(0x20), 9).await;
    assert!(matches!(too_wide, Err(BridgeError::InvalidValueType(_))));
}

#[tokio::test]
async fn test_button_commands() {
    let bridge = FakeBridge::start(vec![]).await;
    let mut session = connect(&bridge).await;

    session.click(Button::A).await.unwrap();
    session.press(Button::Zl).await.unwrap();
    session.release(Button::Zl).await.unwrap();

    assert_eq!(
        bridge.wait_for_lines(4).await[1..],
        ["click A", "press ZL", "release ZL"]
    );
}

#[tokio::test]
async fn test_stick_axes_merge_with_last_values() {
    let bridge = FakeBridge::start(vec![]).await;
    let mut session = connect(&bridge).await;

    let first = session.move_left_stick(Some(100), None).await.unwrap();
    let second = session.move_left_stick(None, Some(-200)).await.unwrap();
    let right = session.move_right_stick(None, Some(i16::MAX)).await.unwrap();

    assert_eq!(first, StickPosition { x: 100, y: 0 });
    assert_eq!(second, StickPosition { x: 100, y: -200 });
    assert_eq!(right, StickPosition { x: 0, y: i16::MAX });
    assert_eq!(session.stick_state().get(Stick::Left), second);
    assert_eq!(
        bridge.wait_for_lines(4).await[1..],
        [
            "setStick LEFT 100 0",
            "setStick LEFT 100 -200",
            "setStick RIGHT 0 32767",
        ]
    );
}

#[tokio::test]
async fn test_close_twice_is_noop() {
    let bridge = FakeBridge::start(vec![]).await;
    let mut session = connect(&bridge).await;

    session.close().await;
    assert!(!session.is_connected());
    session.close().await;
    assert!(!session.is_connected());
}

#[tokio::test]
async fn test_operations_after_close_fail_locally() {
    let bridge = FakeBridge::start(vec![]).await;
    let mut session = connect(&bridge).await;
    bridge.wait_for_lines(1).await;
    session.close().await;

    let read = session.read(&AddressSpec::absolute(0x1000), 4).await;
    assert!(matches!(read, Err(BridgeError::NotConnected)));

    let click = session.click(Button::B).await;
    assert!(matches!(click, Err(BridgeError::NotConnected)));

    // Only the handshake ever reached the bridge
    assert_eq!(bridge.lines(), vec!["configure echoCommands 0"]);
}

#[tokio::test]
async fn test_invalid_pointer_never_reaches_bridge() {
    let bridge = FakeBridge::start(vec![]).await;
    let session = connect(&bridge).await;

    let spec = AddressSpec::pointer("[[main+0x42D6110]+0x10");
    assert!(matches!(spec, Err(BridgeError::InvalidAddressSpec(_))));

    assert!(session.is_connected());
    assert_eq!(bridge.wait_for_lines(1).await, vec!["configure echoCommands 0"]);
}

#[tokio::test]
async fn test_oversized_read_rejected_before_sending() {
    let bridge = FakeBridge::start(vec![Reply::Payload(vec![7, 8])]).await;
    let mut session = connect(&bridge).await;

    for size in [MAX_READ_SIZE + 1, usize::MAX] {
        let read = session.read(&AddressSpec::absolute(0x1000), size).await;
        assert!(matches!(read, Err(BridgeError::InvalidValueType(_))));
    }
    assert!(session.is_connected());

    // The stream is still in step for the next request
    let bytes = session.read(&AddressSpec::absolute(0x2000), 2).await.unwrap();
    assert_eq!(bytes, vec![7, 8]);
    assert_eq!(
        bridge.lines(),
        vec!["configure echoCommands 0", "peek 0x2000 0x2"]
    );
}
