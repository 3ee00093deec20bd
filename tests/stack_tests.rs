use std::sync::atomic::{AtomicUsize, Ordering};

use netstk::{
    command::{Command, Value},
    config::RfConfig,
    event::{Event, EventQueue},
    radio::RfDriver,
    Driver, Error, Layer, Link, Netstack, Outcome,
};

use mock::{MockRadio, Mode, RecordingDriver};

fn noop_tx(_arg: usize, _outcome: Outcome) {}

fn noop_rx(_frame: &[u8], _outcome: Outcome) {}

// Test helper to create a stack with null layers above a mock radio
fn create_radio_stack() -> Netstack<
    netstk::NullDriver,
    netstk::NullDriver,
    netstk::NullDriver,
    netstk::NullDriver,
    RfDriver<MockRadio>,
> {
    Netstack::builder()
        .rf(RfDriver::new(MockRadio::new(), RfConfig::default()))
        .build()
}

#[test]
fn test_frame_crosses_null_layers_to_radio() {
    let mut stack = create_radio_stack();
    stack.init().unwrap();
    stack.on_all().unwrap();

    stack
        .ioctl(Layer::Llc, Command::SET_TX_CALLBACK, &mut Value::TxCallback(Some(noop_tx)))
        .unwrap();
    stack
        .ioctl(Layer::Llc, Command::SET_TX_CALLBACK_ARG, &mut Value::CallbackArg(7))
        .unwrap();

    let frame = [0x41, 0x88, 0x01, 0xCD, 0xAB, 0xFF, 0xFF, 0x01, 0x00, 0x42];
    stack.send(&frame).unwrap();
    assert_eq!(stack.rf().radio().started, vec![frame.to_vec()]);

    // Completion shows up once the radio reports the frame sent
    assert!(stack.events().is_empty());
    stack.process().unwrap();
    match stack.events_mut().pop() {
        Some(Event::TxDone { arg, outcome, .. }) => {
            assert_eq!(arg, 7);
            assert_eq!(outcome, Ok(()));
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(stack.events().is_empty());
}

#[test]
fn test_null_layers_are_transparent() {
    let mut stack = Netstack::builder().rf(RecordingDriver::new(64)).build();
    stack.init().unwrap();

    let frame: Vec<u8> = (0..10).collect();
    stack.send(&frame).unwrap();
    stack.send(&frame[..3]).unwrap();

    assert_eq!(stack.rf().sent, vec![frame.clone(), frame[..3].to_vec()]);
    assert_eq!(stack.rf().init_calls, 1);
    assert_eq!(stack.name(Layer::Mac), "mac-null");
    assert_eq!(stack.name(Layer::Rf), "recording");
}

#[test]
fn test_oversized_frame_is_not_forwarded() {
    let mut stack = Netstack::builder().rf(RecordingDriver::new(32)).build();
    stack.init().unwrap();

    // Rejected by the bottom layer
    assert_eq!(stack.send(&[0u8; 33]), Err(Error::BufOverflow));
    // Rejected before leaving the top layer
    assert_eq!(stack.send(&[0u8; 300]), Err(Error::BufOverflow));
    assert_eq!(stack.send(&[]), Err(Error::InvalidArgument));
    assert!(stack.rf().sent.is_empty());

    assert_eq!(stack.send(&[0u8; 32]), Ok(()));
    assert_eq!(stack.rf().sent.len(), 1);
}

#[test]
fn test_radio_limit_applies_below_null_layers() {
    let mut stack = create_radio_stack();
    stack.init().unwrap();
    stack.on_all().unwrap();

    assert_eq!(stack.send(&[0u8; 128]), Err(Error::BufOverflow));
    assert!(stack.rf().radio().started.is_empty());
}

#[test]
fn test_on_off_are_idempotent() {
    let mut stack = create_radio_stack();
    stack.init().unwrap();

    assert_eq!(stack.on(Layer::Rf), Ok(()));
    assert_eq!(stack.on(Layer::Rf), Ok(()));
    assert!(stack.rf().is_on());
    assert_eq!(stack.rf().radio().mode, Mode::Listen);

    assert_eq!(stack.off(Layer::Rf), Ok(()));
    assert_eq!(stack.off(Layer::Rf), Ok(()));
    assert!(!stack.rf().is_on());
    assert_eq!(stack.rf().radio().mode, Mode::Sleep);

    assert_eq!(stack.on_all(), Ok(()));
    assert_eq!(stack.off_all(), Ok(()));
    assert_eq!(stack.off_all(), Ok(()));
}

#[test]
fn test_commands_outside_driver_band_are_unsupported() {
    let mut stack = create_radio_stack();
    stack.init().unwrap();
    stack.on_all().unwrap();

    // A null MAC does not forward RF queries
    let mut value = Value::I16(0);
    assert_eq!(
        stack.ioctl(Layer::Mac, Command::RF_GET_RSSI, &mut value),
        Err(Error::CmdUnsupported)
    );
    assert!(matches!(value, Value::I16(0)));

    let mut value = Value::U8(3);
    assert_eq!(
        stack.ioctl(Layer::Rf, Command::MAC_SET_DSN, &mut value),
        Err(Error::CmdUnsupported)
    );
    assert!(matches!(value, Value::U8(3)));

    let vendor = Command::extension(Layer::Rf, 99).unwrap();
    let mut value = Value::None;
    assert_eq!(stack.ioctl(Layer::Rf, vendor, &mut value), Err(Error::CmdUnsupported));
    assert_eq!(
        stack.ioctl(Layer::Rf, Command::NONE, &mut value),
        Err(Error::CmdUnsupported)
    );

    // Supported commands still work afterwards
    let mut value = Value::I16(0);
    stack.ioctl(Layer::Rf, Command::RF_GET_RSSI, &mut value).unwrap();
    assert!(matches!(value, Value::I16(-50)));
}

#[test]
fn test_failed_init_switches_lower_layers_off() {
    let mut stack = Netstack::builder()
        .mac(RecordingDriver::failing())
        .rf(RecordingDriver::new(64))
        .build();

    assert_eq!(stack.init(), Err(Error::Init));

    // RF came up first and was switched off again
    assert_eq!(stack.rf().init_calls, 1);
    assert_eq!(stack.rf().off_calls, 1);
    assert_eq!(stack.mac().init_calls, 1);
    assert_eq!(stack.mac().off_calls, 0);
}

#[test]
fn test_radio_init_failure_is_reported() {
    let mut radio = MockRadio::new();
    radio.fail_init = true;
    let mut stack = Netstack::builder()
        .rf(RfDriver::new(radio, RfConfig::default()))
        .build();

    assert_eq!(stack.init(), Err(Error::Init));
    assert!(!stack.rf().is_ready());
    assert_eq!(stack.on(Layer::Rf), Err(Error::Init));
    assert_eq!(stack.send(&[1, 2, 3]), Err(Error::Init));
}

#[test]
fn test_received_frame_reaches_rx_callback() {
    let mut stack = create_radio_stack();
    stack.init().unwrap();
    stack.on_all().unwrap();
    stack
        .ioctl(Layer::Llc, Command::SET_RX_CALLBACK, &mut Value::RxCallback(Some(noop_rx)))
        .unwrap();

    stack.deliver(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
    match stack.events_mut().pop() {
        Some(Event::Rx { frame, outcome, .. }) => {
            assert_eq!(frame.as_slice(), &[0xDE, 0xAD, 0xBE, 0xEF]);
            assert_eq!(outcome, Ok(()));
        }
        other => panic!("unexpected event {:?}", other),
    }

    // Same path when the radio picks the frame up itself
    stack.rf_mut().radio_mut().push_rx(&[0x01, 0x02]);
    stack.process().unwrap();
    match stack.events_mut().pop() {
        Some(Event::Rx { frame, .. }) => assert_eq!(frame.as_slice(), &[0x01, 0x02]),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_received_frame_without_callback_is_dropped() {
    let mut stack = Netstack::builder().rf(RecordingDriver::new(64)).build();
    stack.init().unwrap();

    assert_eq!(stack.deliver(&[1, 2, 3]), Ok(()));
    assert_eq!(stack.rf().received, vec![vec![1, 2, 3]]);
    assert!(stack.events().is_empty());
}

static DELIVERED: AtomicUsize = AtomicUsize::new(0);

fn count_tx(arg: usize, outcome: Outcome) {
    assert_eq!(outcome, Ok(()));
    DELIVERED.fetch_add(arg, Ordering::SeqCst);
}

#[test]
fn test_dispatch_runs_callbacks() {
    let mut stack: Netstack = Netstack::builder().build();
    stack.init().unwrap();
    stack
        .ioctl(Layer::Llc, Command::SET_TX_CALLBACK, &mut Value::TxCallback(Some(count_tx)))
        .unwrap();
    stack
        .ioctl(Layer::Llc, Command::SET_TX_CALLBACK_ARG, &mut Value::CallbackArg(5))
        .unwrap();

    stack.send(&[0x55; 8]).unwrap();
    stack.send(&[0x55; 8]).unwrap();

    assert_eq!(stack.events().len(), 2);
    assert_eq!(stack.dispatch(), 2);
    assert_eq!(DELIVERED.load(Ordering::SeqCst), 10);
    assert!(stack.events().is_empty());
}

#[test]
fn test_refused_callback_registration_is_not_kept() {
    let mut stack = Netstack::builder().mac(RecordingDriver::refusing()).build();
    stack.init().unwrap();

    let mut value = Value::TxCallback(Some(noop_tx));
    assert_eq!(
        stack.ioctl(Layer::Llc, Command::SET_TX_CALLBACK, &mut value),
        Err(Error::CmdUnsupported)
    );
    let mut value = Value::CallbackArg(42);
    assert_eq!(
        stack.ioctl(Layer::Llc, Command::SET_TX_CALLBACK_ARG, &mut value),
        Err(Error::CmdUnsupported)
    );

    // On its own the LLC would complete through its callback, if it had kept one
    let mut events: EventQueue<4> = EventQueue::new();
    stack
        .llc_mut()
        .send(&[0x01; 4], &mut Link::detached(&mut events))
        .unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_deliver_before_radio_init_fails() {
    let mut stack = create_radio_stack();
    stack
        .ioctl(Layer::Llc, Command::SET_RX_CALLBACK, &mut Value::RxCallback(Some(noop_rx)))
        .unwrap();

    assert_eq!(stack.deliver(&[0x01, 0x02]), Err(Error::Init));
    assert!(stack.events().is_empty());

    stack.init().unwrap();
    assert_eq!(stack.deliver(&[0x01, 0x02]), Ok(()));
    assert_eq!(stack.events().len(), 1);
}
