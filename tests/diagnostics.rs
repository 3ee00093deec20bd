use netstk::{
    diag,
    error::{self, LprError},
    Error, Layer, Netstack,
};

use mock::RecordingDriver;

// The error slot is shared by the whole process, so everything that touches
// it lives in this one test.
#[test]
fn test_last_error_tracks_latest_outcome() {
    diag::reset();
    assert_eq!(diag::last_error(), Ok(()));
    assert_eq!(diag::last_error_code(), error::NONE);

    let mut stack = Netstack::builder().rf(RecordingDriver::new(16)).build();
    stack.init().unwrap();
    assert_eq!(diag::last_error(), Ok(()));

    assert_eq!(stack.send(&[0u8; 17]), Err(Error::BufOverflow));
    assert_eq!(diag::last_error(), Err(Error::BufOverflow));
    assert_eq!(diag::last_error_code(), Error::BufOverflow.code());

    // A later success overwrites the failure
    stack.send(&[0u8; 16]).unwrap();
    assert_eq!(diag::last_error(), Ok(()));

    // So does a quiet turn of the event loop
    assert_eq!(stack.send(&[0u8; 17]), Err(Error::BufOverflow));
    stack.process().unwrap();
    assert_eq!(diag::last_error(), Ok(()));

    assert_eq!(stack.send(&[0u8; 17]), Err(Error::BufOverflow));
    stack.off_all().unwrap();
    assert_eq!(diag::last_error(), Ok(()));

    // Layer-specific codes survive the numeric round trip
    diag::record(Err(Error::Lpr(LprError::InvalidAck)));
    assert_eq!(diag::last_error_code(), 407);
    assert_eq!(diag::last_error(), Err(Error::Lpr(LprError::InvalidAck)));

    // Unnamed codes only come out of decoding, so they never read back as
    // success or as another error
    for code in [42, 257, 599, 600] {
        diag::record(error::from_code(code));
        assert_eq!(diag::last_error_code(), code);
        assert_eq!(error::to_code(diag::last_error()), code);
        assert!(diag::last_error().is_err());
    }

    // init records its own failure
    let mut stack = Netstack::builder()
        .mac(RecordingDriver::failing())
        .build();
    assert_eq!(stack.init(), Err(Error::Init));
    assert_eq!(diag::last_error(), Err(Error::Init));
    assert_eq!(Error::Init.layer(), None);
    assert_eq!(Error::Lpr(LprError::InvalidAck).layer(), Some(Layer::Lpr));
}
