use super::*;

#[test]
/// Key, format and raw identifier of standard and extended frames.
fn test_frame_key() {
    let standard = RawFrame::on_bus(2, standard_id(0x7E8).unwrap(), &[1, 2, 3]).unwrap();
    assert_eq!(standard.key(), MessageKey::standard(2, 0x7E8));
    assert!(!standard.is_extended());

    let extended = RawFrame::on_bus(1, extended_id(0x18FEF100).unwrap(), &[0; 8]).unwrap();
    assert_eq!(extended.key(), MessageKey::extended(1, 0x18FEF100));
    assert_eq!(extended.format(), FrameFormat::Extended);
}

#[test]
/// Zero length stands for a full frame; short frames are zero padded.
fn test_effective_len_and_padding() {
    let mut frame = RawFrame::on_bus(1, standard_id(0x100).unwrap(), &[0xAA, 0xBB]).unwrap();
    assert_eq!(frame.effective_len(), 2);
    assert_eq!(frame.normalized_payload(), [0xAA, 0xBB, 0, 0, 0, 0, 0, 0]);

    frame.data = [1, 2, 3, 4, 5, 6, 7, 8];
    frame.len = 0;
    assert_eq!(frame.effective_len(), 8);
    assert_eq!(frame.normalized_payload(), [1, 2, 3, 4, 5, 6, 7, 8]);

    frame.len = 12;
    assert_eq!(frame.effective_len(), 8);
}

#[test]
/// Oversized payloads and remote frames are refused.
fn test_invalid_frames() {
    assert!(RawFrame::on_bus(1, standard_id(0x100).unwrap(), &[0; 9]).is_none());
    assert!(<RawFrame as Frame>::new_remote(standard_id(0x100).unwrap(), 8).is_none());
    assert!(standard_id(0x800).is_none());
    assert!(extended_id(0x2000_0000).is_none());
}

#[test]
/// Conversion from any `embedded_can::Frame` implementation keeps id and data.
fn test_from_frame() {
    let hal_frame = <RawFrame as Frame>::new(extended_id(0x123456).unwrap(), &[9, 8, 7]).unwrap();
    let frame = RawFrame::from_frame(3, &hal_frame).unwrap();
    assert_eq!(frame.bus, 3);
    assert_eq!(frame.raw_id(), 0x123456);
    assert_eq!(frame.data(), &[9, 8, 7]);
    assert_eq!(frame.dlc(), 3);
}
