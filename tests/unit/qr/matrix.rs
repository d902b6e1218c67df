use super::*;

#[test]
fn generates_square_symbols_at_level_h() {
    for len in [1usize, 7, 40, 120, 600] {
        let payload = "x".repeat(len);
        let m = QrMatrix::generate(&payload, EccLevel::H).unwrap();
        assert!(m.module_count() >= MIN_MODULE_COUNT);
        assert_eq!(m.module_count(), 17 + 4 * usize::from(m.version()));
        assert_eq!(m.ecc(), EccLevel::H);
    }
}

#[test]
fn larger_payloads_never_shrink_the_symbol() {
    let small = QrMatrix::generate("https://dojo.test/checkin/a", EccLevel::H).unwrap();
    let large = QrMatrix::generate(&"https://dojo.test/checkin/".repeat(8), EccLevel::H).unwrap();
    assert!(large.module_count() > small.module_count());
}

#[test]
fn lower_levels_fit_in_smaller_or_equal_symbols() {
    let payload = "https://dojo.test/checkin/abc-123";
    let h = QrMatrix::generate(payload, EccLevel::H).unwrap();
    let l = QrMatrix::generate(payload, EccLevel::L).unwrap();
    assert!(l.module_count() <= h.module_count());
}

#[test]
fn finder_pattern_corners_are_dark() {
    let m = QrMatrix::generate("abc-123", EccLevel::H).unwrap();
    let n = m.module_count();
    assert!(m.is_dark(0, 0));
    assert!(m.is_dark(0, n - 1));
    assert!(m.is_dark(n - 1, 0));
    // Separator next to the top-left finder is light.
    assert!(!m.is_dark(7, 0));
    assert!(m.dark_count() > 0);
}

#[test]
fn out_of_range_reads_are_light() {
    let m = QrMatrix::generate("abc", EccLevel::H).unwrap();
    let n = m.module_count();
    assert!(!m.is_dark(n, 0));
    assert!(!m.is_dark(0, n + 5));
}

#[test]
fn oversized_payload_is_an_explicit_encode_error() {
    let payload = "z".repeat(2_000);
    let err = QrMatrix::generate(&payload, EccLevel::H).unwrap_err();
    assert!(matches!(err, CheckinError::Encode(_)));
    assert!(err.to_string().contains("2000 bytes"));
}

#[test]
fn from_rows_rejects_ragged_input() {
    assert!(QrMatrix::from_rows(&[]).is_err());
    assert!(QrMatrix::from_rows(&[vec![true, false], vec![true]]).is_err());
    let m = QrMatrix::from_rows(&[vec![true, false], vec![false, true]]).unwrap();
    assert!(m.is_dark(1, 1));
    assert!(!m.is_dark(0, 1));
    assert_eq!(m.dark_count(), 2);
}
