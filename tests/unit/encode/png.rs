use super::*;

fn surface(w: u32, h: u32) -> RenderSurface {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for i in 0..(w * h) {
        // Alternate opaque red and fully transparent pixels.
        if i % 2 == 0 {
            data.extend_from_slice(&[255, 0, 0, 255]);
        } else {
            data.extend_from_slice(&[0, 0, 0, 0]);
        }
    }
    RenderSurface {
        width: w,
        height: h,
        data,
    }
}

#[test]
fn sanitize_collapses_and_trims() {
    assert_eq!(sanitize_file_stem("Dojo Central"), "dojo-central");
    assert_eq!(sanitize_file_stem("Dojo São Paulo #1"), "dojo-s-o-paulo-1");
    assert_eq!(sanitize_file_stem("  --Hello__World--  "), "hello-world");
    assert_eq!(sanitize_file_stem("ABC123"), "abc123");
}

#[test]
fn sanitize_falls_back_when_empty() {
    assert_eq!(sanitize_file_stem(""), FALLBACK_FILE_STEM);
    assert_eq!(sanitize_file_stem("¡¿!?"), FALLBACK_FILE_STEM);
}

#[test]
fn export_round_trips_pixels() {
    let s = surface(6, 4);
    let out = export_png(&s, "Dojo Central").unwrap();
    assert_eq!(out.file_name, "dojo-central-checkin-qr.png");
    assert_eq!(out.mime, PNG_MIME);
    assert_eq!(&out.bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (6, 4));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
}

#[test]
fn export_rejects_mismatched_buffer() {
    let mut s = surface(4, 4);
    s.data.truncate(10);
    assert!(matches!(export_png(&s, "x"), Err(CheckinError::Export(_))));
}

#[test]
fn save_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = export_png(&surface(2, 2), "").unwrap();
    let path = out.save(dir.path().join("nested")).unwrap();
    assert_eq!(path.file_name().unwrap(), "checkin-checkin-qr.png");
    assert_eq!(std::fs::read(&path).unwrap(), out.bytes);
}
