#![no_main]
use agfbmp::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 22),
        max_memory_bytes: Some(1 << 26),
        ..Limits::default()
    };

    // None of these may panic, whatever the input.
    let _ = AgfInfo::from_bytes(data);
    let _ = UnpackRequest::new(data)
        .with_limits(&limits)
        .unpack(enough::Unstoppable);
    if let Ok(bmp) = BmpFile::parse(data) {
        let _ = bmp.palette();
        let _ = bmp.geometry().stride();
    }
    let _ = Lzss.decompress(data, data.len().saturating_mul(8).min(1 << 20));
});
