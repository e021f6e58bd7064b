#![no_main]
use agfbmp::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 20),
        max_memory_bytes: Some(1 << 24),
        ..Limits::default()
    };

    // Anything that unpacks must pack again and unpack to the same BMP.
    let Ok(unpacked) = UnpackRequest::new(data)
        .with_limits(&limits)
        .unpack(enough::Unstoppable)
    else {
        return;
    };
    let packed = PackRequest::new(&unpacked.context)
        .pack(&unpacked.bmp, enough::Unstoppable)
        .expect("unpacked BMP failed to pack");
    let again = UnpackRequest::new(&packed)
        .unpack(enough::Unstoppable)
        .expect("repacked AGF failed to unpack");
    assert_eq!(again.bmp, unpacked.bmp, "repack changed the image");

    // Compressed sections must decode to the same thing.
    let compressed = PackRequest::new(&unpacked.context)
        .compress_sections(true)
        .pack(&unpacked.bmp, enough::Unstoppable)
        .expect("compressed pack failed");
    let again = UnpackRequest::new(&compressed)
        .unpack(enough::Unstoppable)
        .expect("compressed AGF failed to unpack");
    assert_eq!(again.bmp, unpacked.bmp, "compressed repack changed the image");
});
