mod common;

use agfbmp::*;
use common::{Agf, write_section};

fn repack(agf: &[u8]) -> Vec<u8> {
    let unpacked = UnpackRequest::new(agf).unpack(Unstoppable).unwrap();
    PackRequest::new(&unpacked.context)
        .pack(&unpacked.bmp, Unstoppable)
        .unwrap()
}

// ── Byte-identical round trips ───────────────────────────────────────

#[test]
fn indexed_alpha_roundtrip_is_identical() {
    let agf = Agf::indexed_alpha(5, 7).to_bytes(false);
    assert_eq!(repack(&agf), agf);
}

#[test]
fn truecolor_alpha_roundtrip_is_identical() {
    let agf = Agf::truecolor_alpha(6, 4).to_bytes(false);
    assert_eq!(repack(&agf), agf);
}

#[test]
fn indexed_plain_roundtrip_is_identical() {
    let agf = Agf::indexed(9, 3, 16).to_bytes(false);
    assert_eq!(repack(&agf), agf);
}

#[test]
fn truecolor_plain_roundtrip_is_identical() {
    let agf = Agf::truecolor(3, 5).to_bytes(false);
    assert_eq!(repack(&agf), agf);
}

#[test]
fn top_down_image_roundtrip() {
    let mut image = Agf::indexed_alpha(4, 3);
    image.height = -3;
    let agf = image.to_bytes(false);

    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();
    let bmp = BmpFile::parse(&unpacked.bmp).unwrap();
    assert_eq!(bmp.info.height, -3);
    assert_eq!(unpacked.pixels().len(), 4 * 3 * 4);
    assert_eq!(repack(&agf), agf);
}

// ── Unpacked BMP contents ────────────────────────────────────────────

#[test]
fn alpha_container_unpacks_to_32_bit_bmp() {
    let image = Agf::indexed_alpha(3, 2);
    let agf = image.to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();
    assert_eq!(unpacked.layout(), PixelLayout::Bgra8);

    let bmp = BmpFile::parse(&unpacked.bmp).unwrap();
    assert_eq!(bmp.info.bit_count, 32);
    assert_eq!(bmp.file.off_bits, 54);
    assert!(bmp.palette().is_empty());

    // First pixel of color row 0 takes its alpha from the last alpha row.
    let index = usize::from(image.pixels[0]);
    let entry = image.palette[index];
    let alpha = image.alpha.as_ref().unwrap();
    assert_eq!(
        &unpacked.pixels()[..4],
        &[entry.blue, entry.green, entry.red, alpha[3]]
    );
}

#[test]
fn indexed_plain_unpacks_with_palette() {
    let image = Agf::indexed(4, 2, 16);
    let agf = image.to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();
    assert_eq!(unpacked.layout(), PixelLayout::Indexed8);

    let bmp = BmpFile::parse(&unpacked.bmp).unwrap();
    assert_eq!(bmp.file.off_bits, 54 + 16 * 4);
    assert_eq!(bmp.palette(), image.palette);
    assert_eq!(bmp.pixels(), &image.pixels[..]);
    assert_eq!(unpacked.pixels(), &image.pixels[..]);
}

#[test]
fn truecolor_plain_unpacks_without_palette() {
    let image = Agf::truecolor(2, 2);
    let agf = image.to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();
    let bmp = BmpFile::parse(&unpacked.bmp).unwrap();
    assert_eq!(bmp.info.bit_count, 24);
    assert_eq!(bmp.file.off_bits, 54);
    assert_eq!(bmp.pixels(), &image.pixels[..]);
}

#[test]
fn indexed_plain_without_palette_is_rejected() {
    let agf = Agf::indexed(4, 2, 1).to_bytes(false);
    let mut image = Agf::indexed(4, 2, 1);
    image.palette.clear();
    assert!(UnpackRequest::new(&agf).unpack(Unstoppable).is_ok());
    assert!(matches!(
        UnpackRequest::new(&image.to_bytes(false)).unpack(Unstoppable),
        Err(AgfError::MissingPaletteForIndexedImage)
    ));
}

// ── Container validation ─────────────────────────────────────────────

#[test]
fn unsupported_container_types_are_rejected() {
    for kind in [0u32, 3] {
        let mut image = Agf::truecolor(2, 2);
        image.kind = kind;
        let agf = image.to_bytes(false);
        assert!(matches!(
            UnpackRequest::new(&agf).unpack(Unstoppable),
            Err(AgfError::UnsupportedContainerType(k)) if k == kind
        ));
        assert!(AgfInfo::from_bytes(&agf).is_err());
    }
}

#[test]
fn decompression_length_mismatch_is_detected() {
    let mut agf = Vec::new();
    agf.extend_from_slice(b"ACGF");
    agf.extend_from_slice(&1u32.to_le_bytes());
    agf.extend_from_slice(&0u32.to_le_bytes());
    // A "compressed" section whose stream cannot produce 100 bytes.
    agf.extend_from_slice(&100u32.to_le_bytes());
    agf.extend_from_slice(&100u32.to_le_bytes());
    agf.extend_from_slice(&3u32.to_le_bytes());
    agf.extend_from_slice(&[0x03, b'a', b'b']);
    assert!(matches!(
        UnpackRequest::new(&agf).unpack(Unstoppable),
        Err(AgfError::DecompressionLengthMismatch {
            expected: 100,
            actual: 2
        })
    ));
}

#[test]
fn truncated_container_is_eof() {
    let agf = Agf::truecolor_alpha(4, 4).to_bytes(false);
    for len in [0, 11, 20, agf.len() - 1] {
        assert!(
            UnpackRequest::new(&agf[..len]).unpack(Unstoppable).is_err(),
            "truncated to {len} bytes"
        );
    }
}

#[test]
fn short_bitmap_section_is_invalid_header() {
    let mut agf = Vec::new();
    agf.extend_from_slice(b"ACGF");
    agf.extend_from_slice(&1u32.to_le_bytes());
    agf.extend_from_slice(&0u32.to_le_bytes());
    write_section(&mut agf, &[0u8; 20], false);
    write_section(&mut agf, &[0u8; 4], false);
    assert!(matches!(
        UnpackRequest::new(&agf).unpack(Unstoppable),
        Err(AgfError::InvalidHeader(_))
    ));
}

#[test]
fn info_probe() {
    let agf = Agf::indexed_alpha(7, 3).to_bytes(true);
    let info = AgfInfo::from_bytes(&agf).unwrap();
    assert_eq!(info.container_type, ContainerType::TrueColorWithAlpha32);
    assert_eq!((info.width, info.height, info.bit_count), (7, 3, 8));
    assert_eq!(info.palette_len, 256);
}

#[test]
fn limits_reject_large() {
    let agf = Agf::truecolor_alpha(20, 20).to_bytes(false);
    let limits = Limits {
        max_pixels: Some(100),
        ..Limits::default()
    };
    assert!(matches!(
        UnpackRequest::new(&agf).with_limits(&limits).unpack(Unstoppable),
        Err(AgfError::LimitExceeded(_))
    ));

    let limits = Limits {
        max_memory_bytes: Some(1000),
        ..Limits::default()
    };
    assert!(matches!(
        UnpackRequest::new(&agf).with_limits(&limits).unpack(Unstoppable),
        Err(AgfError::LimitExceeded(_))
    ));
}

// ── Compressed sections ──────────────────────────────────────────────

#[test]
fn compressed_sections_unpack_like_raw_ones() {
    let mut image = Agf::truecolor_alpha(32, 16);
    image.pixels = common::pad_rows(&common::checkerboard(32, 16, 3), 32, 16, 3);
    let raw = UnpackRequest::new(&image.to_bytes(false))
        .unpack(Unstoppable)
        .unwrap();
    let compressed_agf = image.to_bytes(true);
    let compressed = UnpackRequest::new(&compressed_agf)
        .unpack(Unstoppable)
        .unwrap();
    assert!(compressed_agf.len() < image.to_bytes(false).len());
    assert_eq!(compressed.bmp, raw.bmp);
    assert!(
        compressed
            .context
            .image()
            .section_headers()
            .iter()
            .any(|s| s.is_compressed())
    );
}

#[test]
fn compressed_repack_decodes_to_same_image() {
    let agf = Agf::truecolor_alpha(40, 8).to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();

    let packed = PackRequest::new(&unpacked.context)
        .compress_sections(true)
        .pack(&unpacked.bmp, Unstoppable)
        .unwrap();
    let again = UnpackRequest::new(&packed).unpack(Unstoppable).unwrap();
    assert_eq!(again.bmp, unpacked.bmp);

    // Stored raw by default: the repack of a compressed file is the raw file.
    let raw = PackRequest::new(&again.context)
        .pack(&again.bmp, Unstoppable)
        .unwrap();
    assert_eq!(raw.len(), agf.len());
    assert_eq!(
        UnpackRequest::new(&raw).unpack(Unstoppable).unwrap().bmp,
        unpacked.bmp
    );
}

// ── Packing edited BMPs ──────────────────────────────────────────────

#[test]
fn short_palette_is_padded_to_256() {
    let agf = Agf::indexed_alpha_with_palette(4, 4, 4).to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();
    assert_eq!(unpacked.context.palette().len(), 4);

    let packed = PackRequest::new(&unpacked.context)
        .pack(&unpacked.bmp, Unstoppable)
        .unwrap();
    let info = AgfInfo::from_bytes(&packed).unwrap();
    assert_eq!(info.palette_len, 256);

    let again = UnpackRequest::new(&packed).unpack(Unstoppable).unwrap();
    assert_eq!(again.pixels(), unpacked.pixels());
    assert_eq!(&again.context.palette()[..4], unpacked.context.palette());
    assert!(
        again.context.palette()[4..]
            .iter()
            .all(|e| *e == PaletteEntry::default())
    );
}

#[test]
fn new_color_in_full_palette_maps_to_nearest() {
    let agf = Agf::indexed_alpha(4, 2).to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();
    let palette = unpacked.context.palette().to_vec();

    // Nudge the first pixel one step off palette entry 10.
    let mut bmp = unpacked.bmp.clone();
    let target = palette[10];
    let offset = bmp.len() - unpacked.pixels().len();
    bmp[offset] = target.blue;
    bmp[offset + 1] = target.green;
    bmp[offset + 2] = target.red.wrapping_add(1);

    let packed = PackRequest::new(&unpacked.context)
        .pack(&bmp, Unstoppable)
        .unwrap();
    let context = UnpackRequest::new(&packed).context(Unstoppable).unwrap();
    assert_eq!(context.pixels()[0], 10);
    assert_eq!(context.palette(), &palette[..]);
    assert_eq!(context.alpha(), unpacked.context.alpha());
}

#[test]
fn fresh_palette_collects_colors_in_order() {
    let agf = Agf::indexed_alpha(4, 2).to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();

    let packed = PackRequest::new(&unpacked.context)
        .palette_mode(PaletteMode::Fresh)
        .pack(&unpacked.bmp, Unstoppable)
        .unwrap();
    let context = UnpackRequest::new(&packed).context(Unstoppable).unwrap();
    assert_eq!(context.pixels()[0], 0);
    assert_eq!(context.palette().len(), 256);

    // Same image either way.
    let again = UnpackRequest::new(&packed).unpack(Unstoppable).unwrap();
    assert_eq!(again.bmp, unpacked.bmp);
}

#[test]
fn alpha_container_requires_32_bit_bmp() {
    let alpha_agf = Agf::truecolor_alpha(3, 5).to_bytes(false);
    let context = UnpackRequest::new(&alpha_agf).context(Unstoppable).unwrap();

    let plain = Agf::truecolor(3, 5).to_bytes(false);
    let bmp24 = UnpackRequest::new(&plain).unpack(Unstoppable).unwrap().bmp;
    assert!(matches!(
        PackRequest::new(&context).pack(&bmp24, Unstoppable),
        Err(AgfError::BitDepthMismatch {
            expected: 32,
            actual: 24
        })
    ));
}

#[test]
fn alpha_container_requires_same_geometry() {
    let agf = Agf::truecolor_alpha(3, 5).to_bytes(false);
    let context = UnpackRequest::new(&agf).context(Unstoppable).unwrap();

    let other = Agf::truecolor_alpha(5, 3).to_bytes(false);
    let bmp = UnpackRequest::new(&other).unpack(Unstoppable).unwrap().bmp;
    assert!(matches!(
        PackRequest::new(&context).pack(&bmp, Unstoppable),
        Err(AgfError::GeometryMismatch {
            expected: (3, 5),
            actual: (5, 3)
        })
    ));
}

#[test]
fn plain_container_requires_same_bit_depth() {
    let agf = Agf::indexed(4, 4, 8).to_bytes(false);
    let context = UnpackRequest::new(&agf).context(Unstoppable).unwrap();

    let other = Agf::truecolor(4, 4).to_bytes(false);
    let bmp = UnpackRequest::new(&other).unpack(Unstoppable).unwrap().bmp;
    assert!(matches!(
        PackRequest::new(&context).pack(&bmp, Unstoppable),
        Err(AgfError::BitDepthMismatch {
            expected: 8,
            actual: 24
        })
    ));
}

#[test]
fn pack_rejects_non_bmp_input() {
    let agf = Agf::truecolor(2, 2).to_bytes(false);
    let context = UnpackRequest::new(&agf).context(Unstoppable).unwrap();
    assert!(matches!(
        PackRequest::new(&context).pack(&agf, Unstoppable),
        Err(AgfError::UnrecognizedFormat)
    ));
}

#[cfg(feature = "rgb")]
#[test]
fn typed_bgra_view() {
    let image = Agf::truecolor_alpha(2, 2);
    let agf = image.to_bytes(false);
    let unpacked = UnpackRequest::new(&agf).unpack(Unstoppable).unwrap();
    let pixels = unpacked.as_bgra().unwrap();
    assert_eq!(pixels.len(), 4);
    assert_eq!(pixels[0].b, image.pixels[0]);

    let plain = Agf::truecolor(2, 2).to_bytes(false);
    let unpacked = UnpackRequest::new(&plain).unpack(Unstoppable).unwrap();
    assert!(unpacked.as_bgra().is_err());
}
