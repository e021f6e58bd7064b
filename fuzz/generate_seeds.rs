#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn section(out: &mut Vec<u8>, data: &[u8]) {
    for _ in 0..3 {
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    }
    out.extend_from_slice(data);
}

fn agf(kind: u32, width: i32, height: i32, bit_count: u16, palette_len: usize) -> Vec<u8> {
    let stride = ((width as usize * bit_count as usize / 8) + 3) & !3;
    let rows = height.unsigned_abs() as usize;

    let mut out = b"ACGF".to_vec();
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    let mut meta = vec![0u8; 56];
    meta[0] = b'B';
    meta[1] = b'M';
    meta[16..20].copy_from_slice(&40u32.to_le_bytes());
    meta[20..24].copy_from_slice(&width.to_le_bytes());
    meta[24..28].copy_from_slice(&height.to_le_bytes());
    meta[28..30].copy_from_slice(&1u16.to_le_bytes());
    meta[30..32].copy_from_slice(&bit_count.to_le_bytes());
    for i in 0..palette_len {
        let i = i as u8;
        meta.extend_from_slice(&[i, 255 - i, i / 2, 0]);
    }
    section(&mut out, &meta);

    let pixels: Vec<u8> = (0..stride * rows)
        .map(|i| (i % palette_len.max(1)) as u8)
        .collect();
    section(&mut out, &pixels);

    if kind == 2 {
        let alpha: Vec<u8> = (0..width as usize * rows).map(|i| (i * 37) as u8).collect();
        out.extend_from_slice(b"ACIF");
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(alpha.len() as u32).to_le_bytes());
        out.extend_from_slice(&width.unsigned_abs().to_le_bytes());
        out.extend_from_slice(&height.unsigned_abs().to_le_bytes());
        section(&mut out, &alpha);
    }
    out
}

fn main() {
    use std::fs;
    for target in ["fuzz_unpack", "fuzz_repack"] {
        let dir = format!("fuzz/corpus/{target}");
        fs::create_dir_all(&dir).unwrap();

        fs::write(format!("{dir}/alpha_indexed_3x2.agf"), agf(2, 3, 2, 8, 256)).unwrap();
        fs::write(format!("{dir}/alpha_indexed_short_palette.agf"), agf(2, 5, 1, 8, 4)).unwrap();
        fs::write(format!("{dir}/alpha_bgr_2x2.agf"), agf(2, 2, 2, 24, 0)).unwrap();
        fs::write(format!("{dir}/alpha_top_down.agf"), agf(2, 3, -2, 24, 0)).unwrap();
        fs::write(format!("{dir}/plain_indexed_4x4.agf"), agf(1, 4, 4, 8, 16)).unwrap();
        fs::write(format!("{dir}/plain_bgr_1x1.agf"), agf(1, 1, 1, 24, 0)).unwrap();

        // Truncated/malformed seeds for edge coverage
        fs::write(format!("{dir}/empty.bin"), b"").unwrap();
        fs::write(format!("{dir}/header_only.bin"), b"ACGF\x02\0\0\0\0\0\0\0").unwrap();
        fs::write(format!("{dir}/type3.agf"), agf(3, 1, 1, 24, 0)).unwrap();
        // LZSS section that decodes short
        let mut short = b"ACGF\x01\0\0\0\0\0\0\0".to_vec();
        short.extend_from_slice(&100u32.to_le_bytes());
        short.extend_from_slice(&100u32.to_le_bytes());
        short.extend_from_slice(&3u32.to_le_bytes());
        short.extend_from_slice(&[0x03, b'a', b'b']);
        fs::write(format!("{dir}/short_lzss.agf"), short).unwrap();
    }

    println!("Generated seed corpus in fuzz/corpus/");
}
