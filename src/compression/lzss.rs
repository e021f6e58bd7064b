//! LZSS with a 4096-byte ring buffer, 18-byte maximum match and a
//! threshold of 2, as used by AGF sections.
//!
//! Stream layout: a flag byte announces the next eight items, least
//! significant bit first. A set bit is a literal byte; a clear bit is a
//! two-byte back reference `pos = b0 | (b1 & 0xF0) << 4`,
//! `len = (b1 & 0x0F) + 3`. The ring starts zero-filled and the write
//! cursor starts at `N - F`.

use alloc::vec;
use alloc::vec::Vec;

use super::SectionCodec;
use crate::error::AgfError;

const N: usize = 4096;
const F: usize = 18;
const THRESHOLD: usize = 2;
const MIN_MATCH: usize = THRESHOLD + 1;
const WINDOW: usize = N - F;

const HASH_BITS: u32 = 14;
const MAX_CHAIN: usize = 256;
const NONE: usize = usize::MAX;

/// Pure-software LZSS section codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lzss;

impl SectionCodec for Lzss {
    fn decompress(&self, input: &[u8], original_length: usize) -> Result<Vec<u8>, AgfError> {
        Ok(unpack(input, original_length))
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, AgfError> {
        Ok(pack(input))
    }
}

fn unpack(input: &[u8], out_len: usize) -> Vec<u8> {
    let mut ring = [0u8; N];
    let mut r = N - F;
    let mut out = Vec::with_capacity(out_len);
    let mut src = input.iter().copied();

    'stream: while out.len() < out_len {
        let Some(flags) = src.next() else { break };
        for bit in 0..8 {
            if out.len() >= out_len {
                break 'stream;
            }
            if flags & (1 << bit) != 0 {
                let Some(c) = src.next() else { break 'stream };
                out.push(c);
                ring[r] = c;
                r = (r + 1) & (N - 1);
            } else {
                let (Some(lo), Some(hi)) = (src.next(), src.next()) else {
                    break 'stream;
                };
                let pos = usize::from(lo) | ((usize::from(hi) & 0xF0) << 4);
                let len = (usize::from(hi) & 0x0F) + MIN_MATCH;
                for k in 0..len {
                    if out.len() >= out_len {
                        break 'stream;
                    }
                    let c = ring[(pos + k) & (N - 1)];
                    out.push(c);
                    ring[r] = c;
                    r = (r + 1) & (N - 1);
                }
            }
        }
    }
    out
}

fn hash(bytes: &[u8]) -> usize {
    let key = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]);
    (key.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
}

/// Greedy encoder over hash chains of 3-byte prefixes.
fn pack(input: &[u8]) -> Vec<u8> {
    let n = input.len();
    let mut out = Vec::with_capacity(n + n / 8 + 1);
    let mut head = vec![NONE; 1 << HASH_BITS];
    let mut prev = vec![NONE; n];

    let insert = |q: usize, head: &mut [usize], prev: &mut [usize]| {
        if q + MIN_MATCH <= n {
            let h = hash(&input[q..]);
            prev[q] = head[h];
            head[h] = q;
        }
    };

    let mut p = 0;
    let mut flag_pos = 0;
    let mut flag_bit = 8;
    while p < n {
        if flag_bit == 8 {
            flag_pos = out.len();
            out.push(0);
            flag_bit = 0;
        }

        let (len, src) = longest_match(input, p, &head, &prev);
        if len >= MIN_MATCH {
            let ring_pos = (N - F + src) & (N - 1);
            out.push(ring_pos as u8);
            out.push((((ring_pos >> 4) & 0xF0) | (len - MIN_MATCH)) as u8);
            for q in p..p + len {
                insert(q, &mut head, &mut prev);
            }
            p += len;
        } else {
            out[flag_pos] |= 1 << flag_bit;
            out.push(input[p]);
            insert(p, &mut head, &mut prev);
            p += 1;
        }
        flag_bit += 1;
    }
    out
}

fn longest_match(input: &[u8], p: usize, head: &[usize], prev: &[usize]) -> (usize, usize) {
    let max_len = F.min(input.len() - p);
    if max_len < MIN_MATCH {
        return (0, 0);
    }
    let mut best = (0, 0);
    let mut candidate = head[hash(&input[p..])];
    let mut depth = 0;
    while candidate != NONE && depth < MAX_CHAIN {
        if p - candidate > WINDOW {
            break;
        }
        // Overlapping matches are fine: the decoder emits byte by byte.
        let len = (0..max_len)
            .take_while(|&k| input[candidate + k] == input[p + k])
            .count();
        if len > best.0 {
            best = (len, candidate);
            if len == max_len {
                break;
            }
        }
        candidate = prev[candidate];
        depth += 1;
    }
    best
}
