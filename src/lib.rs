//! # agfbmp
//!
//! Unpacks AGF image containers to BMP and packs edited BMPs back into AGF.
//!
//! AGF files carry an embedded BMP header, an optional palette and a pixel
//! plane, each in its own (optionally LZSS-compressed) section. The 32-bit
//! variant adds a separate alpha plane whose rows run in the opposite
//! vertical order. Unpacking joins the planes into a 32-bit BMP; packing
//! splits them again and maps colors back onto a 256-entry palette.
//!
//! ## Round trips
//!
//! Packing needs the [`DecodingContext`] of the original AGF: headers,
//! section lengths, padding and palette all come from it. An unmodified BMP
//! packs back to the original bytes (sections are stored uncompressed
//! unless [`PackRequest::compress_sections`] is set).
//!
//! ## Supported containers
//!
//! - type 1: 8-bit indexed or 24-bit BGR, no alpha
//! - type 2: 8-bit indexed or 24-bit BGR color plane plus an alpha plane
//!
//! Any other container type is rejected with
//! [`AgfError::UnsupportedContainerType`].
//!
//! ## Usage
//!
//! ```no_run
//! use agfbmp::{PackRequest, UnpackRequest, Unstoppable};
//!
//! let agf: &[u8] = &[]; // original AGF bytes
//!
//! let unpacked = UnpackRequest::new(agf).unpack(Unstoppable)?;
//! // ... edit unpacked.bmp ...
//! let repacked = PackRequest::new(&unpacked.context)
//!     .pack(&unpacked.bmp, Unstoppable)?;
//! assert_eq!(repacked, agf);
//! # Ok::<(), agfbmp::AgfError>(())
//! ```
//!
//! ## Features
//!
//! - `std` (default): file helpers in [`fs`] and batch processing in [`batch`]
//! - `multithreaded` (default): batch jobs run on the rayon pool
//! - `cli` (default): the `agfbmp` binary
//! - `rgb`: typed [`Unpacked::as_bgra`] view
//!
//! Without `std` the crate is `no_std` + `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod cursor;
mod dib;
mod error;
mod limits;
mod palette;
mod pixel;

pub mod agf;
pub mod bmp;
pub mod compression;
pub mod transcode;

mod context;
mod pack;
mod unpack;

#[cfg(feature = "std")]
pub mod batch;
#[cfg(feature = "std")]
pub mod fs;

// Re-exports
pub use agf::{AgfImage, AgfInfo, ContainerType};
pub use bmp::BmpFile;
pub use compression::{Lzss, SectionCodec};
pub use context::{DecodingContext, Unpacked};
pub use dib::{BitmapFileHeader, BitmapInfoHeader, PALETTE_LEN, PaletteEntry};
pub use enough::{Stop, Unstoppable};
pub use error::AgfError;
pub use limits::Limits;
pub use pack::{PackOptions, PackRequest};
pub use palette::{PaletteBuilder, PaletteMode};
pub use pixel::{Geometry, PixelLayout, stride};
pub use unpack::UnpackRequest;
