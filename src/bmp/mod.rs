//! BMP reader and writer (internal).
//!
//! Only the `BITMAPFILEHEADER` + `BITMAPINFOHEADER` framing is handled here;
//! pixel data is carried as raw bytes and interpreted by
//! [`crate::transcode`].

mod decode;
mod encode;

pub use decode::BmpFile;
pub(crate) use encode::encode_bmp;
