// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::too_many_arguments, // Kernels take the format pair and both layouts
    clippy::missing_safety_doc, // Until we add them...
    clippy::similar_names, // This requires effort to ensure
    // Kernels are generic over the channel layout and rely on the layout
    // being a constant once inlined in the named wrapper
    clippy::inline_always,
    // Narrowing casts are checked by the fixed-point ranges
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    // Yield false positives
    clippy::must_use_candidate,
)]

//! Pixel convert is a library to convert raw frames between pixel formats.
//!
//! Any of the following pixel formats can be converted into any other one:
//!
//! | Family      | Pixel formats                  | Subsampling | w | h |
//! | ----------- | ------------------------------ | :---------: |:-:|:-:|
//! | rgb         | GRAY, RGBA, RGB, BGRA, BGR     | none        |   |   |
//! | packed yuv  | YUYV, UYVY                     | 4:2:2       | 2 |   |
//! | planar yuv  | I420, NV12, NV21               | 4:2:0       | 2 | 2 |
//!
//! The values reported in columns `w` and `h`, when specified, indicate that
//! images using the format must have width and height that are multiples of
//! the specified values.
//!
//! Color conversions use fixed-point matrices: rgb to yuv with 7 fractional
//! bits, yuv to rgb with 6 fractional bits and saturation. Chroma is averaged
//! when subsampling and replicated when upsampling.
//!
//! Every conversion has a reference implementation; some of them also have an
//! accelerated implementation, chosen at runtime when the cpu supports it. Both
//! produce the same bytes.
//!
//! # Examples
//!
//! Convert an image from bgra to nv12:
//! ```
//! use pixel_convert as pc;
//! use pc::{convert_image, PixelFormat};
//!
//! fn convert() {
//!     const WIDTH: u32 = 640;
//!     const HEIGHT: u32 = 480;
//!
//!     let src_data = Box::new([0u8; 4 * (WIDTH as usize) * (HEIGHT as usize)]);
//!     let mut dst_data = Box::new([0u8; 3 * (WIDTH as usize) * (HEIGHT as usize) / 2]);
//!
//!     convert_image(
//!         WIDTH,
//!         HEIGHT,
//!         PixelFormat::Bgra,
//!         &*src_data,
//!         PixelFormat::Nv12,
//!         &mut *dst_data,
//!     );
//! }
//! ```
//!
//! Handle conversion errors:
//! ```
//! use pixel_convert as pc;
//! use pc::{convert_image, ErrorKind, PixelFormat};
//!
//! const WIDTH: u32 = 641;
//! const HEIGHT: u32 = 480;
//!
//! let src_data = vec![0u8; 3 * (WIDTH as usize) * (HEIGHT as usize)];
//! let mut dst_data = vec![0u8; 3 * (WIDTH as usize) * (HEIGHT as usize) / 2];
//!
//! let status = convert_image(
//!     WIDTH,
//!     HEIGHT,
//!     PixelFormat::Rgb,
//!     &src_data,
//!     PixelFormat::I420,
//!     &mut dst_data,
//! );
//!
//! assert_eq!(status, Err(ErrorKind::InvalidDimension));
//! ```
//!
//! Work with images that own their buffer:
//! ```
//! use pixel_convert as pc;
//! use pc::{convert, Image, PixelFormat};
//! use std::error;
//!
//! fn convert_owned() -> Result<(), Box<dyn error::Error>> {
//!     let src = Image::new(480, 640, PixelFormat::Yuyv)?;
//!     let mut dst = Image::new(480, 640, PixelFormat::Rgb)?;
//!
//!     convert(&src, &mut dst)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Compute how many bytes are needed to store an image of a given format and size:
//! ```
//! use pixel_convert as pc;
//! use pc::{get_buffer_size, PixelFormat};
//! use std::error;
//!
//! fn compute_size() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 640;
//!     const HEIGHT: u32 = 480;
//!
//!     let size = get_buffer_size(WIDTH, HEIGHT, PixelFormat::Nv21)?;
//!     let buffer: Vec<_> = vec![0u8; size];
//!
//!     // Do something with buffer
//!     // --snip--
//!
//!     Ok(())
//! }
//! ```
mod color_matrix;
mod convert_image;
mod cpu_info;
mod dispatcher;
mod image;
mod pixel_format;
mod static_assert;

use cpu_info::{CpuManufacturer, InstructionSet};
use paste::paste;
use std::error;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

pub use color_matrix::{
    ForwardMatrix, ReverseMatrix, CHROMA_BIAS, FIX6, FIX7, FORWARD_MATRIX, REVERSE_MATRIX,
};
pub use image::Image;
pub use pixel_format::{PixelFormat, PIXEL_FORMATS, PIXEL_FORMAT_COUNT};

/// An enumeration of errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Width or height is zero, is not a multiple of what a subsampled pixel
    /// format requires, or describes an image too large to address
    InvalidDimension,
    /// A pixel format tag or name does not match any supported pixel format
    UnsupportedFormat,
    /// Source and destination images do not have the same width and height
    DimensionMismatch,
    /// Not enough data was provided to the called function. Typically, provided
    /// buffers are not correctly sized
    NotEnoughData,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidDimension => write!(
                f,
                "Image dimensions are not legal for the pixel formats of the command"
            ),
            ErrorKind::UnsupportedFormat => write!(f, "Unsupported pixel format"),
            ErrorKind::DimensionMismatch => write!(
                f,
                "Source and destination images have different dimensions"
            ),
            ErrorKind::NotEnoughData => write!(f, "Not enough data provided"),
        }
    }
}

#[cfg(not(tarpaulin_include))]
impl error::Error for ErrorKind {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Selects which implementation of a conversion runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Implementation {
    /// Portable implementation, defines the expected output of every conversion
    Reference,
    /// Fastest implementation available on the running cpu. Falls back to
    /// [`Implementation::Reference`] when a conversion has no fast path
    Accelerated,
}

type ConvertFn = fn(u32, u32, &[u8], &mut [u8]) -> bool;

macro_rules! set_row {
    ($conv:expr, $set:ident, $src_pf:ident => [$($dst_pf:ident),*]) => {
        paste! {
            $(
                $conv[dispatcher::get_index(PixelFormat::$src_pf, PixelFormat::$dst_pf)] =
                    Some(convert_image::$set::[<$src_pf:lower _ $dst_pf:lower>]);
            )*
        }
    };
}

macro_rules! set_reference_table {
    ($conv:expr) => {
        set_row!($conv, scalar, Gray => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Rgba => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Rgb => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Bgra => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Bgr => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Yuyv => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Uyvy => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, I420 => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Nv12 => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
        set_row!($conv, scalar, Nv21 => [Gray, Rgba, Rgb, Bgra, Bgr, Yuyv, Uyvy, I420, Nv12, Nv21]);
    };
}

#[cfg(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64")))]
macro_rules! set_sse2_table {
    ($conv:expr) => {
        set_row!($conv, sse2, Gray => [Rgba, Bgra, Yuyv, Uyvy]);
        set_row!($conv, sse2, Rgba => [Gray, Bgra]);
        set_row!($conv, sse2, Bgra => [Gray, Rgba]);
        set_row!($conv, sse2, Yuyv => [Gray, Uyvy]);
        set_row!($conv, sse2, Uyvy => [Gray, Yuyv]);
    };
}

type DispatchTable = [Option<ConvertFn>; dispatcher::TABLE_SIZE];

struct Context {
    manufacturer: CpuManufacturer,
    set: InstructionSet,
    converters: DispatchTable,
    accelerated: DispatchTable,
}

impl Context {
    pub fn global() -> &'static Context {
        static INSTANCE: OnceLock<Context> = OnceLock::new();
        INSTANCE.get_or_init(Context::new)
    }

    pub fn new() -> Self {
        let (manufacturer, set) = cpu_info::get();
        let mut context = Context {
            manufacturer,
            set,
            converters: [None; dispatcher::TABLE_SIZE],
            accelerated: [None; dispatcher::TABLE_SIZE],
        };

        set_reference_table!(context.converters);

        #[cfg(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64")))]
        if context.set == InstructionSet::Sse2 {
            set_sse2_table!(context.accelerated);
        }

        debug!(
            manufacturer = ?context.manufacturer,
            instruction_set = ?context.set,
            accelerated = context.accelerated.iter().flatten().count(),
            "conversion context initialized"
        );

        context
    }
}

/// Returns a description of the algorithms that are best for the running cpu and
/// available instruction sets
///
/// # Examples
/// ```
/// use pixel_convert as pc;
/// println!("{}", pc::describe_acceleration());
/// // => {cpu-manufacturer:Intel,instruction-set:Sse2}
/// ```
pub fn describe_acceleration() -> String {
    let state = Context::global();

    format!(
        "{{cpu-manufacturer:{:?},instruction-set:{:?}}}",
        state.manufacturer, state.set
    )
}

/// Compute the number of bytes of a row of the given width.
///
/// For 4:2:0 pixel formats the chroma planes are included, so that the stride
/// multiplied by the image height is the buffer size.
///
/// # Errors
///
/// * [`InvalidDimension`] if `width` is zero or the stride overflows
///
/// [`InvalidDimension`]: ./enum.ErrorKind.html#variant.InvalidDimension
pub fn get_stride(width: u32, format: PixelFormat) -> Result<usize, ErrorKind> {
    if width == 0 {
        return Err(ErrorKind::InvalidDimension);
    }

    format
        .checked_size(width, 1)
        .ok_or(ErrorKind::InvalidDimension)
}

/// Compute the number of bytes required to store an image given its format and
/// dimensions
///
/// # Arguments
/// * `width` - Width of the image in pixels
/// * `height` - Height of the image in pixels
/// * `format` - Pixel format
///
/// # Errors
///
/// * [`InvalidDimension`] if `width` or `height` is zero or the size overflows
///
/// [`InvalidDimension`]: ./enum.ErrorKind.html#variant.InvalidDimension
pub fn get_buffer_size(width: u32, height: u32, format: PixelFormat) -> Result<usize, ErrorKind> {
    if width == 0 || height == 0 {
        return Err(ErrorKind::InvalidDimension);
    }

    format
        .checked_size(width, height)
        .ok_or(ErrorKind::InvalidDimension)
}

fn validate(
    width: u32,
    height: u32,
    src_format: PixelFormat,
    src_len: usize,
    dst_format: PixelFormat,
    dst_len: usize,
) -> Result<(), ErrorKind> {
    if !src_format.is_compatible(width, height) || !dst_format.is_compatible(width, height) {
        return Err(ErrorKind::InvalidDimension);
    }

    let src_size = get_buffer_size(width, height, src_format)?;
    let dst_size = get_buffer_size(width, height, dst_format)?;
    if src_len < src_size || dst_len < dst_size {
        return Err(ErrorKind::NotEnoughData);
    }

    Ok(())
}

/// A conversion between two pixel formats, as found in the dispatch table
#[derive(Copy, Clone)]
pub struct Converter {
    src_format: PixelFormat,
    dst_format: PixelFormat,
    reference: Option<ConvertFn>,
    accelerated: Option<ConvertFn>,
}

impl Converter {
    /// Source pixel format
    pub fn src_format(&self) -> PixelFormat {
        self.src_format
    }

    /// Destination pixel format
    pub fn dst_format(&self) -> PixelFormat {
        self.dst_format
    }

    /// True if [`Implementation::Accelerated`] runs a fast path on this cpu
    pub fn is_accelerated(&self) -> bool {
        self.accelerated.is_some()
    }

    /// Converts using the fastest implementation available.
    ///
    /// See [`convert_image`] for the arguments and the errors.
    ///
    /// # Errors
    ///
    /// Same as [`convert_image`]
    pub fn convert(
        &self,
        width: u32,
        height: u32,
        src_buffer: &[u8],
        dst_buffer: &mut [u8],
    ) -> Result<(), ErrorKind> {
        self.convert_with(
            Implementation::Accelerated,
            width,
            height,
            src_buffer,
            dst_buffer,
        )
    }

    /// Converts using the given implementation.
    ///
    /// Both implementations write the same bytes.
    ///
    /// # Errors
    ///
    /// Same as [`convert_image`]
    pub fn convert_with(
        &self,
        implementation: Implementation,
        width: u32,
        height: u32,
        src_buffer: &[u8],
        dst_buffer: &mut [u8],
    ) -> Result<(), ErrorKind> {
        if let Err(error) = validate(
            width,
            height,
            self.src_format,
            src_buffer.len(),
            self.dst_format,
            dst_buffer.len(),
        ) {
            debug!(
                src_format = %self.src_format,
                dst_format = %self.dst_format,
                width,
                height,
                %error,
                "conversion rejected"
            );

            return Err(error);
        }

        let kernel = match implementation {
            Implementation::Reference => self.reference,
            Implementation::Accelerated => self.accelerated.or(self.reference),
        };

        match kernel {
            None => Err(ErrorKind::UnsupportedFormat),
            Some(kernel) => {
                if kernel(width, height, src_buffer, dst_buffer) {
                    Ok(())
                } else {
                    Err(ErrorKind::NotEnoughData)
                }
            }
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Converter")
            .field("src_format", &self.src_format)
            .field("dst_format", &self.dst_format)
            .field("accelerated", &self.is_accelerated())
            .finish()
    }
}

/// Looks up the conversion from `src_format` to `dst_format`.
///
/// Every pair of pixel formats has a conversion, converting a pixel format into
/// itself copies the image.
///
/// # Examples
/// ```
/// use pixel_convert as pc;
/// use pc::{get_converter, Implementation, PixelFormat};
///
/// let converter = get_converter(PixelFormat::Yuyv, PixelFormat::Uyvy);
/// let src = [16u8, 128, 235, 128];
/// let mut dst = [0u8; 4];
///
/// converter
///     .convert_with(Implementation::Reference, 2, 1, &src, &mut dst)
///     .unwrap();
/// assert_eq!(dst, [128, 16, 128, 235]);
/// ```
pub fn get_converter(src_format: PixelFormat, dst_format: PixelFormat) -> Converter {
    let context = Context::global();
    let index = dispatcher::get_index(src_format, dst_format);

    Converter {
        src_format,
        dst_format,
        reference: context.converters[index],
        accelerated: context.accelerated[index],
    }
}

/// Converts an image from a pixel format to another one, applying
/// downsampling/upsampling to match the destination pixel format.
///
/// Nothing is written to the destination buffer when an error is returned.
///
/// # Arguments
/// * `width` - Width of the image to convert in pixels
/// * `height` - Height of the image to convert in pixels
/// * `src_format` - Source pixel format
/// * `src_buffer` - Source image, tightly packed
/// * `dst_format` - Destination pixel format
/// * `dst_buffer` - Destination image, tightly packed
///
/// # Errors
///
/// * [`InvalidDimension`] if `width` or `height` is zero, or violates the
///   alignment required by the source or the destination pixel format
///   (4:2:2 formats need an even width, 4:2:0 formats also need an even height)
///
/// * [`NotEnoughData`] if the source or the destination buffer is shorter than
///   the size returned by [`get_buffer_size`]
///
/// # Algorithm 1
/// Conversion between rgb formats: channels are reordered, a missing alpha is
/// set to 255, gray is replicated on the three channels. Gray is computed as:
/// ```text
/// y = (38 * r + 75 * g + 15 * b) >> 7
/// ```
///
/// # Algorithm 2
/// Conversion from rgb to yuv formats, every pixel is converted with:
/// ```text
/// y = (38 * r + 75 * g + 15 * b) >> 7
/// u = (64 * b - 22 * r - 42 * g) >> 7
/// v = (64 * r - 54 * g - 10 * b) >> 7
/// ```
/// Chroma is then averaged on each group of 2 (4:2:2) or 2x2 (4:2:0) pixels,
/// and biased by 128. A gray source has chroma 128.
///
/// # Algorithm 3
/// Conversion from yuv to rgb formats, chroma is replicated on every pixel of
/// its group, then:
/// ```text
/// r = clamp(((y << 6) + 90 * v - 90 * 128) >> 6)
/// g = clamp(((y << 6) - 22 * u - 46 * v + 68 * 128) >> 6)
/// b = clamp(((y << 6) + 113 * u - 113 * 128) >> 6)
/// ```
/// A gray destination receives the luma as is.
///
/// # Algorithm 4
/// Conversion between yuv formats: luma is copied, chroma is reordered,
/// vertically averaged (4:2:2 to 4:2:0) or vertically replicated
/// (4:2:0 to 4:2:2).
///
/// [`InvalidDimension`]: ./enum.ErrorKind.html#variant.InvalidDimension
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`get_buffer_size`]: ./fn.get_buffer_size.html
pub fn convert_image(
    width: u32,
    height: u32,
    src_format: PixelFormat,
    src_buffer: &[u8],
    dst_format: PixelFormat,
    dst_buffer: &mut [u8],
) -> Result<(), ErrorKind> {
    get_converter(src_format, dst_format).convert(width, height, src_buffer, dst_buffer)
}

/// Converts `src` into `dst`, using the fastest implementation available.
///
/// The destination pixel format is the one `dst` was created with.
///
/// # Errors
///
/// * [`DimensionMismatch`] if the images have different width or height
///
/// * Same as [`convert_image`] otherwise
///
/// [`DimensionMismatch`]: ./enum.ErrorKind.html#variant.DimensionMismatch
pub fn convert(src: &Image, dst: &mut Image) -> Result<(), ErrorKind> {
    convert_with(Implementation::Accelerated, src, dst)
}

/// Converts `src` into `dst` using the given implementation.
///
/// # Errors
///
/// Same as [`convert`]
pub fn convert_with(
    implementation: Implementation,
    src: &Image,
    dst: &mut Image,
) -> Result<(), ErrorKind> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(ErrorKind::DimensionMismatch);
    }

    get_converter(src.format(), dst.format()).convert_with(
        implementation,
        src.width(),
        src.height(),
        src.data(),
        dst.data_mut(),
    )
}
