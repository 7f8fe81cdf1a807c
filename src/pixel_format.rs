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

use crate::ErrorKind;
use core::fmt;
use core::str::FromStr;

/// An enumeration of supported pixel formats.
///
/// Every format is tightly packed: rows follow each other without padding and,
/// for the planar formats, planes follow each other inside a single buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Luma only.
    ///
    /// 8 bits per pixel
    Gray,
    /// RGB with alpha channel last.
    ///
    /// 32 bits per pixel
    Rgba,
    /// RGB packed into 24 bits without padding.
    ///
    /// 24 bits per pixel
    Rgb,
    /// Reverse RGB with alpha channel last.
    ///
    /// 32 bits per pixel
    Bgra,
    /// Reverse RGB packed into 24 bits without padding.
    ///
    /// 24 bits per pixel
    Bgr,
    /// Packed YUV 4:2:2, each pair of pixels is stored as `Y0 U Y1 V`.
    ///
    /// 16 bits per pixel
    Yuyv,
    /// Packed YUV 4:2:2, each pair of pixels is stored as `U Y0 V Y1`.
    ///
    /// 16 bits per pixel
    Uyvy,
    /// YUV with one luma plane Y then U chroma plane and last the V chroma plane.
    /// The two chroma planes are sub-sampled in both the horizontal and vertical dimensions by a factor of 2.
    ///
    /// 12 bits per pixel
    I420,
    /// YUV with one luma plane Y then one plane with U and V values interleaved.
    /// Chroma planes are subsampled in both the horizontal and vertical dimensions by a factor of 2.
    ///
    /// 12 bits per pixel
    Nv12,
    /// Same as [`PixelFormat::Nv12`], with V and U values interleaved in the chroma plane.
    ///
    /// 12 bits per pixel
    Nv21,
}

/// Number of supported pixel formats
pub const PIXEL_FORMAT_COUNT: usize = 10;

/// All the supported pixel formats, sorted by numeric tag
pub const PIXEL_FORMATS: [PixelFormat; PIXEL_FORMAT_COUNT] = [
    PixelFormat::Gray,
    PixelFormat::Rgba,
    PixelFormat::Rgb,
    PixelFormat::Bgra,
    PixelFormat::Bgr,
    PixelFormat::Yuyv,
    PixelFormat::Uyvy,
    PixelFormat::I420,
    PixelFormat::Nv12,
    PixelFormat::Nv21,
];

impl PixelFormat {
    /// Returns the lower-case name of the pixel format
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Gray => "gray",
            PixelFormat::Rgba => "rgba",
            PixelFormat::Rgb => "rgb",
            PixelFormat::Bgra => "bgra",
            PixelFormat::Bgr => "bgr",
            PixelFormat::Yuyv => "yuyv",
            PixelFormat::Uyvy => "uyvy",
            PixelFormat::I420 => "i420",
            PixelFormat::Nv12 => "nv12",
            PixelFormat::Nv21 => "nv21",
        }
    }

    /// Looks up a pixel format by its name.
    ///
    /// Returns `None` for names that do not match any supported format.
    ///
    /// # Examples
    /// ```
    /// use pixel_convert::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::from_name("nv21"), Some(PixelFormat::Nv21));
    /// assert_eq!(PixelFormat::from_name("end"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<PixelFormat> {
        PIXEL_FORMATS
            .iter()
            .copied()
            .find(|format| format.name() == name)
    }

    /// Number of bytes of a row of `width` pixels.
    ///
    /// For 4:2:0 formats this is the average number of bytes per row once the
    /// chroma planes are accounted for, so that `stride * height` is the whole
    /// buffer size.
    ///
    /// Saturates at `usize::MAX`, use [`get_stride`] to detect overflows.
    ///
    /// [`get_stride`]: crate::get_stride
    pub const fn stride(self, width: u32) -> usize {
        let width = width as usize;
        match self {
            PixelFormat::Gray => width,
            PixelFormat::Rgba | PixelFormat::Bgra => width.saturating_mul(4),
            PixelFormat::Rgb | PixelFormat::Bgr => width.saturating_mul(3),
            PixelFormat::Yuyv | PixelFormat::Uyvy => width.saturating_mul(2),
            PixelFormat::I420 | PixelFormat::Nv12 | PixelFormat::Nv21 => {
                width.saturating_add(width >> 1)
            }
        }
    }

    /// Number of bytes of a `width` x `height` image.
    ///
    /// Saturates at `usize::MAX`, use [`get_buffer_size`] to detect overflows.
    ///
    /// [`get_buffer_size`]: crate::get_buffer_size
    pub const fn size(self, width: u32, height: u32) -> usize {
        self.stride(width).saturating_mul(height as usize)
    }

    /// Checked version of [`PixelFormat::size`]
    pub(crate) fn checked_size(self, width: u32, height: u32) -> Option<usize> {
        let width = width as usize;
        let stride = match self {
            PixelFormat::Gray => Some(width),
            PixelFormat::Rgba | PixelFormat::Bgra => width.checked_mul(4),
            PixelFormat::Rgb | PixelFormat::Bgr => width.checked_mul(3),
            PixelFormat::Yuyv | PixelFormat::Uyvy => width.checked_mul(2),
            // (3 * width) >> 1 without the intermediate overflow
            PixelFormat::I420 | PixelFormat::Nv12 | PixelFormat::Nv21 => {
                width.checked_add(width >> 1)
            }
        };

        stride.and_then(|stride| stride.checked_mul(height as usize))
    }

    /// Returns true for gray and the packed rgb formats
    pub const fn is_rgb(self) -> bool {
        matches!(
            self,
            PixelFormat::Gray
                | PixelFormat::Rgba
                | PixelFormat::Rgb
                | PixelFormat::Bgra
                | PixelFormat::Bgr
        )
    }

    /// Returns true for the 4:2:2 and 4:2:0 formats
    pub const fn is_yuv(self) -> bool {
        !self.is_rgb()
    }

    /// Returns true if the pixel format carries an alpha channel
    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba | PixelFormat::Bgra)
    }

    /// Returns true if an image of this format can be handed to a resampler.
    ///
    /// Resamplers work on whole pixels, so chroma subsampled images must be
    /// converted to gray or to a rgb format first.
    pub const fn is_resizable(self) -> bool {
        self.is_rgb()
    }

    /// Image width must be a multiple of this value
    pub const fn width_alignment(self) -> u32 {
        match self {
            PixelFormat::Yuyv
            | PixelFormat::Uyvy
            | PixelFormat::I420
            | PixelFormat::Nv12
            | PixelFormat::Nv21 => 2,
            _ => 1,
        }
    }

    /// Image height must be a multiple of this value
    pub const fn height_alignment(self) -> u32 {
        match self {
            PixelFormat::I420 | PixelFormat::Nv12 | PixelFormat::Nv21 => 2,
            _ => 1,
        }
    }

    /// Returns true if a `width` x `height` image can be stored with this format
    pub const fn is_compatible(self, width: u32, height: u32) -> bool {
        width > 0
            && height > 0
            && width % self.width_alignment() == 0
            && height % self.height_alignment() == 0
    }
}

impl fmt::Display for PixelFormat {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::from_name(s).ok_or(ErrorKind::UnsupportedFormat)
    }
}

impl TryFrom<i32> for PixelFormat {
    type Error = ErrorKind;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| PIXEL_FORMATS.get(index).copied())
            .ok_or(ErrorKind::UnsupportedFormat)
    }
}
