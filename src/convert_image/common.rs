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

use crate::color_matrix::{CHROMA_BIAS, FORWARD_MATRIX, REVERSE_MATRIX};
use crate::pixel_format::PixelFormat;

pub const DEFAULT_ALPHA: u8 = 255;

/// Byte offsets of the channels of a packed rgb pixel
#[derive(Copy, Clone)]
pub struct Sampler {
    pub depth: usize,
    pub red: usize,
    pub green: usize,
    pub blue: usize,
    pub alpha: Option<usize>,
}

pub const GRAY: Sampler = Sampler {
    depth: 1,
    red: 0,
    green: 0,
    blue: 0,
    alpha: None,
};

pub const RGBA: Sampler = Sampler {
    depth: 4,
    red: 0,
    green: 1,
    blue: 2,
    alpha: Some(3),
};

pub const RGB: Sampler = Sampler {
    depth: 3,
    red: 0,
    green: 1,
    blue: 2,
    alpha: None,
};

pub const BGRA: Sampler = Sampler {
    depth: 4,
    red: 2,
    green: 1,
    blue: 0,
    alpha: Some(3),
};

pub const BGR: Sampler = Sampler {
    depth: 3,
    red: 2,
    green: 1,
    blue: 0,
    alpha: None,
};

impl Sampler {
    #[inline(always)]
    pub fn is_gray(self) -> bool {
        self.depth == 1
    }

    #[inline(always)]
    pub fn unpack(self, pixel: &[u8]) -> (u8, u8, u8) {
        (pixel[self.red], pixel[self.green], pixel[self.blue])
    }

    #[inline(always)]
    pub fn pack(self, pixel: &mut [u8], rgb: (u8, u8, u8), alpha: u8) {
        pixel[self.red] = rgb.0;
        pixel[self.green] = rgb.1;
        pixel[self.blue] = rgb.2;
        if let Some(index) = self.alpha {
            pixel[index] = alpha;
        }
    }

    /// Luma and unbiased chroma of a pixel.
    ///
    /// Gray pixels are already luma and carry no chroma.
    #[inline(always)]
    pub fn yuv(self, pixel: &[u8]) -> (i32, i32, i32) {
        if self.is_gray() {
            (i32::from(pixel[0]), 0, 0)
        } else {
            let (r, g, b) = self.unpack(pixel);
            (
                FORWARD_MATRIX.luma(r, g, b),
                FORWARD_MATRIX.u(r, g, b),
                FORWARD_MATRIX.v(r, g, b),
            )
        }
    }

    /// Writes the rgb conversion of a yuv sample, with opaque alpha
    #[inline(always)]
    pub fn store_yuv(self, pixel: &mut [u8], y: u8, u: u8, v: u8) {
        self.pack(pixel, REVERSE_MATRIX.rgb(y, u, v), DEFAULT_ALPHA);
    }
}

/// Byte offsets of the samples of a packed 4:2:2 group of two pixels
#[derive(Copy, Clone)]
pub struct PackedLayout {
    pub y0: usize,
    pub u: usize,
    pub y1: usize,
    pub v: usize,
}

pub const YUYV: PackedLayout = PackedLayout {
    y0: 0,
    u: 1,
    y1: 2,
    v: 3,
};

pub const UYVY: PackedLayout = PackedLayout {
    y0: 1,
    u: 0,
    y1: 3,
    v: 2,
};

/// Chroma arrangement of the 4:2:0 formats, after the luma plane
#[derive(Copy, Clone)]
pub enum Subsampled {
    I420,
    Nv12,
    Nv21,
}

impl Subsampled {
    /// Offsets of the u and v samples of chroma block (`x`, `y`), relative
    /// to the start of the chroma area
    #[inline(always)]
    pub fn offsets(
        self,
        x: usize,
        y: usize,
        chroma_width: usize,
        chroma_height: usize,
    ) -> (usize, usize) {
        let index = y * chroma_width + x;
        match self {
            Subsampled::I420 => (index, chroma_width * chroma_height + index),
            Subsampled::Nv12 => (2 * index, 2 * index + 1),
            Subsampled::Nv21 => (2 * index + 1, 2 * index),
        }
    }
}

/// Narrows an averaged, unbiased chroma value to a byte.
///
/// Values are kept in range by the forward matrix, the cast only drops the
/// sign extension.
#[inline(always)]
pub fn chroma_to_u8(x: i32) -> u8 {
    (x + CHROMA_BIAS) as u8
}

#[inline(always)]
pub fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

/// Returns the image size if both buffers are large enough
#[inline(always)]
pub fn buffers_fit(
    width: u32,
    height: u32,
    src_format: PixelFormat,
    src_buffer: &[u8],
    dst_format: PixelFormat,
    dst_buffer: &[u8],
) -> Option<(usize, usize)> {
    let src_size = src_format.checked_size(width, height)?;
    let dst_size = dst_format.checked_size(width, height)?;
    if src_buffer.len() < src_size || dst_buffer.len() < dst_size {
        return None;
    }

    Some((src_size, dst_size))
}
