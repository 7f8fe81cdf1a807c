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

//! SSE2 fast paths.
//!
//! Each kernel vectorizes the bulk of the pixel stream and hands the
//! remaining pixels to the matching reference kernel, as a one-row image.
use crate::color_matrix::FORWARD_MATRIX;
use crate::convert_image::common::{buffers_fit, pixel_count};
use crate::convert_image::scalar;
use crate::pixel_format::PixelFormat;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

const LANE_COUNT: usize = 16;

const fn mm_shuffle(z: i32, y: i32, x: i32, w: i32) -> i32 {
    (z << 6) | (y << 4) | (x << 2) | w
}

/// Moves dwords 0 and 2 to the low half of the register
const EVEN_DWORDS: i32 = mm_shuffle(3, 3, 2, 0);

type ConvertFn = fn(u32, u32, &[u8], &mut [u8]) -> bool;

/// Splits the image in a vectorized bulk of whole blocks and a tail.
///
/// Returns the pixel count of the bulk and the byte ranges it covers in
/// the source and destination buffers.
#[inline(always)]
fn split(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &[u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    block: usize,
) -> Option<(usize, usize, usize, usize)> {
    buffers_fit(width, height, src_format, src_buffer, dst_format, dst_buffer)?;

    let pixels = pixel_count(width, height);
    let bulk = pixels - pixels % block;
    Some((
        pixels,
        bulk,
        src_format.stride(1) * bulk,
        dst_format.stride(1) * bulk,
    ))
}

/// Runs the reference kernel on the pixels left over by the vectorized bulk
#[inline(always)]
fn finish(
    tail: usize,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    kernel: ConvertFn,
) -> bool {
    if tail == 0 {
        return true;
    }

    u32::try_from(tail).map_or(false, |width| kernel(width, 1, src_buffer, dst_buffer))
}

/// Swaps bytes 0 and 2 of each pixel (4-wide)
///
/// x:   a3b3g3r3 a2b2g2r2 a1b1g1r1 a0b0g0r0
/// res: a3r3g3b3 a2r2g2b2 a1r1g1b1 a0r0g0b0
#[inline(always)]
unsafe fn swap_red_blue_4x(x: __m128i) -> __m128i {
    let green_alpha = _mm_and_si128(x, _mm_set1_epi32(0xFF00_FF00_u32 as i32));
    let low = _mm_and_si128(_mm_srli_epi32(x, 16), _mm_set1_epi32(0x0000_00FF));
    let high = _mm_and_si128(_mm_slli_epi32(x, 16), _mm_set1_epi32(0x00FF_0000));
    _mm_or_si128(green_alpha, _mm_or_si128(low, high))
}

/// Swaps the bytes of each word (8-wide)
///
/// x:   v3y7u3y6 ... v0y1u0y0
/// res: y7v3y6u3 ... y1v0y0u0
#[inline(always)]
unsafe fn swap_bytes_8x(x: __m128i) -> __m128i {
    _mm_or_si128(_mm_slli_epi16(x, 8), _mm_srli_epi16(x, 8))
}

/// Luma of 4 packed 32-bit pixels, one per dword
#[inline(always)]
unsafe fn luma_4x(x: __m128i, weights: __m128i) -> __m128i {
    let zero = _mm_setzero_si128();
    let lo = _mm_madd_epi16(_mm_unpacklo_epi8(x, zero), weights);
    let hi = _mm_madd_epi16(_mm_unpackhi_epi8(x, zero), weights);

    // Add adjacent dwords, sums land in dwords 0 and 2
    let lo = _mm_add_epi32(lo, _mm_srli_epi64(lo, 32));
    let hi = _mm_add_epi32(hi, _mm_srli_epi64(hi, 32));

    let sum = _mm_unpacklo_epi64(
        _mm_shuffle_epi32(lo, EVEN_DWORDS),
        _mm_shuffle_epi32(hi, EVEN_DWORDS),
    );

    _mm_srli_epi32(sum, 7)
}

#[target_feature(enable = "sse2")]
unsafe fn swap_red_blue(src_buffer: &[u8], dst_buffer: &mut [u8]) {
    for (src, dst) in src_buffer
        .chunks_exact(LANE_COUNT)
        .zip(dst_buffer.chunks_exact_mut(LANE_COUNT))
    {
        let x = _mm_loadu_si128(src.as_ptr().cast());
        _mm_storeu_si128(dst.as_mut_ptr().cast(), swap_red_blue_4x(x));
    }
}

#[target_feature(enable = "sse2")]
unsafe fn swap_bytes(src_buffer: &[u8], dst_buffer: &mut [u8]) {
    for (src, dst) in src_buffer
        .chunks_exact(LANE_COUNT)
        .zip(dst_buffer.chunks_exact_mut(LANE_COUNT))
    {
        let x = _mm_loadu_si128(src.as_ptr().cast());
        _mm_storeu_si128(dst.as_mut_ptr().cast(), swap_bytes_8x(x));
    }
}

#[target_feature(enable = "sse2")]
unsafe fn gray_to_rgbx(src_buffer: &[u8], dst_buffer: &mut [u8]) {
    let alpha = _mm_set1_epi8(-1);
    for (src, dst) in src_buffer
        .chunks_exact(LANE_COUNT)
        .zip(dst_buffer.chunks_exact_mut(4 * LANE_COUNT))
    {
        let y = _mm_loadu_si128(src.as_ptr().cast());
        let yy_lo = _mm_unpacklo_epi8(y, y);
        let yy_hi = _mm_unpackhi_epi8(y, y);
        let ya_lo = _mm_unpacklo_epi8(y, alpha);
        let ya_hi = _mm_unpackhi_epi8(y, alpha);

        let dst = dst.as_mut_ptr();
        _mm_storeu_si128(dst.cast(), _mm_unpacklo_epi16(yy_lo, ya_lo));
        _mm_storeu_si128(dst.add(16).cast(), _mm_unpackhi_epi16(yy_lo, ya_lo));
        _mm_storeu_si128(dst.add(32).cast(), _mm_unpacklo_epi16(yy_hi, ya_hi));
        _mm_storeu_si128(dst.add(48).cast(), _mm_unpackhi_epi16(yy_hi, ya_hi));
    }
}

#[target_feature(enable = "sse2")]
unsafe fn gray_to_packed(src_buffer: &[u8], dst_buffer: &mut [u8], luma_first: bool) {
    let chroma = _mm_set1_epi8(-128);
    for (src, dst) in src_buffer
        .chunks_exact(LANE_COUNT)
        .zip(dst_buffer.chunks_exact_mut(2 * LANE_COUNT))
    {
        let y = _mm_loadu_si128(src.as_ptr().cast());
        let (lo, hi) = if luma_first {
            (_mm_unpacklo_epi8(y, chroma), _mm_unpackhi_epi8(y, chroma))
        } else {
            (_mm_unpacklo_epi8(chroma, y), _mm_unpackhi_epi8(chroma, y))
        };

        let dst = dst.as_mut_ptr();
        _mm_storeu_si128(dst.cast(), lo);
        _mm_storeu_si128(dst.add(16).cast(), hi);
    }
}

#[target_feature(enable = "sse2")]
unsafe fn packed_to_gray(src_buffer: &[u8], dst_buffer: &mut [u8], luma_first: bool) {
    let mask = _mm_set1_epi16(0x00FF);
    for (src, dst) in src_buffer
        .chunks_exact(2 * LANE_COUNT)
        .zip(dst_buffer.chunks_exact_mut(LANE_COUNT))
    {
        let src = src.as_ptr();
        let lo = _mm_loadu_si128(src.cast());
        let hi = _mm_loadu_si128(src.add(16).cast());
        let y = if luma_first {
            _mm_packus_epi16(_mm_and_si128(lo, mask), _mm_and_si128(hi, mask))
        } else {
            _mm_packus_epi16(_mm_srli_epi16(lo, 8), _mm_srli_epi16(hi, 8))
        };

        _mm_storeu_si128(dst.as_mut_ptr().cast(), y);
    }
}

#[target_feature(enable = "sse2")]
unsafe fn rgbx_to_gray(src_buffer: &[u8], dst_buffer: &mut [u8], offsets: (usize, usize, usize)) {
    let mut weights = [0_i16; 4];
    weights[offsets.0] = FORWARD_MATRIX.yr as i16;
    weights[offsets.1] = FORWARD_MATRIX.yg as i16;
    weights[offsets.2] = FORWARD_MATRIX.yb as i16;
    let weights = _mm_set_epi16(
        weights[3], weights[2], weights[1], weights[0], weights[3], weights[2], weights[1],
        weights[0],
    );

    for (src, dst) in src_buffer
        .chunks_exact(4 * LANE_COUNT)
        .zip(dst_buffer.chunks_exact_mut(LANE_COUNT))
    {
        let src = src.as_ptr();
        let y0 = luma_4x(_mm_loadu_si128(src.cast()), weights);
        let y1 = luma_4x(_mm_loadu_si128(src.add(16).cast()), weights);
        let y2 = luma_4x(_mm_loadu_si128(src.add(32).cast()), weights);
        let y3 = luma_4x(_mm_loadu_si128(src.add(48).cast()), weights);

        let y = _mm_packus_epi16(_mm_packs_epi32(y0, y1), _mm_packs_epi32(y2, y3));
        _mm_storeu_si128(dst.as_mut_ptr().cast(), y);
    }
}

macro_rules! accelerated {
    ($name:ident, $src_pf:ident, $dst_pf:ident, $block:expr, |$src:ident, $dst:ident| $body:expr) => {
        pub fn $name(width: u32, height: u32, src_buffer: &[u8], dst_buffer: &mut [u8]) -> bool {
            let Some((pixels, bulk, src_bulk, dst_bulk)) = split(
                width,
                height,
                src_buffer,
                dst_buffer,
                PixelFormat::$src_pf,
                PixelFormat::$dst_pf,
                $block,
            ) else {
                return false;
            };

            let (src_bulk, src_tail) = src_buffer.split_at(src_bulk);
            let (dst_bulk, dst_tail) = dst_buffer.split_at_mut(dst_bulk);
            {
                let $src = src_bulk;
                let $dst = dst_bulk;
                unsafe { $body };
            }

            finish(pixels - bulk, src_tail, dst_tail, scalar::$name)
        }
    };
}

accelerated!(rgba_bgra, Rgba, Bgra, 4, |src, dst| swap_red_blue(src, dst));
accelerated!(bgra_rgba, Bgra, Rgba, 4, |src, dst| swap_red_blue(src, dst));
accelerated!(yuyv_uyvy, Yuyv, Uyvy, 8, |src, dst| swap_bytes(src, dst));
accelerated!(uyvy_yuyv, Uyvy, Yuyv, 8, |src, dst| swap_bytes(src, dst));
accelerated!(gray_rgba, Gray, Rgba, 16, |src, dst| gray_to_rgbx(src, dst));
accelerated!(gray_bgra, Gray, Bgra, 16, |src, dst| gray_to_rgbx(src, dst));
accelerated!(gray_yuyv, Gray, Yuyv, 16, |src, dst| gray_to_packed(src, dst, true));
accelerated!(gray_uyvy, Gray, Uyvy, 16, |src, dst| gray_to_packed(src, dst, false));
accelerated!(yuyv_gray, Yuyv, Gray, 16, |src, dst| packed_to_gray(src, dst, true));
accelerated!(uyvy_gray, Uyvy, Gray, 16, |src, dst| packed_to_gray(src, dst, false));
accelerated!(rgba_gray, Rgba, Gray, 16, |src, dst| rgbx_to_gray(src, dst, (0, 1, 2)));
accelerated!(bgra_gray, Bgra, Gray, 16, |src, dst| rgbx_to_gray(src, dst, (2, 1, 0)));
