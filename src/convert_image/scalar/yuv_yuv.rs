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

use crate::convert_image::common::*;
use crate::pixel_format::PixelFormat;

use paste::paste;

#[inline(always)]
fn copy(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    format: PixelFormat,
) -> bool {
    let Some((src_size, dst_size)) =
        buffers_fit(width, height, format, src_buffer, format, dst_buffer)
    else {
        return false;
    };

    dst_buffer[..dst_size].copy_from_slice(&src_buffer[..src_size]);
    true
}

#[inline(always)]
fn packed_to_packed(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: PackedLayout,
    output: PackedLayout,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    for (src, dst) in src_buffer[..src_size]
        .chunks_exact(4)
        .zip(dst_buffer[..dst_size].chunks_exact_mut(4))
    {
        dst[output.y0] = src[input.y0];
        dst[output.u] = src[input.u];
        dst[output.y1] = src[input.y1];
        dst[output.v] = src[input.v];
    }

    true
}

#[inline(always)]
fn packed_to_subsampled(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: PackedLayout,
    output: Subsampled,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    let col_count = width as usize;
    let chroma_width = col_count / 2;
    let chroma_height = (height as usize) / 2;
    let src_stride = 2 * col_count;
    let (y_plane, uv_plane) = dst_buffer[..dst_size].split_at_mut(pixel_count(width, height));

    for (cy, (rows, y_rows)) in src_buffer[..src_size]
        .chunks_exact(2 * src_stride)
        .zip(y_plane.chunks_exact_mut(2 * col_count))
        .enumerate()
    {
        let (top, bottom) = rows.split_at(src_stride);
        let (y_top, y_bottom) = y_rows.split_at_mut(col_count);

        for (cx, ((top, bottom), (y_top, y_bottom))) in top
            .chunks_exact(4)
            .zip(bottom.chunks_exact(4))
            .zip(y_top.chunks_exact_mut(2).zip(y_bottom.chunks_exact_mut(2)))
            .enumerate()
        {
            y_top[0] = top[input.y0];
            y_top[1] = top[input.y1];
            y_bottom[0] = bottom[input.y0];
            y_bottom[1] = bottom[input.y1];

            let (u_index, v_index) = output.offsets(cx, cy, chroma_width, chroma_height);
            uv_plane[u_index] = average(top[input.u], bottom[input.u]);
            uv_plane[v_index] = average(top[input.v], bottom[input.v]);
        }
    }

    true
}

#[inline(always)]
fn subsampled_to_packed(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: Subsampled,
    output: PackedLayout,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    let col_count = width as usize;
    let chroma_width = col_count / 2;
    let chroma_height = (height as usize) / 2;
    let dst_stride = 2 * col_count;
    let (y_plane, uv_plane) = src_buffer[..src_size].split_at(pixel_count(width, height));

    for (cy, (y_rows, rows)) in y_plane
        .chunks_exact(2 * col_count)
        .zip(dst_buffer[..dst_size].chunks_exact_mut(2 * dst_stride))
        .enumerate()
    {
        let (y_top, y_bottom) = y_rows.split_at(col_count);
        let (top, bottom) = rows.split_at_mut(dst_stride);

        for (cx, ((y_top, y_bottom), (top, bottom))) in y_top
            .chunks_exact(2)
            .zip(y_bottom.chunks_exact(2))
            .zip(top.chunks_exact_mut(4).zip(bottom.chunks_exact_mut(4)))
            .enumerate()
        {
            let (u_index, v_index) = input.offsets(cx, cy, chroma_width, chroma_height);
            let (u, v) = (uv_plane[u_index], uv_plane[v_index]);

            for (group, y) in [(top, y_top), (bottom, y_bottom)] {
                group[output.y0] = y[0];
                group[output.u] = u;
                group[output.y1] = y[1];
                group[output.v] = v;
            }
        }
    }

    true
}

#[inline(always)]
fn subsampled_to_subsampled(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: Subsampled,
    output: Subsampled,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    let luma_size = pixel_count(width, height);
    let chroma_width = (width as usize) / 2;
    let chroma_height = (height as usize) / 2;
    let (src_y, src_uv) = src_buffer[..src_size].split_at(luma_size);
    let (dst_y, dst_uv) = dst_buffer[..dst_size].split_at_mut(luma_size);

    dst_y.copy_from_slice(src_y);
    for cy in 0..chroma_height {
        for cx in 0..chroma_width {
            let (src_u, src_v) = input.offsets(cx, cy, chroma_width, chroma_height);
            let (dst_u, dst_v) = output.offsets(cx, cy, chroma_width, chroma_height);
            dst_uv[dst_u] = src_uv[src_u];
            dst_uv[dst_v] = src_uv[src_v];
        }
    }

    true
}

#[inline(always)]
fn average(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b)) >> 1) as u8
}

macro_rules! copy {
    ($($pf:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<$pf:lower _ $pf:lower>](
                    width: u32,
                    height: u32,
                    src_buffer: &[u8],
                    dst_buffer: &mut [u8],
                ) -> bool {
                    copy(width, height, src_buffer, dst_buffer, PixelFormat::$pf)
                }
            )*
        }
    };
}

macro_rules! yuv_to_yuv {
    ($kernel:ident, $src_layout:ident, $dst_layout:ident, $($src_pf:ident => $dst_pf:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<$src_pf:lower _ $dst_pf:lower>](
                    width: u32,
                    height: u32,
                    src_buffer: &[u8],
                    dst_buffer: &mut [u8],
                ) -> bool {
                    $kernel(
                        width,
                        height,
                        src_buffer,
                        dst_buffer,
                        PixelFormat::$src_pf,
                        PixelFormat::$dst_pf,
                        $src_layout!($src_pf),
                        $dst_layout!($dst_pf),
                    )
                }
            )*
        }
    };
}

macro_rules! packed {
    ($pf:ident) => {
        paste! { [<$pf:upper>] }
    };
}

macro_rules! subsampled {
    ($pf:ident) => {
        Subsampled::$pf
    };
}

copy!(Yuyv, Uyvy, I420, Nv12, Nv21);

yuv_to_yuv!(packed_to_packed, packed, packed, Yuyv => Uyvy, Uyvy => Yuyv);

yuv_to_yuv! {
    packed_to_subsampled, packed, subsampled,
    Yuyv => I420, Yuyv => Nv12, Yuyv => Nv21,
    Uyvy => I420, Uyvy => Nv12, Uyvy => Nv21,
}

yuv_to_yuv! {
    subsampled_to_packed, subsampled, packed,
    I420 => Yuyv, I420 => Uyvy,
    Nv12 => Yuyv, Nv12 => Uyvy,
    Nv21 => Yuyv, Nv21 => Uyvy,
}

yuv_to_yuv! {
    subsampled_to_subsampled, subsampled, subsampled,
    I420 => Nv12, I420 => Nv21,
    Nv12 => I420, Nv12 => Nv21,
    Nv21 => I420, Nv21 => Nv12,
}
