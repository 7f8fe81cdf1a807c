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
fn packed_to_rgb(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: PackedLayout,
    output: Sampler,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    let groups = src_buffer[..src_size].chunks_exact(4);
    let pairs = dst_buffer[..dst_size].chunks_exact_mut(2 * output.depth);
    if output.is_gray() {
        for (group, pair) in groups.zip(pairs) {
            pair[0] = group[input.y0];
            pair[1] = group[input.y1];
        }
    } else {
        for (group, pair) in groups.zip(pairs) {
            let (u, v) = (group[input.u], group[input.v]);
            let (first, second) = pair.split_at_mut(output.depth);
            output.store_yuv(first, group[input.y0], u, v);
            output.store_yuv(second, group[input.y1], u, v);
        }
    }

    true
}

#[inline(always)]
fn subsampled_to_rgb(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
    src_format: PixelFormat,
    dst_format: PixelFormat,
    input: Subsampled,
    output: Sampler,
) -> bool {
    let Some((src_size, dst_size)) = buffers_fit(
        width, height, src_format, src_buffer, dst_format, dst_buffer,
    ) else {
        return false;
    };

    let (y_plane, uv_plane) = src_buffer[..src_size].split_at(pixel_count(width, height));
    let dst_buffer = &mut dst_buffer[..dst_size];
    if output.is_gray() {
        dst_buffer.copy_from_slice(y_plane);
        return true;
    }

    let col_count = width as usize;
    let chroma_width = col_count / 2;
    let chroma_height = (height as usize) / 2;
    let dst_stride = output.depth * col_count;
    let block_stride = 2 * output.depth;

    for (cy, (y_rows, rows)) in y_plane
        .chunks_exact(2 * col_count)
        .zip(dst_buffer.chunks_exact_mut(2 * dst_stride))
        .enumerate()
    {
        let (y_top, y_bottom) = y_rows.split_at(col_count);
        let (top, bottom) = rows.split_at_mut(dst_stride);

        for (cx, ((y_top, y_bottom), (top, bottom))) in y_top
            .chunks_exact(2)
            .zip(y_bottom.chunks_exact(2))
            .zip(
                top.chunks_exact_mut(block_stride)
                    .zip(bottom.chunks_exact_mut(block_stride)),
            )
            .enumerate()
        {
            let (u_index, v_index) = input.offsets(cx, cy, chroma_width, chroma_height);
            let (u, v) = (uv_plane[u_index], uv_plane[v_index]);

            let (top_left, top_right) = top.split_at_mut(output.depth);
            let (bottom_left, bottom_right) = bottom.split_at_mut(output.depth);
            output.store_yuv(top_left, y_top[0], u, v);
            output.store_yuv(top_right, y_top[1], u, v);
            output.store_yuv(bottom_left, y_bottom[0], u, v);
            output.store_yuv(bottom_right, y_bottom[1], u, v);
        }
    }

    true
}

macro_rules! packed_to_rgb {
    ($($src_pf:ident => $dst_pf:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<$src_pf:lower _ $dst_pf:lower>](
                    width: u32,
                    height: u32,
                    src_buffer: &[u8],
                    dst_buffer: &mut [u8],
                ) -> bool {
                    packed_to_rgb(
                        width,
                        height,
                        src_buffer,
                        dst_buffer,
                        PixelFormat::$src_pf,
                        PixelFormat::$dst_pf,
                        [<$src_pf:upper>],
                        [<$dst_pf:upper>],
                    )
                }
            )*
        }
    };
}

macro_rules! subsampled_to_rgb {
    ($($src_pf:ident => $dst_pf:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<$src_pf:lower _ $dst_pf:lower>](
                    width: u32,
                    height: u32,
                    src_buffer: &[u8],
                    dst_buffer: &mut [u8],
                ) -> bool {
                    subsampled_to_rgb(
                        width,
                        height,
                        src_buffer,
                        dst_buffer,
                        PixelFormat::$src_pf,
                        PixelFormat::$dst_pf,
                        Subsampled::$src_pf,
                        [<$dst_pf:upper>],
                    )
                }
            )*
        }
    };
}

packed_to_rgb! {
    Yuyv => Gray, Yuyv => Rgba, Yuyv => Rgb, Yuyv => Bgra, Yuyv => Bgr,
    Uyvy => Gray, Uyvy => Rgba, Uyvy => Rgb, Uyvy => Bgra, Uyvy => Bgr,
}

subsampled_to_rgb! {
    I420 => Gray, I420 => Rgba, I420 => Rgb, I420 => Bgra, I420 => Bgr,
    Nv12 => Gray, Nv12 => Rgba, Nv12 => Rgb, Nv12 => Bgra, Nv12 => Bgr,
    Nv21 => Gray, Nv21 => Rgba, Nv21 => Rgb, Nv21 => Bgra, Nv21 => Bgr,
}
