#![allow(dead_code)]

use pixel_convert::PixelFormat;

pub const WIDTH: u32 = 8;
pub const HEIGHT: u32 = 6;

pub const RGBA_SRC: [[[u8; 4]; 8]; 6] = [
    [
        [165, 77, 202, 24],
        [37, 48, 187, 29],
        [109, 19, 44, 222],
        [214, 35, 123, 46],
        [217, 30, 63, 114],
        [31, 203, 25, 113],
        [23, 68, 148, 214],
        [73, 60, 157, 92],
    ],
    [
        [52, 96, 190, 49],
        [32, 30, 105, 254],
        [218, 160, 238, 232],
        [185, 153, 127, 92],
        [124, 41, 153, 253],
        [175, 229, 147, 37],
        [60, 214, 84, 175],
        [77, 250, 215, 20],
    ],
    [
        [39, 160, 174, 179],
        [254, 233, 35, 47],
        [138, 242, 33, 31],
        [158, 228, 145, 197],
        [177, 11, 236, 181],
        [86, 59, 252, 30],
        [111, 147, 66, 126],
        [203, 200, 254, 41],
    ],
    [
        [85, 229, 205, 142],
        [70, 220, 142, 212],
        [183, 194, 118, 77],
        [42, 90, 77, 118],
        [119, 6, 248, 93],
        [134, 144, 2, 74],
        [214, 189, 163, 64],
        [27, 233, 200, 203],
    ],
    [
        [204, 201, 53, 246],
        [205, 31, 97, 34],
        [106, 225, 83, 56],
        [174, 26, 52, 0],
        [77, 51, 186, 13],
        [36, 106, 192, 76],
        [129, 177, 186, 242],
        [62, 59, 249, 238],
    ],
    [
        [245, 247, 159, 43],
        [73, 52, 175, 135],
        [245, 82, 11, 105],
        [185, 75, 13, 152],
        [46, 133, 187, 85],
        [182, 114, 168, 114],
        [99, 122, 205, 116],
        [102, 252, 182, 14],
    ],
];

pub const RGB_FORMATS: &[PixelFormat; 5] = &[
    PixelFormat::Gray,
    PixelFormat::Rgba,
    PixelFormat::Rgb,
    PixelFormat::Bgra,
    PixelFormat::Bgr,
];

pub const YUV_FORMATS: &[PixelFormat; 5] = &[
    PixelFormat::Yuyv,
    PixelFormat::Uyvy,
    PixelFormat::I420,
    PixelFormat::Nv12,
    PixelFormat::Nv21,
];

/// Luma and chroma planes of a yuv image, chroma at its subsampled resolution
pub struct Planes {
    pub y: Vec<u8>,
    pub u: Vec<u8>,
    pub v: Vec<u8>,
    pub chroma_width: usize,
    pub chroma_height: usize,
}

pub fn luma(r: u8, g: u8, b: u8) -> i32 {
    (38 * i32::from(r) + 75 * i32::from(g) + 15 * i32::from(b)) >> 7
}

pub fn chroma(r: u8, g: u8, b: u8) -> (i32, i32) {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    ((64 * b - 22 * r - 42 * g) >> 7, (64 * r - 54 * g - 10 * b) >> 7)
}

pub fn to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let clamp = |x: i32| (x >> 6).clamp(0, 255) as u8;
    let (y, u, v) = (i32::from(y) << 6, i32::from(u), i32::from(v));
    [
        clamp(y + 90 * v - 90 * 128),
        clamp(y - 22 * u - 46 * v + 68 * 128),
        clamp(y + 113 * u - 113 * 128),
    ]
}

pub fn depth(format: PixelFormat) -> usize {
    match format {
        PixelFormat::Gray => 1,
        PixelFormat::Rgb | PixelFormat::Bgr => 3,
        _ => 4,
    }
}

/// Encodes rgba pixels, gray keeps the green channel
pub fn pack_rgb(format: PixelFormat, pixels: &[[u8; 4]]) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|&[r, g, b, a]| match format {
            PixelFormat::Gray => vec![g],
            PixelFormat::Rgba => vec![r, g, b, a],
            PixelFormat::Rgb => vec![r, g, b],
            PixelFormat::Bgra => vec![b, g, r, a],
            PixelFormat::Bgr => vec![b, g, r],
            _ => unreachable!(),
        })
        .collect()
}

/// Decodes a rgb image into rgba pixels, alpha is None if the format has none
pub fn unpack_rgb(format: PixelFormat, buffer: &[u8]) -> Vec<([u8; 3], Option<u8>)> {
    buffer
        .chunks_exact(depth(format))
        .map(|p| match format {
            PixelFormat::Gray => ([p[0], p[0], p[0]], None),
            PixelFormat::Rgba => ([p[0], p[1], p[2]], Some(p[3])),
            PixelFormat::Rgb => ([p[0], p[1], p[2]], None),
            PixelFormat::Bgra => ([p[2], p[1], p[0]], Some(p[3])),
            PixelFormat::Bgr => ([p[2], p[1], p[0]], None),
            _ => unreachable!(),
        })
        .collect()
}

pub fn fixture() -> Vec<[u8; 4]> {
    RGBA_SRC.iter().flatten().copied().collect()
}

pub fn random_buffer(size: usize) -> Vec<u8> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen::<u8>()).collect()
}

pub fn chroma_height(format: PixelFormat, height: usize) -> usize {
    match format {
        PixelFormat::Yuyv | PixelFormat::Uyvy => height,
        _ => height / 2,
    }
}

pub fn pack_yuv(format: PixelFormat, width: usize, planes: &Planes) -> Vec<u8> {
    let cw = planes.chroma_width;
    match format {
        PixelFormat::Yuyv | PixelFormat::Uyvy => {
            let mut buffer = Vec::new();
            for row in 0..planes.chroma_height {
                for cx in 0..cw {
                    let y0 = planes.y[row * width + 2 * cx];
                    let y1 = planes.y[row * width + 2 * cx + 1];
                    let u = planes.u[row * cw + cx];
                    let v = planes.v[row * cw + cx];
                    if format == PixelFormat::Yuyv {
                        buffer.extend_from_slice(&[y0, u, y1, v]);
                    } else {
                        buffer.extend_from_slice(&[u, y0, v, y1]);
                    }
                }
            }

            buffer
        }
        PixelFormat::I420 => [&planes.y[..], &planes.u[..], &planes.v[..]].concat(),
        PixelFormat::Nv12 | PixelFormat::Nv21 => {
            let mut buffer = planes.y.clone();
            for (&u, &v) in planes.u.iter().zip(planes.v.iter()) {
                if format == PixelFormat::Nv12 {
                    buffer.extend_from_slice(&[u, v]);
                } else {
                    buffer.extend_from_slice(&[v, u]);
                }
            }

            buffer
        }
        _ => unreachable!(),
    }
}

pub fn unpack_yuv(format: PixelFormat, width: usize, height: usize, buffer: &[u8]) -> Planes {
    let chroma_width = width / 2;
    let chroma_height = chroma_height(format, height);
    let chroma_size = chroma_width * chroma_height;
    let luma_size = width * height;

    let (y, u, v) = match format {
        PixelFormat::Yuyv | PixelFormat::Uyvy => {
            let (mut y, mut u, mut v) = (Vec::new(), Vec::new(), Vec::new());
            for group in buffer[..2 * luma_size].chunks_exact(4) {
                if format == PixelFormat::Yuyv {
                    y.extend_from_slice(&[group[0], group[2]]);
                    u.push(group[1]);
                    v.push(group[3]);
                } else {
                    y.extend_from_slice(&[group[1], group[3]]);
                    u.push(group[0]);
                    v.push(group[2]);
                }
            }

            (y, u, v)
        }
        PixelFormat::I420 => (
            buffer[..luma_size].to_vec(),
            buffer[luma_size..luma_size + chroma_size].to_vec(),
            buffer[luma_size + chroma_size..luma_size + 2 * chroma_size].to_vec(),
        ),
        PixelFormat::Nv12 | PixelFormat::Nv21 => {
            let pairs = buffer[luma_size..luma_size + 2 * chroma_size].chunks_exact(2);
            let first: Vec<u8> = pairs.clone().map(|pair| pair[0]).collect();
            let second: Vec<u8> = pairs.map(|pair| pair[1]).collect();
            if format == PixelFormat::Nv12 {
                (buffer[..luma_size].to_vec(), first, second)
            } else {
                (buffer[..luma_size].to_vec(), second, first)
            }
        }
        _ => unreachable!(),
    };

    Planes {
        y,
        u,
        v,
        chroma_width,
        chroma_height,
    }
}

/// Expected output of a rgb to yuv conversion
pub fn rgb_to_planes(
    format: PixelFormat,
    width: usize,
    height: usize,
    pixels: &[([u8; 3], Option<u8>)],
    gray: bool,
) -> Planes {
    let samples: Vec<(i32, i32, i32)> = pixels
        .iter()
        .map(|&([r, g, b], _)| {
            if gray {
                (i32::from(r), 0, 0)
            } else {
                let (u, v) = chroma(r, g, b);
                (luma(r, g, b), u, v)
            }
        })
        .collect();

    let chroma_width = width / 2;
    let chroma_height = chroma_height(format, height);
    let rows_per_sample = height / chroma_height;
    let (mut u, mut v) = (Vec::new(), Vec::new());
    for cy in 0..chroma_height {
        for cx in 0..chroma_width {
            let mut block = Vec::new();
            for row in cy * rows_per_sample..(cy + 1) * rows_per_sample {
                block.push(samples[row * width + 2 * cx]);
                block.push(samples[row * width + 2 * cx + 1]);
            }

            let shift = if rows_per_sample == 1 { 1 } else { 2 };
            let u_sum: i32 = block.iter().map(|s| s.1).sum();
            let v_sum: i32 = block.iter().map(|s| s.2).sum();
            u.push(((u_sum >> shift) + 128) as u8);
            v.push(((v_sum >> shift) + 128) as u8);
        }
    }

    Planes {
        y: samples.iter().map(|s| s.0 as u8).collect(),
        u,
        v,
        chroma_width,
        chroma_height,
    }
}

/// Expected output of a yuv to rgb conversion, as rgb triplets
pub fn planes_to_rgb(width: usize, height: usize, planes: &Planes) -> Vec<[u8; 3]> {
    let rows_per_sample = height / planes.chroma_height;
    let mut pixels = Vec::new();
    for row in 0..height {
        for col in 0..width {
            let index = (row / rows_per_sample) * planes.chroma_width + col / 2;
            pixels.push(to_rgb(
                planes.y[row * width + col],
                planes.u[index],
                planes.v[index],
            ));
        }
    }

    pixels
}

/// Resamples chroma planes to the vertical resolution of another yuv format
pub fn resample_planes(planes: &Planes, format: PixelFormat, height: usize) -> Planes {
    let chroma_height = chroma_height(format, height);
    let cw = planes.chroma_width;
    let (mut u, mut v) = (Vec::new(), Vec::new());
    for row in 0..chroma_height {
        for cx in 0..cw {
            if chroma_height == planes.chroma_height {
                u.push(planes.u[row * cw + cx]);
                v.push(planes.v[row * cw + cx]);
            } else if chroma_height < planes.chroma_height {
                let average = |plane: &[u8]| {
                    let a = u16::from(plane[2 * row * cw + cx]);
                    let b = u16::from(plane[(2 * row + 1) * cw + cx]);
                    ((a + b) >> 1) as u8
                };
                u.push(average(&planes.u));
                v.push(average(&planes.v));
            } else {
                u.push(planes.u[(row / 2) * cw + cx]);
                v.push(planes.v[(row / 2) * cw + cx]);
            }
        }
    }

    Planes {
        y: planes.y.clone(),
        u,
        v,
        chroma_width: cw,
        chroma_height,
    }
}
