#![warn(unused)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(clippy::too_many_lines)] // This requires effort to handle

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

use itertools::iproduct;
use pixel_convert as pc;
use pc::{
    convert_image, get_converter, ErrorKind, Image, Implementation, PixelFormat, PIXEL_FORMATS,
};

const SENTINEL: u8 = 0xA5;

const DIMENSIONS: &[(u32, u32); 6] = &[(0, 0), (0, 2), (2, 0), (3, 2), (2, 3), (3, 3)];

fn check_err(result: Result<(), ErrorKind>, err: ErrorKind) {
    assert_eq!(result.unwrap_err(), err);
}

/// Expected result of a conversion with large enough buffers
fn expected_status(
    width: u32,
    height: u32,
    src_format: PixelFormat,
    dst_format: PixelFormat,
) -> Result<(), ErrorKind> {
    let aligned = |format: PixelFormat| {
        width % format.width_alignment() == 0 && height % format.height_alignment() == 0
    };

    if width == 0 || height == 0 || !aligned(src_format) || !aligned(dst_format) {
        Err(ErrorKind::InvalidDimension)
    } else {
        Ok(())
    }
}

fn conversion_errors(src_format: PixelFormat, dst_format: PixelFormat) {
    let src_buffer = vec![0_u8; 64];

    for (&(width, height), &implementation) in iproduct!(
        DIMENSIONS,
        &[Implementation::Reference, Implementation::Accelerated]
    ) {
        let mut dst_buffer = vec![SENTINEL; 64];
        let expected = expected_status(width, height, src_format, dst_format);
        let status = get_converter(src_format, dst_format).convert_with(
            implementation,
            width,
            height,
            &src_buffer,
            &mut dst_buffer,
        );

        assert_eq!(
            status, expected,
            "{src_format} to {dst_format}, {width}x{height}"
        );
        if status.is_err() {
            assert!(dst_buffer.iter().all(|&x| x == SENTINEL));
        }
    }
}

fn buffer_errors(src_format: PixelFormat, dst_format: PixelFormat) {
    const WIDTH: u32 = 34;
    const HEIGHT: u32 = 6;

    let src_size = src_format.size(WIDTH, HEIGHT);
    let dst_size = dst_format.size(WIDTH, HEIGHT);
    let src_buffer = vec![0_u8; src_size];

    let mut dst_buffer = vec![SENTINEL; dst_size];
    check_err(
        convert_image(
            WIDTH,
            HEIGHT,
            src_format,
            &src_buffer[..src_size - 1],
            dst_format,
            &mut dst_buffer,
        ),
        ErrorKind::NotEnoughData,
    );
    assert!(dst_buffer.iter().all(|&x| x == SENTINEL));

    let mut dst_buffer = vec![SENTINEL; dst_size - 1];
    check_err(
        convert_image(
            WIDTH,
            HEIGHT,
            src_format,
            &src_buffer,
            dst_format,
            &mut dst_buffer,
        ),
        ErrorKind::NotEnoughData,
    );
    assert!(dst_buffer.iter().all(|&x| x == SENTINEL));

    // Larger buffers are fine, only the leading bytes are written
    let src_buffer = vec![0_u8; src_size + 7];
    let mut dst_buffer = vec![SENTINEL; dst_size + 7];
    convert_image(
        WIDTH,
        HEIGHT,
        src_format,
        &src_buffer,
        dst_format,
        &mut dst_buffer,
    )
    .unwrap();
    assert!(dst_buffer[dst_size..].iter().all(|&x| x == SENTINEL));
}

#[cfg(test)]
mod errors {
    use super::*;

    #[test]
    fn dimensions() {
        for (&src_format, &dst_format) in iproduct!(&PIXEL_FORMATS, &PIXEL_FORMATS) {
            conversion_errors(src_format, dst_format);
        }
    }

    #[test]
    fn buffers() {
        for (&src_format, &dst_format) in iproduct!(&PIXEL_FORMATS, &PIXEL_FORMATS) {
            buffer_errors(src_format, dst_format);
        }
    }

    #[test]
    fn dimension_check_comes_first() {
        let mut dst_buffer = [SENTINEL; 4];
        check_err(
            convert_image(
                3,
                1,
                PixelFormat::Gray,
                &[],
                PixelFormat::Yuyv,
                &mut dst_buffer,
            ),
            ErrorKind::InvalidDimension,
        );
        assert_eq!(dst_buffer, [SENTINEL; 4]);
    }

    #[test]
    fn odd_height_for_planar_destination() {
        let src_buffer = [0_u8; 6 * 5 * 3];
        let mut dst_buffer = [SENTINEL; 64];
        check_err(
            convert_image(
                6,
                5,
                PixelFormat::Rgb,
                &src_buffer,
                PixelFormat::Nv12,
                &mut dst_buffer,
            ),
            ErrorKind::InvalidDimension,
        );
        assert_eq!(dst_buffer, [SENTINEL; 64]);

        // Packed formats have no vertical subsampling
        let mut dst_buffer = [SENTINEL; 6 * 5 * 2];
        convert_image(
            6,
            5,
            PixelFormat::Rgb,
            &src_buffer,
            PixelFormat::Yuyv,
            &mut dst_buffer,
        )
        .unwrap();
    }

    #[test]
    fn dimension_mismatch() {
        let src = Image::new(4, 4, PixelFormat::Rgba).unwrap();
        let mut dst = Image::new(4, 2, PixelFormat::I420).unwrap();

        check_err(pc::convert(&src, &mut dst), ErrorKind::DimensionMismatch);
        check_err(
            pc::convert_with(Implementation::Reference, &src, &mut dst),
            ErrorKind::DimensionMismatch,
        );
        assert!(dst.data().iter().all(|&x| x == 0));
    }

    #[test]
    fn unsupported_formats() {
        assert_eq!(
            "ARGB".parse::<PixelFormat>().unwrap_err(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(
            PixelFormat::try_from(10_i32).unwrap_err(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(
            PixelFormat::try_from(-1_i32).unwrap_err(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(PixelFormat::from_name("end"), None);
        assert_eq!(PixelFormat::from_name(""), None);
        assert_eq!(PixelFormat::from_name("NV12"), None);
    }

    #[test]
    fn images() {
        let mut buffer = [0_u8; 16];

        assert_eq!(
            Image::new(0, 4, PixelFormat::Gray).unwrap_err(),
            ErrorKind::InvalidDimension
        );
        assert_eq!(
            Image::new(4, 0, PixelFormat::Gray).unwrap_err(),
            ErrorKind::InvalidDimension
        );
        assert_eq!(
            Image::from_buffer(2, 4, PixelFormat::Rgba, &mut buffer).unwrap_err(),
            ErrorKind::NotEnoughData
        );

        let mut image = Image::default();
        image.create(2, 2, PixelFormat::Gray, None).unwrap();
        image.data_mut().fill(7);
        assert_eq!(
            image.create(4, 4, PixelFormat::Rgb, Some(&mut buffer)),
            Err(ErrorKind::NotEnoughData)
        );
        assert_eq!(image.width(), 2);
        assert_eq!(image.format(), PixelFormat::Gray);
        assert_eq!(image.data(), [7_u8; 4]);
    }

    #[test]
    fn messages() {
        for error in [
            ErrorKind::InvalidDimension,
            ErrorKind::UnsupportedFormat,
            ErrorKind::DimensionMismatch,
            ErrorKind::NotEnoughData,
        ] {
            assert!(!error.to_string().is_empty());
        }

        assert_eq!(
            ErrorKind::UnsupportedFormat.to_string(),
            "Unsupported pixel format"
        );
    }
}
