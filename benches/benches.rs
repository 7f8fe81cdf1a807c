use criterion::*;
use std::time::{Duration, Instant};

use itertools::iproduct;
use pc::*;
use pixel_convert as pc;
use rand::Rng;

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;
const SAMPLE_SIZE: usize = 22;

fn random_buffer(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen::<u8>()).collect()
}

fn convert_frame(
    implementation: Implementation,
    converter: Converter,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
) -> Duration {
    let start = Instant::now();
    converter
        .convert_with(implementation, WIDTH, HEIGHT, src_buffer, dst_buffer)
        .expect("Benchmark iteration failed");

    start.elapsed()
}

fn bench(c: &mut Criterion) {
    println!("{}", describe_acceleration());

    for &src_format in &PIXEL_FORMATS {
        let mut group = c.benchmark_group(format!("pixel-convert/{src_format}"));
        group.sample_size(SAMPLE_SIZE);
        group.throughput(Throughput::Elements(u64::from(WIDTH) * u64::from(HEIGHT)));

        let src_buffer = random_buffer(src_format.size(WIDTH, HEIGHT));
        for (&dst_format, implementation) in iproduct!(
            &PIXEL_FORMATS,
            [Implementation::Reference, Implementation::Accelerated]
        ) {
            let converter = get_converter(src_format, dst_format);
            if implementation == Implementation::Accelerated && !converter.is_accelerated() {
                continue;
            }

            let mut dst_buffer = vec![0_u8; dst_format.size(WIDTH, HEIGHT)];
            let name = format!("{src_format}>{dst_format}/{implementation:?}");
            group.bench_function(name.as_str(), |b| {
                b.iter_custom(|iters| {
                    let mut total = Duration::new(0, 0);
                    for _i in 0..iters {
                        total += convert_frame(
                            implementation,
                            converter,
                            black_box(&src_buffer),
                            &mut dst_buffer,
                        );
                    }

                    total
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
