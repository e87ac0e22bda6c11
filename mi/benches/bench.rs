use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mi::{MiDecoder, MiEncoder, SourceImage};

const SIZES: [(usize, usize); 3] = [(64, 64), (640, 480), (1920, 1080)];

fn gradient(width: usize, height: usize) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, (x + y) as u8]);
        }
    }
    rgba
}

fn encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient encode");

    for (width, height) in SIZES {
        let rgba = gradient(width, height);
        let source = SourceImage::new(width, height, &rgba).unwrap();
        let composited = source.composite_on_black();
        let name = format!("{width}x{height}");

        group.throughput(criterion::Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("composite_on_black", &name),
            &source,
            |b, source| b.iter(|| source.composite_on_black()),
        );

        group.bench_with_input(
            BenchmarkId::new("encode_to_vec", &name),
            &composited,
            |b, image| {
                let mut encoded = Vec::with_capacity(8 + width * height * 4);
                b.iter(|| {
                    encoded.clear();
                    MiEncoder::encode_to_vec(image, &mut encoded)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("encode_std", &name),
            &composited,
            |b, image| {
                let mut encoded = Vec::with_capacity(8 + width * height * 4);
                b.iter(|| {
                    encoded.clear();
                    MiEncoder::encode(image, &mut encoded)
                })
            },
        );
    }
}

fn decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient decode");

    for (width, height) in SIZES {
        let rgba = gradient(width, height);
        let composited = SourceImage::new(width, height, &rgba)
            .unwrap()
            .composite_on_black();

        let mut encoded = Vec::new();
        MiEncoder::encode_to_vec(&composited, &mut encoded).unwrap();

        group.throughput(criterion::Throughput::Elements((width * height) as u64));
        group.bench_with_input(
            BenchmarkId::new("decode_to_vec", format!("{width}x{height}")),
            &encoded,
            |b, input| {
                let mut output = Vec::with_capacity(width * height * 3);
                b.iter(|| {
                    output.clear();
                    MiDecoder::decode_to_vec(input, &mut output)
                })
            },
        );
    }
}

criterion_group!(benches, encode, decode);
criterion_main!(benches);
