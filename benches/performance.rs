use criterion::{criterion_group, criterion_main, Criterion};
use kmerge::{Buffer, FieldType, KeyPart, Merger, SourceInput};
use rmpv::Value;

fn make_buffer(start: i64, count: usize, step: i64) -> Vec<u8> {
    let mut out = Vec::new();
    rmp::encode::write_map_len(&mut out, 1).unwrap();
    rmp::encode::write_uint(&mut out, 0x30).unwrap();
    rmp::encode::write_array_len(&mut out, count as u32).unwrap();
    let mut key = start;
    for _ in 0..count {
        rmpv::encode::write_value(&mut out, &Value::Array(vec![Value::from(key)])).unwrap();
        key += step;
    }
    out
}

fn bench_merge_sources(c: &mut Criterion) {
    const SOURCES: usize = 8;
    const ROWS_PER_SOURCE: usize = 2048;

    let buffers: Vec<Vec<u8>> = (0..SOURCES)
        .map(|i| make_buffer(i as i64, ROWS_PER_SOURCE, SOURCES as i64))
        .collect();

    c.bench_function("merge_8_sources_16k_rows", |b| {
        b.iter(|| {
            let mut merger =
                Merger::new(vec![KeyPart::new(0, FieldType::Integer)]).expect("valid key");
            let sources = buffers
                .iter()
                .map(|bytes| SourceInput::Buffer(Buffer::new(bytes)))
                .collect();
            merger.start(sources, 1).expect("start");
            let mut count = 0;
            while merger.next().expect("next").is_some() {
                count += 1;
            }
            assert_eq!(count, SOURCES * ROWS_PER_SOURCE);
        })
    });
}

criterion_group!(merging, bench_merge_sources);
criterion_main!(merging);
