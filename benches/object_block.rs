//! Object block decoding throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tabmap::io::map::{IndexBlock, ObjectBlock};

const PAGE: usize = 512;

fn object_page(compact: bool) -> Vec<u8> {
    let mut payload = Vec::new();
    let mut id = 0i32;
    loop {
        let mut record = Vec::new();
        id += 1;
        if compact {
            record.push(0x04);
            record.extend_from_slice(&id.to_le_bytes());
            for v in [-100i16, -50, 100, 50] {
                record.extend_from_slice(&v.to_le_bytes());
            }
        } else {
            record.push(0x05);
            record.extend_from_slice(&id.to_le_bytes());
            for v in [-100_000i32, -50_000, 100_000, 50_000] {
                record.extend_from_slice(&v.to_le_bytes());
            }
        }
        record.push(1);
        if 20 + payload.len() + record.len() > PAGE {
            break;
        }
        payload.extend(record);
    }

    let mut page = vec![0u8; PAGE];
    page[0] = 2;
    page[2..4].copy_from_slice(&(payload.len() as i16).to_le_bytes());
    page[4..8].copy_from_slice(&500_000i32.to_le_bytes());
    page[8..12].copy_from_slice(&500_000i32.to_le_bytes());
    page[20..20 + payload.len()].copy_from_slice(&payload);
    page
}

fn index_page() -> Vec<u8> {
    let mut page = vec![0u8; PAGE];
    page[0] = 1;
    page[2..4].copy_from_slice(&25i16.to_le_bytes());
    for i in 0..25i32 {
        let base = 4 + i as usize * 20;
        for (k, v) in [i, i, i + 10, i + 10, 0x200 * (i + 2)].iter().enumerate() {
            page[base + k * 4..base + k * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
    }
    page
}

fn bench_object_block(c: &mut Criterion) {
    let compact = object_page(true);
    let long = object_page(false);

    c.bench_function("object_block_compact_lines", |b| {
        b.iter(|| ObjectBlock::from_page(0x400, black_box(compact.clone())))
    });
    c.bench_function("object_block_long_lines", |b| {
        b.iter(|| ObjectBlock::from_page(0x400, black_box(long.clone())))
    });
    c.bench_function("object_block_extend_16_pages", |b| {
        b.iter(|| {
            let mut block = ObjectBlock::from_page(0x400, compact.clone())?;
            for _ in 0..15 {
                block.extend(black_box(compact.clone()))?;
            }
            Ok::<_, tabmap::MapError>(block.len())
        })
    });
    c.bench_function("index_block_full_node", |b| {
        let page = index_page();
        b.iter(|| IndexBlock::from_page(0x200, black_box(page.clone())))
    });
}

criterion_group!(benches, bench_object_block);
criterion_main!(benches);
