use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use padsync_core::{apply_to_text, Changeset, OpIterator, Result, TextBuffer};

/// Plain character buffer that discards attributes
struct BenchBuffer {
    chars: Vec<char>,
}

impl BenchBuffer {
    fn from_text(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }
}

impl TextBuffer for BenchBuffer {
    fn len(&self) -> usize {
        self.chars.len()
    }

    fn insert(&mut self, index: usize, text: &str, _attribs: &str) -> Result<()> {
        self.chars.splice(index..index, text.chars());
        Ok(())
    }

    fn remove(&mut self, index: usize, count: usize) -> Result<()> {
        self.chars.drain(index..index + count);
        Ok(())
    }

    fn set_attributes(&mut self, _index: usize, _attribs: &str, _count: usize) -> Result<()> {
        Ok(())
    }
}

/// A changeset that alternates keep/attributed-insert over `edits` spots
fn synthetic_changeset(edits: usize) -> String {
    let ops = "=1*0+1".repeat(edits);
    let bank = "a".repeat(edits);
    Changeset::new(edits + 1, 2 * edits + 1, ops, bank).pack()
}

/// Benchmark header unpacking
fn bench_unpack(c: &mut Criterion) {
    let encoded = synthetic_changeset(100);
    c.bench_function("changeset_unpack", |b| {
        b.iter(|| black_box(Changeset::unpack(black_box(&encoded))));
    });
}

/// Benchmark lazy decoding over growing op streams
fn bench_decode_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("changeset_decode_ops");

    for size in [100, 1_000, 10_000].iter() {
        let ops = "*0|1+2=3-1".repeat(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &ops, |b, ops| {
            b.iter(|| black_box(OpIterator::new(ops).count()));
        });
    }

    group.finish();
}

/// Benchmark end-to-end apply against a vector-backed buffer
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("changeset_apply");

    for size in [100, 1_000].iter() {
        let encoded = synthetic_changeset(*size);
        let base = "b".repeat(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter_batched(
                || BenchBuffer::from_text(&base),
                |mut buf| {
                    apply_to_text(black_box(&encoded), &mut buf).unwrap();
                    black_box(buf.len());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_unpack, bench_decode_ops, bench_apply);
criterion_main!(benches);
