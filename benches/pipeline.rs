use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use futures::StreamExt;
use querywatch::{apply_placeholder_effect, watch_query_state, InputElement, WatchOptions};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Type `keystrokes` characters one at a time, repeating each keyup so half are duplicates.
fn drive_typing(rt: &Runtime, keystrokes: usize) -> usize {
    rt.block_on(async {
        let element = Arc::new(InputElement::new(""));
        let (states, handle) = watch_query_state(Arc::clone(&element), WatchOptions::new());
        let mut states = states.pipe(apply_placeholder_effect(Arc::clone(&element)));

        let mut text = String::with_capacity(keystrokes);
        for i in 0..keystrokes {
            text.push(char::from(b'a' + (i % 26) as u8));
            element.type_text(text.as_str());
            element.key_up();
        }
        element.close();

        let mut emitted = 0;
        while let Some(state) = states.next().await {
            black_box(state.unwrap());
            emitted += 1;
        }
        handle.cancel();
        emitted
    })
}

fn bench_typing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("typing");
    group.sample_size(20);

    for &keystrokes in &[16usize, 256, 4096] {
        group.bench_with_input(
            BenchmarkId::new("keyups", keystrokes),
            &keystrokes,
            |b, &keystrokes| {
                b.iter(|| black_box(drive_typing(&rt, keystrokes)));
            },
        );
    }

    group.finish();
}

fn bench_watch_attach(c: &mut Criterion) {
    let element = Arc::new(InputElement::new("rust book"));

    c.bench_function("watch_attach_and_cancel", |b| {
        b.iter(|| {
            let (states, handle) = watch_query_state(Arc::clone(&element), WatchOptions::new());
            handle.cancel();
            black_box(states);
        });
    });
}

criterion_group!(benches, bench_typing, bench_watch_attach);
criterion_main!(benches);
