use criterion::{criterion_group, criterion_main, Criterion};
use temp_pipeline::{ChannelId, MessageBuffer, MovingAverage, SimpleAverage};

fn benchmark_moving_average(c: &mut Criterion) {
    let mut avg = MovingAverage::new(10);
    c.bench_function("moving_average_push", |b| b.iter(|| avg.push(27.3)));
}

fn benchmark_simple_average(c: &mut Criterion) {
    let mut avg = SimpleAverage::new();
    c.bench_function("simple_average_push", |b| b.iter(|| avg.push(27.3)));
}

fn benchmark_channel_round_trip(c: &mut Criterion) {
    let (tx, rx) = MessageBuffer::<f32>::from_bytes(ChannelId::RawToSimple, 60)
        .unwrap()
        .split();
    c.bench_function("message_buffer_send_recv", |b| {
        b.iter(|| {
            tx.send(27.3);
            rx.recv_blocking()
        })
    });
}

criterion_group!(
    benches,
    benchmark_moving_average,
    benchmark_simple_average,
    benchmark_channel_round_trip
);
criterion_main!(benches);
