use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataset_curve::core::{BondingCurve, DatasetMarket, QuoteEngine};
use rust_decimal_macros::dec;

fn bench_buy_cost(c: &mut Criterion) {
    c.bench_function("buy_cost", |b| {
        let curve = BondingCurve::default();
        b.iter(|| {
            black_box(curve.buy_cost(black_box(dec!(12500.75)), black_box(dec!(320.5))))
        });
    });
}

fn bench_sell_refund(c: &mut Criterion) {
    c.bench_function("sell_refund", |b| {
        let curve = BondingCurve::default();
        b.iter(|| {
            black_box(curve.sell_refund(black_box(dec!(12500.75)), black_box(dec!(320.5))))
        });
    });
}

fn bench_buy_cost_f64(c: &mut Criterion) {
    c.bench_function("buy_cost_f64", |b| {
        b.iter(|| black_box(dataset_curve::core::buy_cost(black_box(12500.75), black_box(320.5))));
    });
}

fn bench_quote_with_fee(c: &mut Criterion) {
    c.bench_function("quote_buy_with_fee", |b| {
        let engine = QuoteEngine::new(BondingCurve::default(), 50).unwrap();
        b.iter(|| black_box(engine.quote_buy(black_box(dec!(12500)), black_box(dec!(320)))));
    });
}

fn bench_market_round_trip(c: &mut Criterion) {
    c.bench_function("market_buy_sell", |b| {
        let engine = QuoteEngine::new(BondingCurve::default(), 50).unwrap();
        let mut market = DatasetMarket::new("bench", "bench", engine, dec!(1000000)).unwrap();
        market.buy(dec!(10000), None).unwrap();
        b.iter(|| {
            market.buy(black_box(dec!(25)), None).unwrap();
            market.sell(black_box(dec!(25)), None).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_buy_cost,
    bench_sell_refund,
    bench_buy_cost_f64,
    bench_quote_with_fee,
    bench_market_round_trip
);
criterion_main!(benches);
