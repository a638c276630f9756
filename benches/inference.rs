//! Benchmarks for fuzzy inference

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use fuzzylab::analysis::{analyse, EdgePolicy};
use fuzzylab::domains::{air_quality, comfort, get_profile, light, plant_care, Domain};
use fuzzylab::engine::trimf;

fn membership_benchmark(c: &mut Criterion) {
    let Ok(mf) = trimf(18.0, 23.0, 28.0) else {
        return;
    };

    c.bench_function("membership_degree", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for x in 0..=50 {
                total += mf.degree(black_box(x as f64));
            }
            total
        })
    });
}

fn evaluate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let cases = [
        (Domain::Comfort, vec![(comfort::TEMPERATURE, 22.99), (comfort::HUMIDITY, 50.0)]),
        (Domain::AirQuality, vec![(air_quality::CO2, 1000.0), (air_quality::PM25, 35.0)]),
        (Domain::LightComfort, vec![(light::INTENSITY, 500.0), (light::COLOUR_TEMP, 4000.0)]),
        (
            Domain::PlantCare,
            vec![
                (plant_care::SOIL_MOISTURE, 20.0),
                (plant_care::LIGHT_LEVEL, 50.0),
                (plant_care::TEMPERATURE, 20.0),
            ],
        ),
    ];

    for (domain, values) in cases {
        let Ok(profile) = get_profile(domain) else {
            continue;
        };
        let inputs: HashMap<String, f64> = values.into_iter().map(|(k, v)| (k.to_string(), v)).collect();

        group.bench_with_input(BenchmarkId::new("profile", domain.as_str()), &inputs, |b, inputs| {
            b.iter(|| profile.evaluate(black_box(inputs)))
        });
    }

    group.finish();
}

fn analyse_benchmark(c: &mut Criterion) {
    let edges = EdgePolicy::default();
    let mut group = c.benchmark_group("analyse");

    let comfort = json!({ "temperature": 23, "humidity": 50 });
    group.bench_function("comfort", |b| {
        b.iter(|| analyse(Domain::Comfort, black_box(&comfort), &edges))
    });

    let plant = json!({
        "soil_moisture": 10,
        "light_level": 80,
        "temperature": 30,
        "plant_type": "cactus"
    });
    group.bench_function("plant_care", |b| {
        b.iter(|| analyse(Domain::PlantCare, black_box(&plant), &edges))
    });

    group.finish();
}

criterion_group!(benches, membership_benchmark, evaluate_benchmark, analyse_benchmark);
criterion_main!(benches);
